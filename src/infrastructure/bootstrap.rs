use std::error::Error;

use tracing::{error, info};

use crate::application::{ColumnStatsUseCase, CorrelationUseCase, UploadUseCase};
use crate::infrastructure::config::ServiceConfig;
use crate::infrastructure::storage::UploadStore;
use crate::interfaces::http::AppState;

/// One-time startup work: prepare the upload directory and wire the use cases.
pub fn setup(config: &ServiceConfig) -> Result<AppState, Box<dyn Error>> {
    let store = UploadStore::open(&config.upload_dir).map_err(|err| {
        error!(
            error = %err,
            upload_dir = %config.upload_dir.display(),
            "Failed to create upload dir"
        );
        err
    })?;

    info!(upload_dir = %store.root().display(), "Upload directory ready");

    Ok(AppState {
        upload_use_case: UploadUseCase::new(store),
        stats_use_case: ColumnStatsUseCase::new(),
        correlation_use_case: CorrelationUseCase::new(),
        max_upload_bytes: config.max_upload_bytes,
        max_json_bytes: config.max_json_bytes,
    })
}
