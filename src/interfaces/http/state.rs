use crate::application::{ColumnStatsUseCase, CorrelationUseCase, UploadUseCase};

/// Shared, read-only state handed to every request handler.
pub struct AppState {
    pub upload_use_case: UploadUseCase,
    pub stats_use_case: ColumnStatsUseCase,
    pub correlation_use_case: CorrelationUseCase,
    pub max_upload_bytes: usize,
    pub max_json_bytes: usize,
}
