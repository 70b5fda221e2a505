use tracing::{info, warn};

use super::table_pruning::prune_columns;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{Record, Table};
use crate::domain::upload::{sanitize_filename, FileKind};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::excel::ExcelParser;
use crate::infrastructure::storage::UploadStore;

/// A spreadsheet received from a client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Name checks passed; where the upload will be stored and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    pub kind: FileKind,
    pub stored_name: String,
}

pub struct UploadUseCase {
    store: UploadStore,
}

impl UploadUseCase {
    pub fn new(store: UploadStore) -> Self {
        Self { store }
    }

    /// Validate a client filename before any bytes are written.
    pub fn accept(&self, filename: &str) -> Result<AcceptedUpload> {
        let stored_name = sanitize_filename(filename)
            .ok_or_else(|| AppError::ValidationError("No selected file".to_string()))?;
        let kind = FileKind::from_filename(&stored_name)
            .ok_or_else(|| AppError::ValidationError("Invalid file type".to_string()))?;

        Ok(AcceptedUpload { kind, stored_name })
    }

    /// Persist the raw file, parse it, and return the pruned rows.
    pub async fn execute(&self, upload: UploadedFile) -> Result<Vec<Record>> {
        let accepted = self.accept(&upload.filename)?;

        let path = self.store.save(&accepted.stored_name, &upload.bytes).await?;
        info!(
            file = %accepted.stored_name,
            path = %path.display(),
            bytes = upload.bytes.len(),
            "stored upload"
        );

        let kind = accepted.kind;
        let mut table = tokio::task::spawn_blocking(move || parse(kind, &upload.bytes))
            .await
            .map_err(|e| AppError::Internal(format!("Parser task failed: {}", e)))??;

        let parsed_columns = table.column_count();
        prune_columns(&mut table);

        info!(
            file = %accepted.stored_name,
            rows = table.row_count(),
            columns = table.column_count(),
            dropped_columns = parsed_columns - table.column_count(),
            "parsed upload"
        );

        Ok(table.to_records())
    }
}

fn parse(kind: FileKind, bytes: &[u8]) -> Result<Table> {
    match kind {
        FileKind::Csv => CsvParser::new().parse_bytes(bytes).map_err(|e| {
            warn!(error = %e, "failed to parse CSV upload");
            AppError::ParseError("Unable to read CSV file".to_string())
        }),
        FileKind::Xls | FileKind::Xlsx => ExcelParser::new().parse_bytes(bytes).map_err(|e| {
            warn!(error = %e, "failed to parse Excel upload");
            AppError::ParseError(format!("Unable to read Excel file: {}", e.message()))
        }),
    }
}
