// ============================================================
// CSV PARSER
// ============================================================
// Parse uploaded CSV bytes into a typed table

use std::borrow::Cow;

use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use super::value_inference::infer_column_types;
use crate::domain::error::AppError;
use crate::domain::table::{dedupe_headers, Cell, Table};

/// Comma separated parser with encoding detection
#[derive(Debug, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw upload bytes and parse them
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table, AppError> {
        let content = decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string. The first record is the header.
    pub fn parse_content(&self, content: &str) -> Result<Table, AppError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let columns = dedupe_headers(headers.iter().map(str::to_string).collect());
        let width = columns.len();
        let mut rows = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", idx + 1, e))
            })?;

            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            if record.len() > width {
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in row {}, saw {}",
                    width,
                    idx + 1,
                    record.len()
                )));
            }

            rows.push(
                record
                    .iter()
                    .map(|value| Cell::Text(value.to_string()))
                    .collect(),
            );
        }

        let mut table = Table::new(columns, rows);
        infer_column_types(&mut table);
        Ok(table)
    }
}

/// A byte order mark wins; otherwise strict UTF-8 with a Windows-1252
/// fallback for legacy exports.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return encoding.decode_without_bom_handling(&bytes[bom_len..]).0;
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(content) => content,
        None => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}
