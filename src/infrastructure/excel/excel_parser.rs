use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use chrono::NaiveDateTime;

use crate::domain::error::AppError;
use crate::domain::table::{dedupe_headers, Cell, Table};

/// Reads the first worksheet of an XLS/XLSX workbook. The first row of the
/// used range is the header.
#[derive(Debug, Default)]
pub struct ExcelParser;

impl ExcelParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table, AppError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

        Ok(range_to_table(&range))
    }
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Table::default();
    };

    let columns = dedupe_headers(header_row.iter().map(header_text).collect());
    let body = rows.map(|row| row.iter().map(cell_from_excel).collect()).collect();

    let mut table = Table::new(columns, body);
    normalize_numeric_columns(&mut table);
    table
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_from_excel(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        other => match other.as_datetime() {
            Some(dt) => Cell::Text(iso_datetime(&dt)),
            None => Cell::Text(other.to_string()),
        },
    }
}

fn iso_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Workbooks store most numbers as floats. A purely numeric column becomes
/// integers when every value is whole and none is missing, floats otherwise.
fn normalize_numeric_columns(table: &mut Table) {
    for idx in 0..table.column_count() {
        let mut has_null = false;
        let mut all_numeric = true;
        let mut all_whole = true;

        for cell in table.column_cells(idx) {
            match cell {
                Cell::Null => has_null = true,
                Cell::Int(_) => {}
                Cell::Float(f) => {
                    if f.fract() != 0.0 || !f.is_finite() || f.abs() > i64::MAX as f64 {
                        all_whole = false;
                    }
                }
                _ => {
                    all_numeric = false;
                    break;
                }
            }
        }

        if !all_numeric {
            continue;
        }

        if all_whole && !has_null {
            table.map_column(idx, |cell| match cell {
                Cell::Float(f) => Cell::Int(f as i64),
                other => other,
            });
        } else {
            table.map_column(idx, |cell| match cell {
                Cell::Int(i) => Cell::Float(i as f64),
                other => other,
            });
        }
    }
}
