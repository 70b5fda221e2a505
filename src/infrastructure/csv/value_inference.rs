// ============================================================
// CSV VALUE INFERENCE
// ============================================================
// Decide one type per column from its raw text cells

use crate::domain::table::{Cell, Table};

/// Tokens read as a missing value.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["true", "True", "TRUE"];
const FALSE_TOKENS: &[&str] = &["false", "False", "FALSE"];

/// Column type chosen from the non-null cells of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

fn is_na_token(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

/// Replace every text cell with its typed value, one column at a time.
/// Expects a table whose cells are all `Text` or `Null`.
pub fn infer_column_types(table: &mut Table) {
    for idx in 0..table.column_count() {
        let kind = detect_kind(table, idx);
        table.map_column(idx, |cell| convert(cell, kind));
    }
}

fn detect_kind(table: &Table, idx: usize) -> ColumnKind {
    let mut has_null = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in table.column_cells(idx) {
        let raw = match cell {
            Cell::Text(raw) if !is_na_token(raw) => raw.trim(),
            _ => {
                has_null = true;
                continue;
            }
        };

        if all_int && raw.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && parse_float(raw).is_none() {
            all_float = false;
        }
        if all_bool && parse_bool(raw).is_none() {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            return ColumnKind::Text;
        }
    }

    if all_int && !has_null {
        ColumnKind::Integer
    } else if all_float {
        ColumnKind::Float
    } else if all_bool {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

fn convert(cell: Cell, kind: ColumnKind) -> Cell {
    let raw = match cell {
        Cell::Text(raw) if !is_na_token(&raw) => raw,
        Cell::Text(_) => return Cell::Null,
        other => return other,
    };

    let parsed = match kind {
        ColumnKind::Integer => raw.trim().parse::<i64>().ok().map(Cell::Int),
        ColumnKind::Float => parse_float(raw.trim()).map(Cell::Float),
        ColumnKind::Boolean => parse_bool(raw.trim()).map(Cell::Bool),
        ColumnKind::Text => None,
    };

    parsed.unwrap_or(Cell::Text(raw))
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&raw) {
        Some(true)
    } else if FALSE_TOKENS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}
