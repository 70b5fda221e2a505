// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core types for parsed spreadsheet content
// No I/O, no async

mod cell;
mod column_name;
mod table;

pub use cell::Cell;
pub use column_name::{dedupe_headers, is_placeholder_column_name, placeholder_name};
pub use table::{Record, Table};
