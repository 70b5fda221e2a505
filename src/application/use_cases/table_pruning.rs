use crate::domain::table::{is_placeholder_column_name, Cell, Table};

/// Post-parse filter applied to every uploaded table: removes columns with
/// no values at all, then columns that never had a real header.
pub fn prune_columns(table: &mut Table) {
    drop_all_null_columns(table);
    drop_placeholder_columns(table);
}

pub fn drop_all_null_columns(table: &mut Table) {
    table.retain_columns(|_, table, idx| !table.column_cells(idx).all(Cell::is_null));
}

pub fn drop_placeholder_columns(table: &mut Table) {
    table.retain_columns(|name, _, _| !is_placeholder_column_name(name));
}
