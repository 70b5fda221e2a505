// ============================================================
// TABLE
// ============================================================
// Row-major table with an ordered, unique column set

use serde_json::{Map, Value};

use super::Cell;

/// One output row: column name to JSON scalar, in column order.
pub type Record = Map<String, Value>;

/// Parsed table. Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table. Short rows are padded with nulls, long rows truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Rewrite every cell of one column in place.
    pub fn map_column<F>(&mut self, idx: usize, mut f: F)
    where
        F: FnMut(Cell) -> Cell,
    {
        for row in &mut self.rows {
            let cell = std::mem::replace(&mut row[idx], Cell::Null);
            row[idx] = f(cell);
        }
    }

    /// Keep only the columns for which `keep(name, table, idx)` holds.
    pub fn retain_columns<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Table, usize) -> bool,
    {
        let mask: Vec<bool> = (0..self.columns.len())
            .map(|idx| keep(&self.columns[idx], self, idx))
            .collect();

        if mask.iter().all(|k| *k) {
            return;
        }

        let mut idx = 0;
        self.columns.retain(|_| {
            let k = mask[idx];
            idx += 1;
            k
        });

        for row in &mut self.rows {
            let mut idx = 0;
            row.retain(|_| {
                let k = mask[idx];
                idx += 1;
                k
            });
        }
    }

    /// Serialize as an ordered list of row objects. Rows are emitted in
    /// their 0-based order; no index column is produced.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row.iter())
                    .map(|(name, cell)| (name.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }
}
