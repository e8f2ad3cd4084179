//! Slicing the flat cell stream into fixed-width rows.

use serde::Serialize;

/// One table row, aligned with the header columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Zero-based row number within its table.
    pub index: usize,
    /// Cell strings, left to right.
    pub cells: Vec<String>,
}

impl Row {
    /// Cell at `column`, if the row reaches that far.
    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Groups cells into rows of the header width.
pub struct RowAssembler;

impl RowAssembler {
    /// Chunk `cells` into rows of `width` cells. The last row is shorter when
    /// the cell count is not a multiple of `width`; a zero width yields no rows.
    pub fn assemble(cells: Vec<String>, width: usize) -> Vec<Row> {
        if width == 0 {
            return Vec::new();
        }

        let mut rows = Vec::with_capacity(cells.len().div_ceil(width));
        let mut cells = cells.into_iter().peekable();
        while cells.peek().is_some() {
            rows.push(Row {
                index: rows.len(),
                cells: cells.by_ref().take(width).collect(),
            });
        }
        rows
    }
}
