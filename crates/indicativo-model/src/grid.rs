//! Sparse output grid.
//!
//! The grid is the intermediate form between row population and document
//! serialization: an append-only map of populated cells keyed by
//! (row, column), plus merge spans and column widths. Rows and columns are
//! 1-based to match the column algebra; the emitter converts to the
//! spreadsheet library's 0-based coordinates at the edge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A populated cell: a literal value or a formula recalculated by the
/// spreadsheet application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Formula(String),
}

/// A rectangular merge carrying its display label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergeSpan {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
    pub label: String,
}

impl MergeSpan {
    /// A single-cell span; the emitter writes it as a plain cell since a
    /// one-cell merge is not a merge.
    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: BTreeMap<(u32, u32), CellValue>,
    merges: Vec<MergeSpan>,
    col_widths: BTreeMap<u32, f64>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a text cell. Empty text is dropped so degraded lookups keep
    /// the grid sparse instead of filling it with empty strings.
    pub fn set_text(&mut self, row: u32, col: u32, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.set(row, col, CellValue::Text(text));
    }

    pub fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.set(row, col, CellValue::Number(value));
    }

    pub fn set_formula(&mut self, row: u32, col: u32, formula: impl Into<String>) {
        self.set(row, col, CellValue::Formula(formula.into()));
    }

    fn set(&mut self, row: u32, col: u32, value: CellValue) {
        debug_assert!(row >= 1 && col >= 1, "grid coordinates are 1-based");
        self.cells.insert((row, col), value);
    }

    pub fn merge(&mut self, span: MergeSpan) {
        debug_assert!(span.first_row >= 1 && span.first_col >= 1);
        debug_assert!(span.first_row <= span.last_row && span.first_col <= span.last_col);
        self.merges.push(span);
    }

    pub fn set_col_width(&mut self, col: u32, width: f64) {
        self.col_widths.insert(col, width);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = (&(u32, u32), &CellValue)> {
        self.cells.iter()
    }

    pub fn merges(&self) -> &[MergeSpan] {
        &self.merges
    }

    pub fn col_widths(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.col_widths.iter().map(|(&col, &width)| (col, width))
    }

    /// Highest populated row, counting merges.
    pub fn max_row(&self) -> u32 {
        let from_cells = self.cells.keys().map(|&(row, _)| row).max().unwrap_or(0);
        let from_merges = self.merges.iter().map(|m| m.last_row).max().unwrap_or(0);
        from_cells.max(from_merges)
    }
}
