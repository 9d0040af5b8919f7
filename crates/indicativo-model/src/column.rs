use core::fmt;

use serde::{Deserialize, Serialize};

/// Convert a 1-based column index to its spreadsheet letter label
/// (`1 -> A`, `26 -> Z`, `27 -> AA`).
///
/// The numbering is bijective base-26: there is no zero digit, so every
/// label maps back to exactly one index.
///
/// # Panics
///
/// Panics if `index` is zero. Column indices are 1-based throughout the
/// engine; a zero here is a caller bug, not a recoverable condition.
pub fn column_label(index: u32) -> String {
    assert!(index >= 1, "column index is 1-based, got 0");
    let mut n = index;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).expect("column letters are always valid UTF-8")
}

/// Parse a spreadsheet letter label back to its 1-based column index.
pub fn column_index(label: &str) -> Result<u32, ColumnLabelError> {
    if label.is_empty() {
        return Err(ColumnLabelError::Empty);
    }
    let mut index: u32 = 0;
    for b in label.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(ColumnLabelError::InvalidCharacter);
        }
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        index = index
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or(ColumnLabelError::Overflow)?;
    }
    Ok(index)
}

/// Errors that can occur when parsing a column label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColumnLabelError {
    #[error("empty column label")]
    Empty,
    #[error("column label contains a non-alphabetic character")]
    InvalidCharacter,
    #[error("column label is out of range")]
    Overflow,
}

/// An inclusive, contiguous run of columns, 1-based on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRange {
    pub start: u32,
    pub end: u32,
}

impl ColumnRange {
    /// Construct a range. `start` and `end` are inclusive and must satisfy
    /// `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start >= 1, "column range start is 1-based, got 0");
        assert!(start <= end, "column range start {start} is past end {end}");
        Self { start, end }
    }

    /// Number of columns covered; always at least 1.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    #[inline]
    pub const fn contains(&self, col: u32) -> bool {
        col >= self.start && col <= self.end
    }

    pub fn start_label(&self) -> String {
        column_label(self.start)
    }

    pub fn end_label(&self) -> String {
        column_label(self.end)
    }
}

impl fmt::Display for ColumnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_label(), self.end_label())
    }
}
