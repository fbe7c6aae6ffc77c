pub mod class;
pub mod location;
pub mod meeting;

use thiserror::Error;

/// Recoverable failures while reading a class header row.
///
/// Both variants are contained by the assembler: the offending class is
/// dropped and the rest of the table is still processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The row has fewer cells than the header layout requires.
    #[error("row has {found} cells, expected at least {expected}")]
    RowShape { expected: usize, found: usize },

    #[error("first cell has no selectable control")]
    MissingControl,

    #[error("selectable control carries no registration number")]
    MissingIdentifier,

    #[error("column {column} has no anchor for {field}")]
    MissingAnchor { column: usize, field: &'static str },
}

impl ExtractError {
    /// Row-shape problems skip a single row; everything else invalidates the class.
    pub fn is_row_shape(&self) -> bool {
        matches!(self, ExtractError::RowShape { .. })
    }
}
