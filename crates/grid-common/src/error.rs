//! Error types for the decoded grid model.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Shape violations when assembling grids, axes and datasets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("buffer of {actual} samples does not fill a {rows}x{cols} grid")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} samples, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{axis} axis has shape {actual:?}, expected it to align with a {rows}x{cols} grid")]
    AxisMismatch {
        axis: &'static str,
        rows: usize,
        cols: usize,
        actual: (usize, usize),
    },
}
