//! Error types for the grid encoding pipeline.

use grid_common::GridError;
use thiserror::Error;

/// Errors that abort a pipeline run. No payload is produced.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The dataset declares no data variables.
    #[error("no data variables found in dataset")]
    NoDataVariable,

    /// A coordinate axis has no samples to derive bounds from.
    #[error("{0} axis is empty")]
    EmptyAxis(&'static str),

    /// Axes and values do not line up.
    #[error("inconsistent grid shape: {0}")]
    Shape(#[from] GridError),

    /// An encoded buffer could not be decoded.
    #[error("invalid encoded data: {0}")]
    InvalidEncoding(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

/// A time coordinate that exists but cannot be rendered as a timestamp.
/// Never fatal: the payload's timestamp is left empty instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimestampError {
    #[error("time coordinate is empty")]
    Empty,

    #[error("time value is not temporal: {0}")]
    Unparseable(String),
}

/// Result type for encoder operations.
pub type Result<T> = std::result::Result<T, EncodeError>;
