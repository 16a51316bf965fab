use std::io;
use std::path::PathBuf;

use grib2_parser::Grib2Error;
use grid_encoder::EncodeError;
use thiserror::Error;

/// Failures of a processing run. Each maps to a process exit code.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("GRIB file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decompress gzip input: {0}")]
    Decompression(#[source] io::Error),

    /// The file needs a decoder that this build does not include.
    #[error("Required decoding dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Failed to decode GRIB2 data: {0}")]
    Decode(#[source] Grib2Error),

    #[error("Failed to encode grid: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl ProcessorError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProcessorError::InputNotFound(_) => 2,
            _ => 1,
        }
    }
}

impl From<Grib2Error> for ProcessorError {
    fn from(err: Grib2Error) -> Self {
        match err {
            Grib2Error::BackendUnavailable(msg) => ProcessorError::DependencyUnavailable(msg),
            other => ProcessorError::Decode(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
