//! GRIB2 parser implementation (WMO FM 92 GRIB Edition 2).
//!
//! Splits a byte stream into messages, parses the sections needed to place
//! and unpack each field, and converts the messages into a
//! [`grid_common::Dataset`] (see [`decode_dataset`]).

pub mod dataset;
mod reader;
pub mod sections;
pub mod tables;
pub mod unpacking;

use grid_common::GridError;
use thiserror::Error;

pub use dataset::{decode_dataset, messages_to_dataset, GRIB_MISSING_VALUE};
pub use reader::{Grib2Message, Grib2Reader};
pub use tables::Grib2Tables;

/// Errors raised while reading GRIB2 data.
#[derive(Debug, Error)]
pub enum Grib2Error {
    #[error("Invalid GRIB2 format: {0}")]
    InvalidFormat(String),

    #[error("Invalid section {section}: {reason}")]
    InvalidSection { section: u8, reason: String },

    #[error("Unsupported template {section}.{template}")]
    UnsupportedTemplate { section: u8, template: u16 },

    #[error("Unpacking failed: {0}")]
    UnpackingError(String),

    /// The packing needs a decoder that was not compiled in.
    #[error("Decoding backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type Result<T> = std::result::Result<T, Grib2Error>;
