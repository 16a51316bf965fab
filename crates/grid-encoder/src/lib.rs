//! Grid normalization and fixed-point encoding for map clients.
//!
//! Takes a decoded [`grid_common::Dataset`] and produces a [`Payload`]:
//!
//! 1. longitudes above 180 are shifted by -360 into [-180, 180] ([`longitude`]),
//! 2. the grid is flipped so row 0 is the northernmost row ([`orientation`]),
//! 3. fill values and sentinels become explicit gaps ([`values`]),
//! 4. bounds and steps are read off the axes ([`bounds`]),
//! 5. samples are quantized to `i16` and base64-encoded ([`quantize`]).
//!
//! [`GridEncoder`] runs these stages in order; each stage consumes the
//! previous stage's output.

pub mod bounds;
pub mod config;
pub mod error;
pub mod longitude;
pub mod orientation;
pub mod payload;
pub mod pipeline;
pub mod quantize;
pub mod sample;
pub mod timestamp;
pub mod values;

pub use bounds::{extract_bounds, extract_resolution, Bounds, Resolution};
pub use config::EncoderConfig;
pub use error::{EncodeError, Result, TimestampError};
pub use longitude::{normalize_longitude, wrap_longitude};
pub use orientation::{normalize_orientation, Oriented};
pub use payload::Payload;
pub use pipeline::{process_dataset, GridEncoder};
pub use quantize::{decode_values, encode_values, EncodedGrid, EncodingDescriptor};
pub use sample::Sample;
pub use timestamp::format_timestamp;
pub use values::{detect_missing_value, is_sentinel_value, normalize_values};
