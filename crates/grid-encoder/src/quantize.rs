//! Fixed-point quantization of normalized grids.
//!
//! Each valid sample is multiplied by [`SCALE_MULTIPLIER`], rounded half to
//! even and stored as a little-endian `i16`; "no data" is stored as
//! [`MISSING_SENTINEL`]. The buffer travels as standard base64 together with
//! an [`EncodingDescriptor`] that states the inverse transform:
//!
//! ```text
//! value = raw * scale + offset      (raw == missing  =>  no data)
//! ```
//!
//! Values whose scaled magnitude leaves the `i16` range saturate to
//! `i16::MIN + 1 ..= i16::MAX` and never collide with the sentinel; callers
//! must not rely on their decoded value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::config::{
    ENCODING_DESCRIPTION, ENCODING_FORMAT, MISSING_SENTINEL, SCALE_MULTIPLIER,
};
use crate::error::{EncodeError, Result};
use crate::sample::Sample;

/// Recipe for turning raw integers back into values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingDescriptor {
    pub format: String,
    pub scale: f64,
    pub offset: f64,
    pub missing: i16,
    pub description: String,
}

impl Default for EncodingDescriptor {
    fn default() -> Self {
        Self {
            format: ENCODING_FORMAT.to_string(),
            scale: 1.0 / f64::from(SCALE_MULTIPLIER),
            offset: 0.0,
            missing: MISSING_SENTINEL,
            description: ENCODING_DESCRIPTION.to_string(),
        }
    }
}

impl EncodingDescriptor {
    /// Apply the inverse transform to one raw value.
    pub fn decode_raw(&self, raw: i16) -> Option<f64> {
        if raw == self.missing {
            None
        } else {
            Some(f64::from(raw) * self.scale + self.offset)
        }
    }
}

/// Base64 text and the descriptor needed to decode it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedGrid {
    pub data: String,
    pub encoding: EncodingDescriptor,
}

/// Quantize one sample to its raw fixed-point value.
pub fn quantize_sample(sample: Sample) -> i16 {
    match sample {
        // `as` saturates; the clamp keeps large negatives off the sentinel
        Sample::Value(v) => {
            ((v * SCALE_MULTIPLIER).round_ties_even() as i16).max(MISSING_SENTINEL + 1)
        }
        Sample::NoData => MISSING_SENTINEL,
    }
}

/// Quantize samples into the raw little-endian `i16` byte buffer.
pub fn quantize<'a, I>(samples: I) -> BytesMut
where
    I: IntoIterator<Item = &'a Sample>,
    I::IntoIter: ExactSizeIterator,
{
    let samples = samples.into_iter();
    let mut buf = BytesMut::with_capacity(samples.len() * std::mem::size_of::<i16>());
    for sample in samples {
        buf.put_i16_le(quantize_sample(*sample));
    }
    buf
}

/// Quantize row-major samples and render them as base64.
pub fn encode_values(samples: &[Sample]) -> EncodedGrid {
    let raw = quantize(samples);
    EncodedGrid {
        data: STANDARD.encode(&raw),
        encoding: EncodingDescriptor::default(),
    }
}

/// Decode base64 text back into samples using `encoding`.
pub fn decode_values(data: &str, encoding: &EncodingDescriptor) -> Result<Vec<Sample>> {
    if encoding.format != ENCODING_FORMAT {
        return Err(EncodeError::InvalidEncoding(format!(
            "unsupported format '{}'",
            encoding.format
        )));
    }

    let bytes = STANDARD
        .decode(data)
        .map_err(|e| EncodeError::InvalidEncoding(e.to_string()))?;

    if bytes.len() % 2 != 0 {
        return Err(EncodeError::InvalidEncoding(format!(
            "odd byte length {} for int16 data",
            bytes.len()
        )));
    }

    let mut buf = bytes.as_slice();
    let mut samples = Vec::with_capacity(bytes.len() / 2);
    while buf.has_remaining() {
        let raw = buf.get_i16_le();
        samples.push(Sample::from(encoding.decode_raw(raw).map(|v| v as f32)));
    }
    Ok(samples)
}
