//! Single-pass orchestration from a decoded dataset to a payload.

use grid_common::Dataset;
use tracing::{debug, info};

use crate::bounds::{extract_bounds, extract_resolution};
use crate::config::{EncoderConfig, ORIGIN};
use crate::error::{EncodeError, Result};
use crate::longitude::normalize_longitude;
use crate::orientation::{normalize_orientation, Oriented};
use crate::payload::Payload;
use crate::quantize::encode_values;
use crate::sample::value_range;
use crate::timestamp::format_timestamp;
use crate::values::{detect_missing_value, normalize_values};

/// Runs the normalization and encoding stages over one dataset.
#[derive(Debug, Clone, Default)]
pub struct GridEncoder {
    config: EncoderConfig,
}

impl GridEncoder {
    /// Create an encoder, rejecting invalid configuration.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Encode the dataset's first data variable.
    ///
    /// Fails with [`EncodeError::NoDataVariable`] when the dataset has no
    /// data variables, and when the axes do not line up with the values.
    /// An unusable time coordinate only clears the timestamp.
    pub fn encode(&self, dataset: Dataset) -> Result<Payload> {
        let variable = dataset
            .primary_variable()
            .ok_or(EncodeError::NoDataVariable)?;
        let (rows, cols) = variable.values.shape();
        dataset.check_axes(rows, cols)?;

        let missing_value = detect_missing_value(variable, &self.config.missing_value_keys);
        let timestamp = format_timestamp(&dataset);

        debug!(
            variable = %variable.name,
            rows,
            cols,
            missing_value = ?missing_value,
            curvilinear = dataset.latitude.is_curvilinear(),
            "Selected data variable"
        );

        let Dataset {
            data_vars,
            latitude,
            longitude,
            ..
        } = dataset;
        let values = data_vars
            .into_iter()
            .next()
            .ok_or(EncodeError::NoDataVariable)?
            .values;

        let longitude = normalize_longitude(longitude);

        let Oriented {
            latitude,
            values,
            flipped,
        } = normalize_orientation(latitude, values);
        let longitude = if flipped && longitude.is_curvilinear() {
            longitude.flip_rows()
        } else {
            longitude
        };

        let samples = normalize_values(values, missing_value, self.config.sentinel_threshold);

        let bounds = extract_bounds(&latitude, &longitude)?;
        let resolution = extract_resolution(&latitude, &longitude);

        let range = value_range(samples.as_slice());
        let encoded = encode_values(samples.as_slice());

        info!(
            rows,
            cols,
            flipped,
            bounds = ?bounds.to_array(),
            lat_step = resolution.lat_step,
            lon_step = resolution.lon_step,
            min = ?range.map(|r| r.0),
            max = ?range.map(|r| r.1),
            "Encoded grid"
        );

        Ok(Payload {
            rows,
            cols,
            bounds: bounds.to_array(),
            lat_step: resolution.lat_step,
            lon_step: resolution.lon_step,
            timestamp,
            min_value: range.map(|(min, _)| f64::from(min)),
            max_value: range.map(|(_, max)| f64::from(max)),
            origin: ORIGIN.to_string(),
            data_encoding: encoded.encoding,
            data: encoded.data,
        })
    }
}

/// Encode a dataset with the default configuration.
pub fn process_dataset(dataset: Dataset) -> Result<Payload> {
    GridEncoder::default().encode(dataset)
}
