//! Encoding constants and runtime configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// Fixed-point multiplier: one decimal digit of precision survives encoding.
pub const SCALE_MULTIPLIER: f32 = 10.0;

/// Raw int16 value reserved for "no data". The scale/round step cannot reach
/// it for realistic meteorological magnitudes.
pub const MISSING_SENTINEL: i16 = i16::MIN;

/// Samples at or below this are treated as sentinel-encoded missing data.
/// Radar products such as MRMS write -999 / -9999 for "no coverage"; no
/// field this encoder serves has physical values this low.
pub const SENTINEL_THRESHOLD: f64 = -100.0;

/// Attribute keys consulted, in order, for a declared missing value.
pub const MISSING_VALUE_KEYS: &[&str] = &["missing_value", "_FillValue"];

/// Fixed raster origin of the encoded buffer.
pub const ORIGIN: &str = "upper-left";

pub const ENCODING_FORMAT: &str = "int16";

pub const ENCODING_DESCRIPTION: &str = "value = (raw * scale) + offset; missing indicates no data";

/// Runtime-tunable parts of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Samples `<=` this value become "no data".
    pub sentinel_threshold: f64,

    /// Attribute keys checked in order for a declared missing value.
    pub missing_value_keys: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            sentinel_threshold: SENTINEL_THRESHOLD,
            missing_value_keys: MISSING_VALUE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl EncoderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_SENTINEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.sentinel_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("GRID_MISSING_VALUE_KEYS") {
            let keys: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
            if !keys.is_empty() {
                config.missing_value_keys = keys;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.sentinel_threshold.is_finite() {
            return Err(EncodeError::InvalidConfig(
                "sentinel_threshold must be finite".to_string(),
            ));
        }

        if self.missing_value_keys.is_empty() {
            return Err(EncodeError::InvalidConfig(
                "missing_value_keys must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = EncoderConfig::default();
        assert_eq!(config.sentinel_threshold, -100.0);
        assert_eq!(config.missing_value_keys, vec!["missing_value", "_FillValue"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_keys() {
        let config = EncoderConfig {
            missing_value_keys: Vec::new(),
            ..EncoderConfig::default()
        };
        assert!(matches!(config.validate(), Err(EncodeError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let config = EncoderConfig {
            sentinel_threshold: f64::NAN,
            ..EncoderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_sentinel_is_int16_min() {
        assert_eq!(MISSING_SENTINEL, -32768);
    }
}
