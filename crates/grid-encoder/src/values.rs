//! Missing-value detection and sample normalization.

use grid_common::{AttrValue, DataVariable, Grid};
use tracing::debug;

use crate::sample::Sample;

/// Read the declared missing value from the first candidate attribute key
/// that is present. A present but non-numeric value declares nothing; later
/// keys are not consulted.
pub fn detect_missing_value<S: AsRef<str>>(variable: &DataVariable, keys: &[S]) -> Option<f64> {
    keys.iter()
        .find_map(|key| variable.attr(key.as_ref()))
        .and_then(AttrValue::as_f64)
}

/// Sentinel policy: raw values at or below `threshold` encode "no data".
///
/// This is a blanket cut, so it would also drop a genuine measurement below
/// the threshold. Keep every sentinel decision going through here.
pub fn is_sentinel_value(value: f64, threshold: f64) -> bool {
    value <= threshold
}

/// Normalize one raw sample.
pub fn normalize_sample(value: f64, missing_value: Option<f64>, threshold: f64) -> Sample {
    if !value.is_finite() {
        return Sample::NoData;
    }
    if missing_value.is_some_and(|missing| value == missing) {
        return Sample::NoData;
    }
    if is_sentinel_value(value, threshold) {
        return Sample::NoData;
    }
    Sample::Value(value as f32)
}

/// Turn raw decoder output into single-precision samples with explicit gaps.
///
/// Samples equal to `missing_value`, samples caught by the sentinel policy,
/// and non-finite samples all become [`Sample::NoData`].
pub fn normalize_values(values: Grid<f64>, missing_value: Option<f64>, threshold: f64) -> Grid<Sample> {
    let normalized = values.map(|v| normalize_sample(v, missing_value, threshold));

    let no_data = normalized.as_slice().iter().filter(|s| s.is_no_data()).count();
    debug!(
        total = normalized.len(),
        no_data,
        missing_value = ?missing_value,
        "Normalized sample values"
    );

    normalized
}
