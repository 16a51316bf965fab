//! Dataset timestamp extraction.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use grid_common::{CoordinateValues, Dataset};
use tracing::warn;

use crate::error::TimestampError;

/// Name of the time coordinate/variable.
pub const TIME_NAME: &str = "time";

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// ISO-8601 UTC timestamp (second precision) of the dataset's `time`
/// coordinate, or `None` when there is none or it cannot be formatted.
pub fn format_timestamp(dataset: &Dataset) -> Option<String> {
    let values = dataset.coordinate_or_variable(TIME_NAME)?;

    match format_time_value(values) {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable time coordinate");
            None
        }
    }
}

/// Format the first element of a time coordinate.
pub fn format_time_value(values: &CoordinateValues) -> Result<String, TimestampError> {
    let datetime = match values {
        CoordinateValues::Temporal(times) => *times.first().ok_or(TimestampError::Empty)?,
        CoordinateValues::Text(texts) => {
            let text = texts.first().ok_or(TimestampError::Empty)?;
            parse_iso8601(text).ok_or_else(|| TimestampError::Unparseable(text.clone()))?
        }
        CoordinateValues::Numeric(numbers) => {
            let number = numbers.first().ok_or(TimestampError::Empty)?;
            return Err(TimestampError::Unparseable(number.to_string()));
        }
    };

    let mut iso = datetime.format(SECONDS_FORMAT).to_string();
    if !iso.ends_with('Z') {
        iso.push('Z');
    }
    Ok(iso)
}

/// Parse an ISO-8601 / RFC 3339 string as a UTC datetime.
fn parse_iso8601(s: &str) -> Option<NaiveDateTime> {
    // Full datetime with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    // No offset (assume UTC), optional fractional seconds
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt);
    }

    // Date only
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
