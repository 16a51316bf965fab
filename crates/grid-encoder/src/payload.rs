//! The JSON document handed to map clients.

use serde::{Deserialize, Serialize};

use crate::quantize::EncodingDescriptor;

/// Encoded grid with everything a client needs to place and decode it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub rows: usize,
    pub cols: usize,
    /// `[south, west, north, east]`
    pub bounds: [f64; 4],
    pub lat_step: f64,
    pub lon_step: f64,
    pub timestamp: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub origin: String,
    pub data_encoding: EncodingDescriptor,
    /// Base64 of `rows * cols` little-endian int16 values, row-major.
    pub data: String,
}

impl Payload {
    /// Serialize as a single line of compact JSON.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        Payload {
            rows: 1,
            cols: 2,
            bounds: [10.0, -170.0, 20.0, -160.0],
            lat_step: 0.0,
            lon_step: 10.0,
            timestamp: None,
            min_value: Some(1.0),
            max_value: None,
            origin: "upper-left".to_string(),
            data_encoding: EncodingDescriptor::default(),
            data: "CgAUAA==".to_string(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = payload().to_json_line().unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with("{\"rows\":1,\"cols\":2,\"bounds\":[10.0,-170.0,20.0,-160.0]"));
        assert!(json.contains("\"latStep\":0.0"));
        assert!(json.contains("\"timestamp\":null"));
        assert!(json.contains("\"maxValue\":null"));
        assert!(json.contains("\"origin\":\"upper-left\""));
        assert!(json.contains(
            "\"dataEncoding\":{\"format\":\"int16\",\"scale\":0.1,\"offset\":0.0,\"missing\":-32768,"
        ));
    }

    #[test]
    fn test_json_parses_back() {
        let json = payload().to_json_line().unwrap();
        let back: Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload());
    }
}
