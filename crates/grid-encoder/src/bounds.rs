//! Geographic envelope and resolution of a normalized grid.

use grid_common::{Axis, Dimension};
use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, Result};

/// A geographic bounding box in degrees, always with `south <= north` and
/// `west <= east`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Build bounds from two latitude and two longitude edges in any order.
    pub fn from_edges(lat_a: f64, lat_b: f64, lon_a: f64, lon_b: f64) -> Self {
        Self {
            south: lat_a.min(lat_b),
            west: lon_a.min(lon_b),
            north: lat_a.max(lat_b),
            east: lon_a.max(lon_b),
        }
    }

    /// `[south, west, north, east]`, the order map clients expect.
    pub fn to_array(&self) -> [f64; 4] {
        [self.south, self.west, self.north, self.east]
    }

    /// Width of the box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// True when the box collapses to a single point.
    pub fn is_point(&self) -> bool {
        self.width() == 0.0 && self.height() == 0.0
    }
}

/// Absolute spacing between adjacent samples along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub lat_step: f64,
    pub lon_step: f64,
}

/// Derive the bounding box from the first and last samples of each axis.
///
/// North/south come from the latitude axis' first column, west/east from
/// the longitude axis' first row. The pairs are reordered afterwards, so the
/// result is valid whatever direction the axes run.
pub fn extract_bounds(latitude: &Axis, longitude: &Axis) -> Result<Bounds> {
    let north = latitude
        .first(Dimension::Rows)
        .ok_or(EncodeError::EmptyAxis("latitude"))?;
    let south = latitude
        .last(Dimension::Rows)
        .ok_or(EncodeError::EmptyAxis("latitude"))?;
    let west = longitude
        .first(Dimension::Columns)
        .ok_or(EncodeError::EmptyAxis("longitude"))?;
    let east = longitude
        .last(Dimension::Columns)
        .ok_or(EncodeError::EmptyAxis("longitude"))?;

    Ok(Bounds::from_edges(south, north, west, east))
}

/// Step between the first two samples of an axis, `0.0` if there is only one.
pub fn compute_step(axis: &Axis, along: Dimension) -> f64 {
    axis.leading_pair(along)
        .map_or(0.0, |(first, second)| (second - first).abs())
}

/// Latitude step down the first column and longitude step along the first row.
pub fn extract_resolution(latitude: &Axis, longitude: &Axis) -> Resolution {
    Resolution {
        lat_step: compute_step(latitude, Dimension::Rows),
        lon_step: compute_step(longitude, Dimension::Columns),
    }
}
