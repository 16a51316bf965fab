//! Longitude domain normalization.

use grid_common::Axis;

/// Map a longitude east of 180° into the western hemisphere.
///
/// 180.0 itself is kept so an eastern edge on the antimeridian does not
/// collapse onto the western edge.
pub fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Rewrite every value of a longitude axis with [`wrap_longitude`].
pub fn normalize_longitude(axis: Axis) -> Axis {
    axis.map(wrap_longitude)
}
