//! Conversion of parsed GRIB2 messages into a [`Dataset`].
//!
//! Each distinct parameter becomes one data variable, in message order.
//! The first message defines the grid; later messages on a different grid
//! are skipped.

use std::collections::HashSet;

use bytes::Bytes;
use grid_common::{Axis, CoordinateValues, DataVariable, Dataset, Grid};
use projection::LambertConformal;
use tracing::{debug, warn};

use crate::reader::{Grib2Message, Grib2Reader};
use crate::sections::{GridDefinition, GridTemplate};
use crate::{Grib2Error, Result};

/// Fill value written for bitmap-masked points, advertised through the
/// variable's `missing_value` attribute.
pub const GRIB_MISSING_VALUE: f64 = 9999.0;

/// Read every message in `data` and build a dataset from them.
pub fn decode_dataset(data: Bytes) -> Result<Dataset> {
    let messages = Grib2Reader::new(data).messages()?;
    messages_to_dataset(&messages)
}

/// Build a dataset from already parsed messages.
///
/// An empty slice yields a dataset with no data variables.
pub fn messages_to_dataset(messages: &[Grib2Message]) -> Result<Dataset> {
    let Some(first) = messages.first() else {
        return Ok(Dataset::empty());
    };

    let grid = &first.grid_definition;
    let (latitude, longitude) = build_axes(grid)?;

    let mut dataset = Dataset::new(latitude, longitude).with_coord(
        "time",
        CoordinateValues::Temporal(vec![first.reference_time().naive_utc()]),
    );
    if let Some(valid_time) = first.valid_time() {
        dataset = dataset.with_coord(
            "valid_time",
            CoordinateValues::Temporal(vec![valid_time.naive_utc()]),
        );
    }
    if let Some(offset) = first.product_definition.forecast_offset() {
        dataset = dataset.with_coord(
            "step",
            CoordinateValues::Numeric(vec![offset.num_seconds() as f64 / 3600.0]),
        );
    }

    let mut seen = HashSet::new();
    for message in messages {
        if message.grid_definition != *grid {
            warn!(
                parameter = message.parameter(),
                "Skipping message on a different grid"
            );
            continue;
        }
        if !seen.insert(message.parameter().to_string()) {
            debug!(parameter = message.parameter(), "Skipping repeated parameter");
            continue;
        }
        dataset = dataset.with_data_var(message_to_variable(message)?);
    }

    Ok(dataset)
}

fn message_to_variable(message: &Grib2Message) -> Result<DataVariable> {
    let grid = &message.grid_definition;
    let (ni, nj) = (grid.ni as usize, grid.nj as usize);

    let unpacked = message.unpack_data()?;
    if unpacked.len() != ni * nj {
        return Err(Grib2Error::InvalidSection {
            section: 7,
            reason: format!(
                "Decoded {} values for a {}x{} grid",
                unpacked.len(),
                nj,
                ni
            ),
        });
    }

    let has_missing = unpacked.iter().any(Option::is_none);
    let raw: Vec<f64> = unpacked
        .into_iter()
        .map(|v| v.map_or(GRIB_MISSING_VALUE, f64::from))
        .collect();
    let values = grid.scanning_mode.arrange(ni, nj, raw)?;

    let product = &message.product_definition;
    let mut variable = DataVariable::new(product.parameter_short_name.clone(), values)
        .with_attr("GRIB_shortName", product.parameter_short_name.as_str())
        .with_attr("GRIB_discipline", f64::from(message.indicator.discipline))
        .with_attr("GRIB_parameterCategory", f64::from(product.parameter_category))
        .with_attr("GRIB_parameterNumber", f64::from(product.parameter_number))
        .with_attr("GRIB_typeOfLevel", product.level_description.as_str())
        .with_attr("GRIB_level", product.level_value)
        .with_attr("GRIB_gridType", grid_type(grid));
    if has_missing {
        variable = variable.with_attr("missing_value", GRIB_MISSING_VALUE);
    }

    Ok(variable)
}

fn grid_type(grid: &GridDefinition) -> &'static str {
    match grid.template {
        GridTemplate::LatLon(_) => "regular_ll",
        GridTemplate::LambertConformal(_) => "lambert",
    }
}

/// Latitude and longitude axes for the grid, columns west to east and rows
/// in scan order. Longitudes are in [0, 360).
fn build_axes(grid: &GridDefinition) -> Result<(Axis, Axis)> {
    let (ni, nj) = (grid.ni as usize, grid.nj as usize);
    let scan = grid.scanning_mode;
    let i_step = if scan.i_negative { -1 } else { 1 };
    let j_step = if scan.j_positive { 1 } else { -1 };

    match &grid.template {
        GridTemplate::LatLon(ll) => {
            let latitude = regular_axis(ll.la1, ll.la2, ll.dj, nj, j_step);
            let mut longitude: Vec<f64> = regular_axis(ll.lo1, ll.lo2, ll.di, ni, i_step)
                .into_iter()
                .map(to_east_positive)
                .collect();
            if scan.i_negative {
                longitude.reverse();
            }
            Ok((Axis::Regular(latitude), Axis::Regular(longitude)))
        }
        GridTemplate::LambertConformal(lc) => {
            let proj = LambertConformal::from_grib2(
                lc.la1, lc.lo1, lc.lov, lc.latin1, lc.latin2, lc.dx, lc.dy, ni, nj,
            );
            let (lats, lons) = proj.coordinate_fields(f64::from(i_step), f64::from(j_step));
            let lons = lons.into_iter().map(to_east_positive).collect();

            let mut latitude = Grid::new(nj, ni, lats)?;
            let mut longitude = Grid::new(nj, ni, lons)?;
            if scan.i_negative {
                latitude = latitude.flip_columns();
                longitude = longitude.flip_columns();
            }
            Ok((Axis::Curvilinear(latitude), Axis::Curvilinear(longitude)))
        }
    }
}

/// Evenly spaced axis in scan order, computed in microdegrees.
///
/// Uses the declared increment when present, otherwise divides the span
/// between the first and last points.
fn regular_axis(
    first: i32,
    last: i32,
    increment: Option<u32>,
    n: usize,
    direction: i32,
) -> Vec<f64> {
    let first = i64::from(first);
    match (increment.filter(|&d| d > 0), n) {
        (_, 0) => Vec::new(),
        (Some(d), _) => (0..n as i64)
            .map(|k| (first + i64::from(direction) * k * i64::from(d)) as f64 / 1e6)
            .collect(),
        (None, 1) => vec![first as f64 / 1e6],
        (None, _) => {
            let span = (i64::from(last) - first) as f64;
            (0..n)
                .map(|k| (first as f64 + span * k as f64 / (n - 1) as f64) / 1e6)
                .collect()
        }
    }
}

fn to_east_positive(lon: f64) -> f64 {
    lon.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_axis_with_increment() {
        let axis = regular_axis(45_000_000, 35_000_000, Some(5_000_000), 3, -1);
        assert_eq!(axis, vec![45.0, 40.0, 35.0]);
    }

    #[test]
    fn test_regular_axis_without_increment() {
        let axis = regular_axis(0, 2_000_000, None, 3, 1);
        assert_eq!(axis, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_regular_axis_single_point() {
        assert_eq!(regular_axis(10_000_000, 10_000_000, None, 1, 1), vec![10.0]);
        assert!(regular_axis(0, 0, Some(1), 0, 1).is_empty());
    }

    #[test]
    fn test_microdegree_steps_stay_exact() {
        let axis = regular_axis(230_005_000, 0, Some(10_000), 3, 1);
        assert_eq!(axis, vec![230.005, 230.015, 230.025]);
    }

    #[test]
    fn test_east_positive() {
        assert_eq!(to_east_positive(-10.0), 350.0);
        assert_eq!(to_east_positive(360.0), 0.0);
        assert_eq!(to_east_positive(230.0), 230.0);
    }

    #[test]
    fn test_empty_messages() {
        let ds = messages_to_dataset(&[]).unwrap();
        assert!(ds.data_vars.is_empty());
    }
}
