//! Common test fixtures: small decoded datasets covering the cases the
//! encoder has to handle.

use chrono::{NaiveDate, NaiveDateTime};
use grid_common::{Axis, CoordinateValues, DataVariable, Dataset, Grid};

/// Common time values for testing.
pub mod time {
    /// A fixed reference time for tests (2025-12-10T12:00:00Z)
    pub const REFERENCE_TIME: &str = "2025-12-10T12:00:00Z";
}

/// The instant behind [`time::REFERENCE_TIME`].
pub fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 10)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid fixture time")
}

/// Dataset with one variable on regular axes and a `time` coordinate.
pub fn regular_dataset(name: &str, latitude: Vec<f64>, longitude: Vec<f64>, rows: Vec<Vec<f64>>) -> Dataset {
    let values = Grid::from_rows(rows).expect("rectangular fixture rows");
    Dataset::new(Axis::Regular(latitude), Axis::Regular(longitude))
        .with_data_var(DataVariable::new(name, values))
        .with_coord("time", CoordinateValues::Temporal(vec![reference_time()]))
}

/// 2x2 grid stored south to north, east of the antimeridian, with one cell
/// holding the declared missing value.
///
/// Latitude `[10, 20]`, longitude `[190, 200]`,
/// values `[[1, 2], [3, -9999]]`, `missing_value = -9999`.
pub fn south_up_with_missing() -> Dataset {
    let values = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, -9999.0]])
        .expect("rectangular fixture rows");
    Dataset::new(
        Axis::Regular(vec![10.0, 20.0]),
        Axis::Regular(vec![190.0, 200.0]),
    )
    .with_data_var(DataVariable::new("t2m", values).with_attr("missing_value", -9999.0))
    .with_coord("time", CoordinateValues::Temporal(vec![reference_time()]))
}

/// A single grid point.
pub fn single_point() -> Dataset {
    regular_dataset("t2m", vec![42.5], vec![-71.25], vec![vec![7.5]])
}

/// Axes and a time coordinate but no data variables.
pub fn without_data_vars() -> Dataset {
    Dataset::new(Axis::Regular(vec![0.0, 1.0]), Axis::Regular(vec![0.0, 1.0]))
        .with_coord("time", CoordinateValues::Temporal(vec![reference_time()]))
}

/// North-up 2x3 grid with no `time` coordinate or variable.
pub fn without_time() -> Dataset {
    let values = Grid::from_rows(vec![vec![0.5, 1.5, 2.5], vec![-0.5, -1.5, -2.5]])
        .expect("rectangular fixture rows");
    Dataset::new(
        Axis::Regular(vec![50.0, 49.0]),
        Axis::Regular(vec![-5.0, -4.0, -3.0]),
    )
    .with_data_var(DataVariable::new("sp", values))
}

/// 3x2 curvilinear grid stored south to north, longitudes in [0, 360).
pub fn curvilinear_south_up() -> Dataset {
    let lat = Grid::from_rows(vec![
        vec![30.0, 30.2],
        vec![31.0, 31.2],
        vec![32.0, 32.2],
    ])
    .expect("rectangular fixture rows");
    let lon = Grid::from_rows(vec![
        vec![250.0, 251.0],
        vec![249.8, 250.8],
        vec![249.6, 250.6],
    ])
    .expect("rectangular fixture rows");
    let values = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
        .expect("rectangular fixture rows");

    Dataset::new(Axis::Curvilinear(lat), Axis::Curvilinear(lon))
        .with_data_var(DataVariable::new("refc", values))
        .with_coord("time", CoordinateValues::Temporal(vec![reference_time()]))
}
