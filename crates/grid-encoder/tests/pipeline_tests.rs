//! End-to-end tests of the dataset → payload pipeline.

use grid_common::{Axis, CoordinateValues, DataVariable, Dataset, Grid};
use grid_encoder::{
    decode_values, process_dataset, EncodeError, EncoderConfig, GridEncoder, Payload, Sample,
};
use test_utils::{assert_approx_eq, fixtures};

fn decoded(payload: &Payload) -> Vec<Sample> {
    decode_values(&payload.data, &payload.data_encoding).unwrap()
}

#[test]
fn test_south_up_grid_with_missing_value() {
    let payload = process_dataset(fixtures::south_up_with_missing()).unwrap();

    assert_eq!(payload.rows, 2);
    assert_eq!(payload.cols, 2);
    assert_eq!(payload.bounds, [10.0, -170.0, 20.0, -160.0]);
    assert_eq!(payload.lat_step, 10.0);
    assert_eq!(payload.lon_step, 10.0);
    assert_eq!(payload.min_value, Some(1.0));
    assert_eq!(payload.max_value, Some(3.0));
    assert_eq!(payload.timestamp.as_deref(), Some(fixtures::time::REFERENCE_TIME));
    assert_eq!(payload.origin, "upper-left");

    // Row 0 is latitude 20 after the flip: [3, missing], then [1, 2]
    assert_eq!(payload.data, "HgAAgAoAFAA=");
    let samples = decoded(&payload);
    assert_eq!(samples.len(), 4);
    assert_approx_eq!(samples[0].value().unwrap(), 3.0, 1e-6);
    assert!(samples[1].is_no_data());
    assert_approx_eq!(samples[2].value().unwrap(), 1.0, 1e-6);
    assert_approx_eq!(samples[3].value().unwrap(), 2.0, 1e-6);
}

#[test]
fn test_single_point_collapses_bounds() {
    let payload = process_dataset(fixtures::single_point()).unwrap();

    assert_eq!((payload.rows, payload.cols), (1, 1));
    assert_eq!(payload.lat_step, 0.0);
    assert_eq!(payload.lon_step, 0.0);
    let [south, west, north, east] = payload.bounds;
    assert_eq!(south, north);
    assert_eq!(west, east);
    assert_eq!(payload.bounds, [42.5, -71.25, 42.5, -71.25]);
}

#[test]
fn test_no_data_variables_fails() {
    let err = process_dataset(fixtures::without_data_vars()).unwrap_err();
    assert!(matches!(err, EncodeError::NoDataVariable));
}

#[test]
fn test_missing_time_gives_null_timestamp() {
    let payload = process_dataset(fixtures::without_time()).unwrap();

    assert_eq!(payload.timestamp, None);
    assert_eq!((payload.rows, payload.cols), (2, 3));
    assert_eq!(payload.bounds, [49.0, -5.0, 50.0, -3.0]);
    assert_eq!(payload.min_value, Some(-2.5));
    assert_eq!(payload.max_value, Some(2.5));

    let json = payload.to_json_line().unwrap();
    assert!(json.contains("\"timestamp\":null"));
}

#[test]
fn test_bounds_ordered_for_every_axis_direction() {
    let lat_orders = [vec![-30.0, -20.0, -10.0], vec![-10.0, -20.0, -30.0]];
    let lon_orders = [vec![100.0, 110.0], vec![110.0, 100.0]];

    for lat in &lat_orders {
        for lon in &lon_orders {
            let ds = fixtures::regular_dataset(
                "v",
                lat.clone(),
                lon.clone(),
                vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            );
            let payload = process_dataset(ds).unwrap();
            let [south, west, north, east] = payload.bounds;
            assert!(south <= north, "lat {:?} lon {:?}", lat, lon);
            assert!(west <= east, "lat {:?} lon {:?}", lat, lon);
            assert_eq!(payload.bounds, [-30.0, 100.0, -10.0, 110.0]);
        }
    }
}

#[test]
fn test_north_up_grid_is_not_flipped() {
    let ds = fixtures::regular_dataset(
        "v",
        vec![20.0, 10.0],
        vec![0.0, 1.0],
        vec![vec![1.0, 2.0], vec![3.0, 4.0]],
    );
    let samples = decoded(&process_dataset(ds).unwrap());
    let values: Vec<f32> = samples.iter().filter_map(|s| s.value()).collect();
    assert_eq!(values.len(), 4);
    assert_approx_eq!(values[0], 1.0, 1e-6);
    assert_approx_eq!(values[3], 4.0, 1e-6);
}

#[test]
fn test_flipping_twice_restores_layout() {
    // Encoding a south-up grid equals encoding its north-up twin
    let south_up = fixtures::regular_dataset(
        "v",
        vec![0.0, 5.0, 10.0],
        vec![0.0],
        vec![vec![1.0], vec![2.0], vec![3.0]],
    );
    let north_up = fixtures::regular_dataset(
        "v",
        vec![10.0, 5.0, 0.0],
        vec![0.0],
        vec![vec![3.0], vec![2.0], vec![1.0]],
    );
    let a = process_dataset(south_up).unwrap();
    let b = process_dataset(north_up).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_sentinels_and_nan_become_no_data() {
    let ds = fixtures::regular_dataset(
        "v",
        vec![1.0],
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![vec![-99.9, -100.0, -9999.0, f64::NAN, 0.0]],
    );
    let payload = process_dataset(ds).unwrap();
    let samples = decoded(&payload);

    assert!(!samples[0].is_no_data());
    assert!(samples[1].is_no_data());
    assert!(samples[2].is_no_data());
    assert!(samples[3].is_no_data());
    assert_eq!(samples[4], Sample::Value(0.0));
    assert_approx_eq!(payload.min_value.unwrap(), -99.9, 1e-4);
    assert_eq!(payload.max_value, Some(0.0));
}

#[test]
fn test_fill_value_attribute_fallback() {
    let values = Grid::from_rows(vec![vec![7.0, 42.0]]).unwrap();
    let ds = Dataset::new(Axis::Regular(vec![0.0]), Axis::Regular(vec![0.0, 1.0]))
        .with_data_var(DataVariable::new("v", values).with_attr("_FillValue", 42.0));
    let payload = process_dataset(ds).unwrap();

    assert_eq!(payload.min_value, Some(7.0));
    assert_eq!(payload.max_value, Some(7.0));
    assert!(decoded(&payload)[1].is_no_data());
}

#[test]
fn test_all_missing_grid_has_null_range() {
    let ds = fixtures::regular_dataset("v", vec![0.0], vec![0.0, 1.0], vec![vec![-500.0, -999.0]]);
    let payload = process_dataset(ds).unwrap();

    assert_eq!(payload.min_value, None);
    assert_eq!(payload.max_value, None);
    assert!(decoded(&payload).iter().all(|s| s.is_no_data()));
}

#[test]
fn test_only_first_variable_is_encoded() {
    let ds = fixtures::without_time().with_data_var(DataVariable::new(
        "other",
        Grid::new(2, 3, vec![100.0; 6]).unwrap(),
    ));
    let payload = process_dataset(ds).unwrap();
    assert_eq!(payload.max_value, Some(2.5));
}

#[test]
fn test_curvilinear_grid_flips_both_axes() {
    let payload = process_dataset(fixtures::curvilinear_south_up()).unwrap();

    assert_eq!((payload.rows, payload.cols), (3, 2));
    // North from the flipped first row, south from the flipped last row
    assert_eq!(payload.bounds[0], 30.0);
    assert_eq!(payload.bounds[2], 32.0);
    // Longitudes come from the first row after the flip (249.6, 250.6)
    assert_approx_eq!(payload.bounds[1], 249.6 - 360.0, 1e-9);
    assert_approx_eq!(payload.bounds[3], 250.6 - 360.0, 1e-9);
    assert_approx_eq!(payload.lat_step, 1.0, 1e-9);
    assert_approx_eq!(payload.lon_step, 1.0, 1e-9);

    let values: Vec<f32> = decoded(&payload).iter().filter_map(|s| s.value()).collect();
    assert_eq!(values.len(), 6);
    assert_approx_eq!(values[0], 5.0, 1e-6);
    assert_approx_eq!(values[5], 2.0, 1e-6);
}

#[test]
fn test_text_time_variable() {
    let ds = fixtures::without_time().with_variable(
        "time",
        CoordinateValues::Text(vec!["2025-12-10T06:30:00+00:00".to_string()]),
    );
    let payload = process_dataset(ds).unwrap();
    assert_eq!(payload.timestamp.as_deref(), Some("2025-12-10T06:30:00Z"));
}

#[test]
fn test_custom_missing_value_keys() {
    let config = EncoderConfig {
        missing_value_keys: vec!["no_data".to_string()],
        ..EncoderConfig::default()
    };
    let values = Grid::from_rows(vec![vec![5.0, 6.0]]).unwrap();
    let ds = Dataset::new(Axis::Regular(vec![0.0]), Axis::Regular(vec![0.0, 1.0])).with_data_var(
        DataVariable::new("v", values)
            .with_attr("no_data", 6.0)
            .with_attr("missing_value", 5.0),
    );

    let payload = GridEncoder::new(config).unwrap().encode(ds).unwrap();
    assert_eq!(payload.min_value, Some(5.0));
    assert_eq!(payload.max_value, Some(5.0));
}

#[test]
fn test_roundtrip_within_quantization_error() {
    let rows = vec![
        vec![-50.04, 0.0, 0.05],
        vec![12.34, 273.15, 3276.7],
    ];
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    let ds = fixtures::regular_dataset("v", vec![1.0, 0.0], vec![0.0, 1.0, 2.0], rows);

    let samples = decoded(&process_dataset(ds).unwrap());
    for (original, sample) in flat.iter().zip(&samples) {
        let value = sample.value().unwrap();
        assert!(
            (f64::from(value) - original).abs() <= 0.05 + 1e-3,
            "{} decoded as {}",
            original,
            value
        );
    }
}
