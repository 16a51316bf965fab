//! Decoding synthetic GRIB2 messages into datasets.

use bytes::Bytes;
use chrono::{Duration, TimeZone, Utc};
use grib2_parser::{decode_dataset, Grib2Error, Grib2Reader, Grib2Tables, GRIB_MISSING_VALUE};
use grid_common::{AttrValue, Axis, CoordinateValues};
use test_utils::{assert_approx_eq, assert_coords_approx_eq, create_test_grid, Grib2Builder};

fn decode(builder: &Grib2Builder) -> grid_common::Dataset {
    decode_dataset(Bytes::from(builder.build())).expect("decode synthetic message")
}

fn regular(axis: &Axis) -> &[f64] {
    match axis {
        Axis::Regular(values) => values,
        Axis::Curvilinear(_) => panic!("expected a regular axis"),
    }
}

/// Byte offset of a section within a single message
#[cfg_attr(feature = "extended-packing", allow(dead_code))]
fn section_offset(message: &[u8], number: u8) -> usize {
    let mut offset = 16;
    loop {
        let len = u32::from_be_bytes(message[offset..offset + 4].try_into().unwrap()) as usize;
        if message[offset + 4] == number {
            return offset;
        }
        offset += len;
    }
}

#[test]
fn test_parse_gfs_sections() {
    let bytes = Bytes::from(Grib2Builder::new_gfs().with_forecast_hour(6).build());
    let mut reader = Grib2Reader::new(bytes);
    let msg = reader.next_message().unwrap().expect("one message");

    assert_eq!(msg.indicator.discipline, 0);
    assert_eq!(msg.indicator.message_length as usize, msg.raw.len());
    assert_eq!(msg.identification.center, 7);
    assert_eq!(
        msg.reference_time(),
        Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap()
    );
    assert_eq!(msg.grid_dims(), (10, 10));
    assert_eq!(msg.grid_definition.template_number, 0);
    assert_eq!(msg.parameter(), "TMP");
    assert_eq!(msg.product_definition.level_description, "2 m above ground");
    assert_eq!(msg.product_definition.forecast_time, 6);
    assert_eq!(msg.data_representation.template_number, 0);
    assert!(msg.bitmap.is_none());

    assert!(reader.next_message().unwrap().is_none());
}

#[test]
fn test_isobaric_level_and_reference_time() {
    let bytes = Bytes::from(
        Grib2Builder::new_gfs()
            .with_reference_time(2024, 7, 1, 18)
            .with_level(100, 50_000)
            .build(),
    );
    let msg = Grib2Reader::new(bytes).next_message().unwrap().unwrap();

    assert_eq!(msg.product_definition.level_value, 50_000.0);
    assert_eq!(msg.product_definition.level_description, "500 mb");
    assert_eq!(
        msg.reference_time(),
        Utc.with_ymd_and_hms(2024, 7, 1, 18, 0, 0).unwrap()
    );
}

#[test]
fn test_mrms_discipline_lookup() {
    let ds = decode(
        &Grib2Builder::new_gfs()
            .with_discipline(209)
            .with_parameter(1, 0),
    );
    let var = &ds.data_vars[0];
    assert_eq!(var.name, "PrecipRate");
    assert_eq!(var.attr("GRIB_discipline"), Some(&AttrValue::Number(209.0)));
}

#[test]
fn test_custom_tables() {
    let mut tables = Grib2Tables::new();
    tables.add_parameter(0, 0, 0, "T2M".to_string());
    let bytes = Bytes::from(Grib2Builder::new_gfs().build());

    let msg = Grib2Reader::with_tables(bytes, tables)
        .next_message()
        .unwrap()
        .unwrap();
    assert_eq!(msg.parameter(), "T2M");
    assert_eq!(msg.product_definition.level_description, "Level type 103 value 2");
}

#[test]
fn test_north_to_south_axes() {
    let ds = decode(&Grib2Builder::new_gfs());

    let lat = regular(&ds.latitude);
    let lon = regular(&ds.longitude);
    assert_eq!(lat.len(), 10);
    assert_eq!(lat[0], 45.0);
    assert_eq!(lat[9], 36.0);
    assert_eq!(lon[0], 230.0);
    assert_eq!(lon[9], 239.0);

    assert_eq!(ds.data_vars.len(), 1);
    assert_eq!(ds.data_vars[0].name, "TMP");
    assert_eq!(ds.data_vars[0].values.shape(), (10, 10));
}

#[test]
fn test_values_survive_simple_packing() {
    let data = create_test_grid(10, 10);
    let ds = decode(&Grib2Builder::new_gfs().with_data(data.clone()));

    let values = ds.data_vars[0].values.as_slice();
    for (decoded, expected) in values.iter().zip(&data) {
        assert_approx_eq!(*decoded, *expected, 1e-3);
    }
    // Row 1, column 2 holds col * 1000 + row
    assert_approx_eq!(*ds.data_vars[0].values.get(1, 2).unwrap(), 2001.0, 1e-3);
}

#[test]
fn test_constant_field() {
    let ds = decode(&Grib2Builder::new_gfs().with_grid(4, 3).with_constant_value(288.15));
    assert!(ds.data_vars[0]
        .values
        .as_slice()
        .iter()
        .all(|&v| (v - 288.15).abs() < 1e-4));
    assert!(ds.data_vars[0].attr("missing_value").is_none());
}

#[test]
fn test_bitmap_points_filled_and_flagged() {
    let builder = Grib2Builder::new_gfs()
        .with_grid(3, 2)
        .with_masked_data(vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0), None]);
    let ds = decode(&builder);
    let var = &ds.data_vars[0];

    assert_eq!(var.attr("missing_value"), Some(&AttrValue::Number(GRIB_MISSING_VALUE)));
    assert_eq!(*var.values.get(0, 1).unwrap(), GRIB_MISSING_VALUE);
    assert_eq!(*var.values.get(1, 2).unwrap(), GRIB_MISSING_VALUE);
    assert_approx_eq!(*var.values.get(1, 0).unwrap(), 4.0, 1e-4);
}

#[test]
fn test_south_to_north_scan() {
    let builder = Grib2Builder::new_gfs()
        .with_grid(2, 3)
        .with_latlon(-10.0, 0.0, 5.0, 2.5)
        .with_data(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let ds = decode(&builder);

    assert_eq!(regular(&ds.latitude), &[-10.0, -5.0, 0.0]);
    assert_eq!(regular(&ds.longitude), &[0.0, 2.5]);
    assert_approx_eq!(*ds.data_vars[0].values.get(0, 0).unwrap(), 1.0, 1e-4);
    assert_approx_eq!(*ds.data_vars[0].values.get(2, 1).unwrap(), 6.0, 1e-4);
}

#[test]
fn test_westward_scan_is_reordered() {
    let builder = Grib2Builder::new_gfs()
        .with_grid(3, 1)
        .with_latlon(10.0, 20.0, 1.0, -1.0)
        .with_data(vec![1.0, 2.0, 3.0]);
    let ds = decode(&builder);

    assert_eq!(regular(&ds.longitude), &[18.0, 19.0, 20.0]);
    let row = ds.data_vars[0].values.row(0).unwrap();
    assert_approx_eq!(row[0], 3.0, 1e-4);
    assert_approx_eq!(row[2], 1.0, 1e-4);
}

#[test]
fn test_negative_longitudes_move_to_0_360() {
    let builder = Grib2Builder::new_gfs()
        .with_grid(3, 1)
        .with_latlon(0.0, -1.0, -1.0, 1.0);
    let ds = decode(&builder);
    assert_eq!(regular(&ds.longitude), &[359.0, 0.0, 1.0]);
}

#[test]
fn test_column_major_scan() {
    // Adjacent points run down the columns
    let builder = Grib2Builder::new_gfs()
        .with_grid(3, 2)
        .with_scanning_mode(0x20)
        .with_data(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    let ds = decode(&builder);

    let values = ds.data_vars[0].values.as_slice();
    let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    for (v, e) in values.iter().zip(expected) {
        assert_approx_eq!(*v, e, 1e-4);
    }
}

#[test]
fn test_boustrophedon_scan() {
    let builder = Grib2Builder::new_gfs()
        .with_grid(3, 2)
        .with_scanning_mode(0x10)
        .with_data(vec![1.0, 2.0, 3.0, 6.0, 5.0, 4.0]);
    let ds = decode(&builder);
    assert_approx_eq!(*ds.data_vars[0].values.get(1, 0).unwrap(), 4.0, 1e-4);
}

#[test]
fn test_time_coordinates() {
    let ds = decode(&Grib2Builder::new_gfs().with_minute(30).with_forecast_hour(6));
    let reference = Utc
        .with_ymd_and_hms(2025, 12, 10, 12, 30, 0)
        .unwrap()
        .naive_utc();

    assert_eq!(
        ds.coords.get("time"),
        Some(&CoordinateValues::Temporal(vec![reference]))
    );
    assert_eq!(
        ds.coords.get("valid_time"),
        Some(&CoordinateValues::Temporal(vec![reference + Duration::hours(6)]))
    );
    assert_eq!(ds.coords.get("step"), Some(&CoordinateValues::Numeric(vec![6.0])));
}

#[test]
fn test_multiple_messages_first_occurrence_wins() {
    let mut file = Vec::new();
    file.extend(Grib2Builder::new_gfs().with_constant_value(1.0).build());
    file.extend(
        Grib2Builder::new_gfs()
            .with_parameter(2, 2)
            .with_constant_value(2.0)
            .build(),
    );
    file.extend(Grib2Builder::new_gfs().with_constant_value(3.0).build());

    let ds = decode_dataset(Bytes::from(file)).unwrap();
    let names: Vec<&str> = ds.data_vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["TMP", "UGRD"]);
    assert_approx_eq!(ds.data_vars[0].values.as_slice()[0], 1.0, 1e-6);
}

#[test]
fn test_message_on_other_grid_is_skipped() {
    let mut file = Grib2Builder::new_gfs().build();
    file.extend(Grib2Builder::new_gfs().with_grid(5, 5).with_parameter(3, 1).build());

    let ds = decode_dataset(Bytes::from(file)).unwrap();
    assert_eq!(ds.data_vars.len(), 1);
    assert_eq!(ds.data_vars[0].values.shape(), (10, 10));
}

#[test]
fn test_padding_between_messages_is_skipped() {
    let mut file = b"HEADER".to_vec();
    file.extend(Grib2Builder::new_gfs().build());
    file.extend([0u8; 7]);
    file.extend(Grib2Builder::new_gfs().with_parameter(2, 3).build());

    let messages = Grib2Reader::new(Bytes::from(file)).messages().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].parameter(), "VGRD");
}

#[test]
fn test_no_messages_gives_empty_dataset() {
    let ds = decode_dataset(Bytes::from_static(b"not a grib file")).unwrap();
    assert!(ds.data_vars.is_empty());
    assert!(ds.coords.is_empty());
}

#[test]
fn test_truncated_message_is_an_error() {
    let mut message = Grib2Builder::new_gfs().build();
    message.truncate(message.len() - 10);
    assert!(matches!(
        decode_dataset(Bytes::from(message)),
        Err(Grib2Error::InvalidFormat(_))
    ));
}

#[test]
fn test_mrms_parameter_name() {
    let ds = decode(&Grib2Builder::new_mrms());
    assert_eq!(ds.data_vars[0].name, "REFL");
    assert_eq!(regular(&ds.latitude)[0], 54.995);
    assert_eq!(regular(&ds.longitude)[0], 230.005);
    assert!(ds.data_vars[0].values.as_slice().iter().all(|&v| v == -999.0));
}

#[test]
fn test_unknown_parameter_fallback_name() {
    let ds = decode(&Grib2Builder::new_gfs().with_parameter(250, 7));
    assert_eq!(ds.data_vars[0].name, "P0_250_7");
}

#[test]
fn test_lambert_grid_gives_curvilinear_axes() {
    let ds = decode(&Grib2Builder::new_lambert());

    let (Axis::Curvilinear(lat), Axis::Curvilinear(lon)) = (&ds.latitude, &ds.longitude) else {
        panic!("expected curvilinear axes");
    };
    assert_eq!(lat.shape(), (4, 6));
    assert_eq!(lon.shape(), (4, 6));
    assert_coords_approx_eq!(
        (*lat.get(0, 0).unwrap(), *lon.get(0, 0).unwrap()),
        (21.138123, 237.280472),
        1e-4
    );
    // Scanned south to north, west to east
    assert!(lat.get(3, 0).unwrap() > lat.get(0, 0).unwrap());
    assert!(lon.get(0, 5).unwrap() > lon.get(0, 0).unwrap());
}

#[cfg(not(feature = "extended-packing"))]
#[test]
fn test_other_packing_templates_need_backend() {
    let mut message = Grib2Builder::new_gfs().with_gradient(0.0, 10.0).build();
    let sec5 = section_offset(&message, 5);
    // Data representation template 5.40 (JPEG2000)
    message[sec5 + 9..sec5 + 11].copy_from_slice(&40u16.to_be_bytes());

    assert!(matches!(
        decode_dataset(Bytes::from(message)),
        Err(Grib2Error::BackendUnavailable(_))
    ));
}
