//! GRIB2 section parsing.
//!
//! This module handles parsing of individual GRIB2 message sections.
//! Each GRIB2 message consists of multiple sections containing
//! metadata, grid information, and compressed data.
//!
//! GRIB2 stores signed integers in sign-magnitude form (high bit is the
//! sign), not two's complement; use [`read_signed_i32`] and
//! [`read_signed_i16`] for them.

use bytes::Bytes;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use grid_common::ScanMode;

use crate::tables::Grib2Tables;
use crate::Grib2Error;

/// Octets marking the end of a message (Section 8).
const END_MARKER: &[u8; 4] = b"7777";

/// Marks an unset 32-bit field.
const MISSING_U32: u32 = 0xFFFF_FFFF;

/// Section 0: Indicator Section (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub discipline: u8,
    pub edition: u8,
    pub message_length: u64,
}

/// Section 1: Identification Section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub center: u16,
    pub sub_center: u16,
    pub significance_of_reference_time: u8,
    pub reference_time: DateTime<Utc>,
    pub production_status: u8,
    pub data_type: u8,
}

/// Template 3.0 (regular latitude/longitude), angles in microdegrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatLonGrid {
    pub la1: i32,
    pub lo1: i32,
    pub la2: i32,
    pub lo2: i32,
    /// i direction increment, `None` when not given
    pub di: Option<u32>,
    /// j direction increment, `None` when not given
    pub dj: Option<u32>,
}

/// Template 3.30 (Lambert conformal), angles in degrees, spacing in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct LambertGrid {
    pub la1: f64,
    pub lo1: f64,
    pub lad: f64,
    pub lov: f64,
    pub latin1: f64,
    pub latin2: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Grid definition template payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GridTemplate {
    LatLon(LatLonGrid),
    LambertConformal(LambertGrid),
}

/// Section 3: Grid Definition Section
#[derive(Debug, Clone, PartialEq)]
pub struct GridDefinition {
    pub template_number: u16,
    pub num_data_points: u32,
    pub shape_of_earth: u8,
    /// Number of points along a parallel (columns)
    pub ni: u32,
    /// Number of points along a meridian (rows)
    pub nj: u32,
    pub scanning_mode: ScanMode,
    pub template: GridTemplate,
}

/// Section 4: Product Definition Section
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDefinition {
    pub template_number: u16,
    pub parameter_category: u8,
    pub parameter_number: u8,
    pub parameter_short_name: String,
    /// Indicator of unit of time range (Code Table 4.4)
    pub time_unit: u8,
    pub forecast_time: u32,
    pub level_type: u8,
    pub level_value: f64,
    pub level_description: String,
}

impl ProductDefinition {
    /// Forecast offset from the reference time, when the unit is known.
    pub fn forecast_offset(&self) -> Option<Duration> {
        let amount = i64::from(self.forecast_time);
        match self.time_unit {
            0 => Some(Duration::minutes(amount)),
            1 => Some(Duration::hours(amount)),
            2 => Some(Duration::days(amount)),
            10 => Some(Duration::hours(3 * amount)),
            11 => Some(Duration::hours(6 * amount)),
            12 => Some(Duration::hours(12 * amount)),
            13 => Some(Duration::seconds(amount)),
            _ => None,
        }
    }
}

/// Section 5: Data Representation Section
#[derive(Debug, Clone, PartialEq)]
pub struct DataRepresentation {
    /// Number of values actually packed in Section 7
    pub num_packed_values: u32,
    pub template_number: u16,
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub bits_per_value: u8,
}

/// Section 6: Bitmap Section (only present when it carries a bitmap)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub indicator: u8,
    pub data: Bytes,
}

/// Section 7: Data Section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSection {
    pub data: Bytes,
}

// ===== Parsing Functions =====

/// Parse Section 0 (Indicator) from start of message
pub fn parse_indicator(data: &[u8]) -> Result<Indicator, Grib2Error> {
    if data.len() < 16 {
        return Err(Grib2Error::InvalidFormat(
            "Not enough data for indicator section".to_string(),
        ));
    }

    if &data[0..4] != b"GRIB" {
        return Err(Grib2Error::InvalidFormat(
            "Invalid GRIB magic bytes".to_string(),
        ));
    }

    // Octets 5-6 reserved, 7 discipline, 8 edition, 9-16 total length
    let discipline = data[6];
    let edition = data[7];

    if edition != 2 {
        return Err(Grib2Error::InvalidFormat(format!(
            "Expected GRIB edition 2, got {}",
            edition
        )));
    }

    let message_length = read_u64(data, 8);

    Ok(Indicator {
        discipline,
        edition,
        message_length,
    })
}

/// Parse Section 1 (Identification)
pub fn parse_identification(data: &[u8]) -> Result<Identification, Grib2Error> {
    let sec = section(data, 1)?;
    if sec.len() < 21 {
        return Err(invalid(1, "Not enough data"));
    }

    let center = read_u16(sec, 5);
    let sub_center = read_u16(sec, 7);
    let significance_of_reference_time = sec[11];

    let year = read_u16(sec, 12);
    let (month, day, hour, minute, second) = (sec[14], sec[15], sec[16], sec[17], sec[18]);

    let reference_time = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
        .and_then(|date| date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second)))
        .ok_or_else(|| {
            invalid(
                1,
                format!(
                    "Invalid date: {}-{:02}-{:02} {:02}:{:02}:{:02}",
                    year, month, day, hour, minute, second
                ),
            )
        })?;

    Ok(Identification {
        center,
        sub_center,
        significance_of_reference_time,
        reference_time: DateTime::<Utc>::from_naive_utc_and_offset(reference_time, Utc),
        production_status: sec[19],
        data_type: sec[20],
    })
}

/// Parse Section 3 (Grid Definition)
pub fn parse_grid_definition(data: &[u8]) -> Result<GridDefinition, Grib2Error> {
    let sec = section(data, 3)?;
    if sec.len() < 14 {
        return Err(invalid(3, "Not enough data"));
    }

    // 5: source, 6-9: number of data points, 10-11: optional list,
    // 12-13: template number, 14+: template
    let num_data_points = read_u32(sec, 6);
    let template_number = read_u16(sec, 12);
    let gd = &sec[14..];

    match template_number {
        0 => {
            if gd.len() < 58 {
                return Err(invalid(
                    3,
                    format!("Template 0 needs at least 58 bytes, got {}", gd.len()),
                ));
            }
            // 16-19 Ni, 20-23 Nj, 32-35 La1, 36-39 Lo1, 40 flags,
            // 41-44 La2, 45-48 Lo2, 49-52 Di, 53-56 Dj, 57 scanning mode
            Ok(GridDefinition {
                template_number,
                num_data_points,
                shape_of_earth: gd[0],
                ni: read_u32(gd, 16),
                nj: read_u32(gd, 20),
                scanning_mode: ScanMode::from_grib2_flag(gd[57]),
                template: GridTemplate::LatLon(LatLonGrid {
                    la1: read_signed_i32(gd, 32),
                    lo1: read_signed_i32(gd, 36),
                    la2: read_signed_i32(gd, 41),
                    lo2: read_signed_i32(gd, 45),
                    di: optional_u32(read_u32(gd, 49)),
                    dj: optional_u32(read_u32(gd, 53)),
                }),
            })
        }
        30 => {
            if gd.len() < 59 {
                return Err(invalid(
                    3,
                    format!("Template 30 needs at least 59 bytes, got {}", gd.len()),
                ));
            }
            // 16-19 Nx, 20-23 Ny, 24-27 La1, 28-31 Lo1, 32 flags, 33-36 LaD,
            // 37-40 LoV, 41-44 Dx (mm), 45-48 Dy (mm), 49 projection centre,
            // 50 scanning mode, 51-54 Latin1, 55-58 Latin2
            let micro = |offset| f64::from(read_signed_i32(gd, offset)) * 1e-6;
            Ok(GridDefinition {
                template_number,
                num_data_points,
                shape_of_earth: gd[0],
                ni: read_u32(gd, 16),
                nj: read_u32(gd, 20),
                scanning_mode: ScanMode::from_grib2_flag(gd[50]),
                template: GridTemplate::LambertConformal(LambertGrid {
                    la1: micro(24),
                    lo1: micro(28),
                    lad: micro(33),
                    lov: micro(37),
                    latin1: micro(51),
                    latin2: micro(55),
                    dx: f64::from(read_u32(gd, 41)) * 1e-3,
                    dy: f64::from(read_u32(gd, 45)) * 1e-3,
                }),
            })
        }
        other => Err(Grib2Error::UnsupportedTemplate {
            section: 3,
            template: other,
        }),
    }
}

/// Parse Section 4 (Product Definition)
pub fn parse_product_definition(
    data: &[u8],
    discipline: u8,
    tables: &Grib2Tables,
) -> Result<ProductDefinition, Grib2Error> {
    let sec = section(data, 4)?;
    if sec.len() < 28 {
        return Err(invalid(4, "Not enough data"));
    }

    // 5-6: coordinate values, 7-8: template number, 9: category,
    // 10: number, 17: time unit, 18-21: forecast time,
    // 22: first surface type, 23: scale factor, 24-27: scaled value.
    // Templates 4.0-4.15 share this layout.
    let template_number = read_u16(sec, 7);
    let parameter_category = sec[9];
    let parameter_number = sec[10];
    let time_unit = sec[17];
    let forecast_time = read_u32(sec, 18);
    let level_type = sec[22];

    let scale_factor = sign_magnitude_i8(sec[23]);
    let scaled_value = read_u32(sec, 24);
    let level_value = if scaled_value == MISSING_U32 {
        0.0
    } else {
        f64::from(scaled_value) / 10f64.powi(i32::from(scale_factor))
    };

    Ok(ProductDefinition {
        template_number,
        parameter_category,
        parameter_number,
        parameter_short_name: tables.get_parameter_name(discipline, parameter_category, parameter_number),
        time_unit,
        forecast_time,
        level_type,
        level_value,
        level_description: tables.get_level_description(level_type, level_value),
    })
}

/// Parse Section 5 (Data Representation)
pub fn parse_data_representation(data: &[u8]) -> Result<DataRepresentation, Grib2Error> {
    let sec = section(data, 5)?;
    if sec.len() < 11 {
        return Err(invalid(5, "Not enough data"));
    }

    // 5-8: number of packed values, 9-10: template number.
    // Templates 5.0, 5.2, 5.3, 5.40 and 5.41 start with the simple packing
    // block: 11-14 R (IEEE float), 15-16 E, 17-18 D, 19 bits per value.
    let num_packed_values = read_u32(sec, 5);
    let template_number = read_u16(sec, 9);

    let (reference_value, binary_scale_factor, decimal_scale_factor, bits_per_value) =
        if sec.len() >= 20 {
            (
                f32::from_bits(read_u32(sec, 11)),
                read_signed_i16(sec, 15),
                read_signed_i16(sec, 17),
                sec[19],
            )
        } else {
            (0.0, 0, 0, 0)
        };

    Ok(DataRepresentation {
        num_packed_values,
        template_number,
        reference_value,
        binary_scale_factor,
        decimal_scale_factor,
        bits_per_value,
    })
}

/// Parse Section 6 (Bitmap). Returns `None` when no bitmap applies
/// (indicator 255) or the section is absent.
pub fn parse_bitmap(data: &Bytes) -> Result<Option<Bitmap>, Grib2Error> {
    let offset = match find_section(data, 6) {
        Ok(offset) => offset,
        Err(Grib2Error::InvalidSection { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };
    let length = read_u32(data, offset) as usize;
    if length < 6 {
        return Err(invalid(6, "Not enough data"));
    }

    let indicator = data[offset + 5];
    match indicator {
        255 => Ok(None),
        0 => Ok(Some(Bitmap {
            indicator,
            data: data.slice(offset + 6..offset + length),
        })),
        // 1-253: predefined bitmaps, 254: bitmap from a previous field
        other => Err(Grib2Error::UnsupportedTemplate {
            section: 6,
            template: u16::from(other),
        }),
    }
}

/// Parse Section 7 (Data)
pub fn parse_data_section(data: &Bytes) -> Result<DataSection, Grib2Error> {
    let offset = find_section(data, 7)?;
    let length = read_u32(data, offset) as usize;
    if length < 5 {
        return Err(invalid(7, "Not enough data"));
    }

    Ok(DataSection {
        data: data.slice(offset + 5..offset + length),
    })
}

// ===== Helper Functions =====

/// Locate a section by number and return its bytes.
fn section(data: &[u8], section_num: u8) -> Result<&[u8], Grib2Error> {
    let offset = find_section(data, section_num)?;
    let length = read_u32(data, offset) as usize;
    Ok(&data[offset..offset + length])
}

/// Find a section by number within a message
fn find_section(data: &[u8], section_num: u8) -> Result<usize, Grib2Error> {
    let mut offset = 16; // After Section 0

    loop {
        if data.get(offset..offset + 4) == Some(END_MARKER.as_slice()) {
            return Err(invalid(section_num, "Section not found"));
        }

        if offset + 5 > data.len() {
            return Err(invalid(section_num, "Section not found"));
        }

        let section_length = read_u32(data, offset) as usize;
        if section_length < 5 || offset + section_length > data.len() {
            return Err(invalid(section_num, "Invalid section length"));
        }

        if data[offset + 4] == section_num {
            return Ok(offset);
        }

        offset += section_length;
    }
}

fn invalid(section: u8, reason: impl Into<String>) -> Grib2Error {
    Grib2Error::InvalidSection {
        section,
        reason: reason.into(),
    }
}

fn optional_u32(value: u32) -> Option<u32> {
    (value != MISSING_U32).then_some(value)
}

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&data[offset..offset + 8]);
    u64::from_be_bytes(buf)
}

/// Read a sign-magnitude 32-bit integer.
pub fn read_signed_i32(data: &[u8], offset: usize) -> i32 {
    let raw = read_u32(data, offset);
    let magnitude = (raw & 0x7FFF_FFFF) as i32;
    if raw & 0x8000_0000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Read a sign-magnitude 16-bit integer.
pub fn read_signed_i16(data: &[u8], offset: usize) -> i16 {
    let raw = read_u16(data, offset);
    let magnitude = (raw & 0x7FFF) as i16;
    if raw & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

fn sign_magnitude_i8(raw: u8) -> i8 {
    let magnitude = (raw & 0x7F) as i8;
    if raw & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    }
}
