//! GRIB2 data unpacking algorithms.
//!
//! Simple packing (template 5.0) is decoded here. Complex, spectral,
//! JPEG2000 and PNG packings are delegated to the `grib` crate, which is
//! only available with the `extended-packing` feature.

use crate::Grib2Error;

/// Unpack simple packed GRIB2 data
///
/// Simple packing formula: value = (reference_value + (packed_value * 2^binary_scale)) * 10^(-decimal_scale)
///
/// `num_points` is the total number of grid points. With a bitmap, only
/// points whose bit is set have a packed value; the rest are `None`.
pub fn unpack_simple(
    packed_data: &[u8],
    num_points: u32,
    bits_per_value: u8,
    reference_value: f32,
    binary_scale_factor: i16,
    decimal_scale_factor: i16,
    bitmap: Option<&[u8]>,
) -> Result<Vec<Option<f32>>, Grib2Error> {
    let num_points = num_points as usize;
    if let Some(bm) = bitmap {
        if bm.len() * 8 < num_points {
            return Err(Grib2Error::UnpackingError(format!(
                "Bitmap covers {} points, grid has {}",
                bm.len() * 8,
                num_points
            )));
        }
    }

    let binary_scale = 2.0_f64.powi(i32::from(binary_scale_factor));
    let decimal_scale = 10.0_f64.powi(-i32::from(decimal_scale_factor));
    let reference_value = f64::from(reference_value);
    let bits_per_value = bits_per_value as usize;

    let mut values = Vec::with_capacity(num_points);
    let mut bit_position = 0;

    for i in 0..num_points {
        // Bitmap: 1 bit per data point, 1 = value present, 0 = missing
        let has_value = bitmap.map_or(true, |bm| (bm[i / 8] >> (7 - (i % 8))) & 1 == 1);

        if !has_value {
            values.push(None);
            continue;
        }

        // Zero bits per value: every present point is the reference value
        let packed_value = if bits_per_value == 0 {
            0
        } else {
            extract_bits(packed_data, bit_position, bits_per_value).map_err(|e| {
                Grib2Error::UnpackingError(format!("Failed to extract bits: {}", e))
            })?
        };
        bit_position += bits_per_value;

        let value = (reference_value + f64::from(packed_value) * binary_scale) * decimal_scale;
        values.push(Some(value as f32));
    }

    Ok(values)
}

/// Extract bits from a byte array
/// Returns the bits as a 32-bit unsigned integer
fn extract_bits(data: &[u8], start_bit: usize, num_bits: usize) -> Result<u32, String> {
    if num_bits > 32 || num_bits == 0 {
        return Err(format!("Invalid number of bits: {}", num_bits));
    }

    let mut result = 0u32;

    for i in 0..num_bits {
        let absolute_bit = start_bit + i;
        let byte_idx = absolute_bit / 8;
        let bit_idx = 7 - (absolute_bit % 8); // MSB first

        if byte_idx >= data.len() {
            return Err("Not enough data to extract bits".to_string());
        }

        let bit = (data[byte_idx] >> bit_idx) & 1;
        result = (result << 1) | (bit as u32);
    }

    Ok(result)
}

/// Decode a whole message with the `grib` crate.
///
/// Missing points come back as `None`.
#[cfg(feature = "extended-packing")]
pub fn unpack_with_backend(
    message: &[u8],
    template_number: u16,
) -> Result<Vec<Option<f32>>, Grib2Error> {
    use std::io::Cursor;

    let backend_err = |e: &dyn std::fmt::Display| {
        Grib2Error::UnpackingError(format!("template 5.{}: {}", template_number, e))
    };

    let grib_file = grib::from_reader(Cursor::new(message)).map_err(|e| backend_err(&e))?;
    let (_, submessage) = grib_file
        .iter()
        .next()
        .ok_or_else(|| Grib2Error::UnpackingError("grib backend found no submessage".to_string()))?;

    let decoder = grib::Grib2SubmessageDecoder::from(submessage).map_err(|e| backend_err(&e))?;
    let values = decoder.dispatch().map_err(|e| backend_err(&e))?;

    let decoded: Vec<Option<f32>> = values
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect();
    Ok(decoded)
}

/// Without the `grib` crate only simple packing can be decoded.
#[cfg(not(feature = "extended-packing"))]
pub fn unpack_with_backend(
    _message: &[u8],
    template_number: u16,
) -> Result<Vec<Option<f32>>, Grib2Error> {
    Err(Grib2Error::BackendUnavailable(format!(
        "data representation template 5.{} needs the extended-packing feature",
        template_number
    )))
}
