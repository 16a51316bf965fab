use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::sections::{
    parse_bitmap, parse_data_representation, parse_data_section, parse_grid_definition,
    parse_identification, parse_indicator, parse_product_definition, Bitmap, DataRepresentation,
    DataSection, GridDefinition, Identification, Indicator, ProductDefinition,
};
use crate::tables::Grib2Tables;
use crate::unpacking::{unpack_simple, unpack_with_backend};
use crate::{Grib2Error, Result};

/// Iterates over the GRIB2 messages in a buffer.
///
/// Bytes between messages (padding, headers from bulletin wrappers) are
/// skipped by scanning for the next `GRIB` marker.
pub struct Grib2Reader {
    data: Bytes,
    offset: usize,
    tables: Grib2Tables,
}

impl Grib2Reader {
    pub fn new(data: Bytes) -> Self {
        Self::with_tables(data, Grib2Tables::builtin())
    }

    pub fn with_tables(data: Bytes, tables: Grib2Tables) -> Self {
        Self {
            data,
            offset: 0,
            tables,
        }
    }

    /// Parse the next message, or `None` once the buffer is exhausted.
    pub fn next_message(&mut self) -> Result<Option<Grib2Message>> {
        let remaining = &self.data[self.offset..];
        let Some(skip) = remaining.windows(4).position(|w| w == b"GRIB") else {
            self.offset = self.data.len();
            return Ok(None);
        };
        let start = self.offset + skip;

        let indicator = parse_indicator(&self.data[start..])?;
        let end = usize::try_from(indicator.message_length)
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                Grib2Error::InvalidFormat(format!(
                    "Message at byte {} declares {} bytes, only {} available",
                    start,
                    indicator.message_length,
                    self.data.len() - start
                ))
            })?;

        let raw = self.data.slice(start..end);
        self.offset = end;

        trace!(start, end, "Found GRIB2 message");
        Grib2Message::parse(raw, indicator, &self.tables).map(Some)
    }

    /// Parse every remaining message.
    pub fn messages(mut self) -> Result<Vec<Grib2Message>> {
        let mut messages = Vec::new();
        while let Some(message) = self.next_message()? {
            messages.push(message);
        }
        debug!(count = messages.len(), "Read GRIB2 messages");
        Ok(messages)
    }
}

/// One parsed GRIB2 message.
#[derive(Debug, Clone)]
pub struct Grib2Message {
    /// Complete message bytes, Section 0 through `7777`
    pub raw: Bytes,
    pub indicator: Indicator,
    pub identification: Identification,
    pub grid_definition: GridDefinition,
    pub product_definition: ProductDefinition,
    pub data_representation: DataRepresentation,
    pub bitmap: Option<Bitmap>,
    pub data_section: DataSection,
}

impl Grib2Message {
    fn parse(raw: Bytes, indicator: Indicator, tables: &Grib2Tables) -> Result<Self> {
        Ok(Self {
            identification: parse_identification(&raw)?,
            grid_definition: parse_grid_definition(&raw)?,
            product_definition: parse_product_definition(&raw, indicator.discipline, tables)?,
            data_representation: parse_data_representation(&raw)?,
            bitmap: parse_bitmap(&raw)?,
            data_section: parse_data_section(&raw)?,
            indicator,
            raw,
        })
    }

    /// Short parameter name, e.g. "TMP"
    pub fn parameter(&self) -> &str {
        &self.product_definition.parameter_short_name
    }

    /// Grid dimensions as `(rows, cols)`
    pub fn grid_dims(&self) -> (u32, u32) {
        (self.grid_definition.nj, self.grid_definition.ni)
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.identification.reference_time
    }

    /// Reference time plus the forecast offset, when the offset unit is known.
    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        self.product_definition
            .forecast_offset()
            .map(|offset| self.identification.reference_time + offset)
    }

    /// Unpack the field in scan order; missing points are `None`.
    pub fn unpack_data(&self) -> Result<Vec<Option<f32>>> {
        let dr = &self.data_representation;
        match dr.template_number {
            0 => unpack_simple(
                &self.data_section.data,
                self.grid_definition.num_data_points,
                dr.bits_per_value,
                dr.reference_value,
                dr.binary_scale_factor,
                dr.decimal_scale_factor,
                self.bitmap.as_ref().map(|b| b.data.as_ref()),
            ),
            other => unpack_with_backend(&self.raw, other),
        }
    }
}
