//! GRIB2 file to map-client payload.
//!
//! Reads one GRIB2 file (optionally gzip-compressed), decodes it into a
//! dataset, and encodes the first field as a single-line JSON payload.

pub mod error;
pub mod input;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use grid_encoder::{GridEncoder, Payload};
use tracing::info;

pub use error::{ProcessorError, Result};
pub use input::read_input;

/// Decode and encode one GRIB2 file.
pub fn process_file(path: &Path, encoder: &GridEncoder) -> Result<Payload> {
    let data = read_input(path)?;
    info!(path = %path.display(), bytes = data.len(), "Read GRIB2 input");

    let dataset = grib2_parser::decode_dataset(data)?;
    info!(
        variables = dataset.data_vars.len(),
        primary = ?dataset.primary_variable().map(|v| v.name.as_str()),
        "Decoded GRIB2 dataset"
    );

    Ok(encoder.encode(dataset)?)
}

/// Write the payload as one JSON line to `output`, or to stdout.
///
/// Serialization happens before anything is written, so a failure never
/// leaves a partial payload behind.
pub fn write_payload(payload: &Payload, output: Option<&Path>) -> Result<()> {
    let mut line = payload.to_json_line()?;
    line.push('\n');

    match output {
        Some(path) => {
            let mut file = File::create(path).map_err(ProcessorError::Output)?;
            file.write_all(line.as_bytes()).map_err(ProcessorError::Output)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(line.as_bytes()).map_err(ProcessorError::Output)?;
            stdout.flush().map_err(ProcessorError::Output)?;
        }
    }

    Ok(())
}
