//! GRIB2 grid processor.
//!
//! Decodes a GRIB2 file and prints the first field as a compact JSON
//! payload (fixed-point values, bounds, resolution, value range).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use grib_processor::{process_file, write_payload, ProcessorError};
use grid_encoder::{EncoderConfig, GridEncoder};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "grib-processor")]
#[command(about = "Convert a GRIB2 grid into a JSON payload for map clients")]
struct Args {
    /// GRIB2 file to process (.gz accepted)
    #[arg(long, env = "GRIB_PATH")]
    grib: PathBuf,

    /// Write the payload here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.log_format) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(), ProcessorError> {
    let encoder = GridEncoder::new(EncoderConfig::from_env())?;
    let payload = process_file(&args.grib, &encoder)?;
    write_payload(&payload, args.output.as_deref())?;

    info!(
        rows = payload.rows,
        cols = payload.cols,
        output = ?args.output,
        "Payload written"
    );
    Ok(())
}

/// Install a stderr subscriber; stdout carries the payload.
fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }

    Ok(())
}
