//! Loading GRIB2 input from disk.

use std::fs;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::{ProcessorError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a GRIB2 file, transparently decompressing `.gz` input.
///
/// A missing path is reported before any read is attempted; a path that
/// exists but cannot be read (a directory, say) is a read failure.
pub fn read_input(path: &Path) -> Result<Bytes> {
    if !path.exists() {
        return Err(ProcessorError::InputNotFound(path.to_path_buf()));
    }

    let data = fs::read(path).map_err(|source| ProcessorError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if is_gzip(path, &data) {
        debug!(path = %path.display(), compressed = data.len(), "Decompressing gzip input");
        return decompress_gzip(&data);
    }

    Ok(Bytes::from(data))
}

fn is_gzip(path: &Path, data: &[u8]) -> bool {
    path.extension().is_some_and(|ext| ext == "gz") || data.starts_with(&GZIP_MAGIC)
}

/// Decompress gzip data.
pub fn decompress_gzip(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(ProcessorError::Decompression)?;
    Ok(Bytes::from(decompressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress_gzip_valid() {
        let original = b"GRIB....7777";
        let result = decompress_gzip(&gzip(original)).expect("Should decompress");
        assert_eq!(result.as_ref(), original);
    }

    #[test]
    fn test_decompress_gzip_invalid() {
        assert!(matches!(
            decompress_gzip(b"not gzip data"),
            Err(ProcessorError::Decompression(_))
        ));
    }

    #[test]
    fn test_gzip_detection() {
        assert!(is_gzip(Path::new("a.grib2.gz"), b"GRIB"));
        assert!(is_gzip(Path::new("a.grib2"), &gzip(b"x")));
        assert!(!is_gzip(Path::new("a.grib2"), b"GRIB"));
    }

    #[test]
    fn test_missing_path() {
        let err = read_input(Path::new("/nonexistent/definitely/missing.grib2")).unwrap_err();
        assert!(matches!(err, ProcessorError::InputNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(dir.path()).unwrap_err();
        assert!(matches!(err, ProcessorError::Read { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
