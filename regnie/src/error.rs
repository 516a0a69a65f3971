//! Error types for the REGNIE library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or converting REGNIE rasters.
#[derive(Error, Debug)]
pub enum RegnieError {
    /// IO error when reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A 4-character field could not be parsed as an integer.
    #[error("Malformed raster at row {row}, column {column}: {reason}")]
    MalformedRaster {
        row: usize,
        column: usize,
        reason: String,
    },

    /// The stream ended before the field at this position was complete.
    #[error("Raster truncated at row {row}, column {column}")]
    TruncatedRaster { row: usize, column: usize },

    /// Grid index outside the raster dimensions.
    #[error("Invalid grid index: row={row}, column={column}")]
    InvalidIndex { row: usize, column: usize },

    /// Coordinates fall outside the grid extent.
    #[error("Coordinates out of bounds: lat={lat}, lon={lon}")]
    OutOfBounds { lat: f64, lon: f64 },

    /// File size doesn't match any supported raster layout.
    #[error("Invalid file size: {size} bytes (expected a 611x971 REGNIE raster)")]
    InvalidFileSize { size: usize },

    /// The output path resolves to the input raster.
    #[error("Output path is the input raster: {path}")]
    OutputIsInput { path: PathBuf },

    /// The raster file was not found.
    #[error("REGNIE file not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Result type alias using [`RegnieError`].
pub type Result<T> = std::result::Result<T, RegnieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegnieError::InvalidFileSize { size: 1000 };
        assert!(err.to_string().contains("1000"));

        let err = RegnieError::MalformedRaster {
            row: 3,
            column: 17,
            reason: "invalid digit".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("column 17"));

        let err = RegnieError::TruncatedRaster { row: 971, column: 2 };
        assert!(err.to_string().contains("971"));

        let err = RegnieError::OutputIsInput {
            path: PathBuf::from("ra050120"),
        };
        assert!(err.to_string().contains("input raster"));

        let err = RegnieError::FileNotFound {
            path: PathBuf::from("ra050120.gz"),
        };
        assert!(err.to_string().contains("ra050120.gz"));
    }
}
