//! Measurement batches read from disk.
//!
//! The file is a JSON object mapping item index to measured size:
//!
//! ```json
//! { "0": { "width": 640, "height": 480 }, "7": { "width": 1080, "height": 1920 } }
//! ```

use super::error::MeasurementError;
use super::geometry::ItemSizes;
use std::path::Path;

/// Parse a measurement batch from JSON text.
///
/// # Errors
///
/// Returns the JSON error if `json` is not an object of `index -> {width, height}`.
pub fn parse_measurements(json: &str) -> Result<ItemSizes, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read and parse a measurement batch.
///
/// # Errors
///
/// Returns [`MeasurementError::Read`] if the file cannot be read and
/// [`MeasurementError::Parse`] if its content is malformed.
pub fn load_measurements(path: &Path) -> Result<ItemSizes, MeasurementError> {
    let contents = std::fs::read_to_string(path).map_err(|source| MeasurementError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_measurements(&contents).map_err(|source| MeasurementError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
