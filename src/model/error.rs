//! Error types for vlayout.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level binary error wrapping every failure mode
//!   - [`LayoutError`] - Rejected layout configuration (ideal size, columns, spacing)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - [`MeasurementError`] - Measurement file read/parse failures
//!
//! # Recovery Strategy
//!
//! The layout engine itself only ever returns [`LayoutError`], and only from
//! configuration mutators. When a configuration is rejected the previous valid
//! configuration stays in effect. Out-of-range scroll positions and indices are
//! clamped silently and missing measurements are estimated, so neither surfaces
//! as an error.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned from the binary's main logic.
#[derive(Debug, Error)]
pub enum AppError {
    /// Layout configuration was rejected.
    #[error("Invalid layout configuration: {0}")]
    Layout(#[from] LayoutError),

    /// Config file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Measurement file could not be loaded.
    #[error("Measurement error: {0}")]
    Measurement(#[from] MeasurementError),

    /// Writing the result failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// A configuration value the engine refuses to accept.
///
/// Returned synchronously by configuration mutators. The layout keeps its
/// previous configuration when one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LayoutError {
    /// Flex layout ideal item size must be finite and strictly positive.
    #[error("ideal size must be greater than zero (got {0})")]
    InvalidIdealSize(f64),

    /// Grid column count must be at least one.
    #[error("column count must be at least 1 (got {0})")]
    InvalidColumnCount(usize),

    /// Spacing must be finite and non-negative.
    #[error("spacing must be a non-negative number of pixels (got {0})")]
    InvalidSpacing(f64),

    /// Overhang must be finite and non-negative.
    #[error("overhang must be a non-negative number of pixels (got {0})")]
    InvalidOverhang(f64),

    /// Nominal item size must have finite, positive sides.
    #[error("item size must have positive sides (got {width}x{height})")]
    InvalidItemSize {
        /// Rejected width.
        width: f64,
        /// Rejected height.
        height: f64,
    },
}

/// Failure loading a measurement batch for the binary.
#[derive(Debug, Error)]
pub enum MeasurementError {
    /// File could not be read.
    #[error("Failed to read measurements at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File is not a JSON object of `index -> {width, height}`.
    #[error("Invalid measurements in {path}: {source}")]
    Parse {
        /// Path with invalid content.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_messages_name_the_value() {
        assert_eq!(
            LayoutError::InvalidIdealSize(-3.0).to_string(),
            "ideal size must be greater than zero (got -3)"
        );
        assert_eq!(
            LayoutError::InvalidColumnCount(0).to_string(),
            "column count must be at least 1 (got 0)"
        );
    }

    #[test]
    fn layout_error_converts_into_app_error() {
        fn reject() -> Result<(), AppError> {
            Err(LayoutError::InvalidSpacing(-1.0))?;
            Ok(())
        }
        let err = reject().unwrap_err();
        assert!(matches!(err, AppError::Layout(LayoutError::InvalidSpacing(_))));
    }

    #[test]
    fn io_error_converts_into_output_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: AppError = io.into();
        assert!(err.to_string().starts_with("Output error"));
    }
}
