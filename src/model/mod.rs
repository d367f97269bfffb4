//! Domain model types (pure).
//!
//! Geometry, axis indirection, measurement batches and the error taxonomy.
//! Everything here is plain data with no layout state.

pub mod axis;
pub mod error;
pub mod geometry;
pub mod measurements;

// Re-export for convenience
pub use axis::{Axis, Direction};
pub use error::{AppError, LayoutError, MeasurementError};
pub use geometry::{ItemRect, ItemSizes, Position, Size};
pub use measurements::{load_measurements, parse_measurements};
