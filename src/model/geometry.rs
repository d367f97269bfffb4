//! Pixel geometry primitives shared by every layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Square size with both sides equal to `side`.
    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// True when both sides are finite and strictly positive.
    ///
    /// Measurements failing this check carry no usable aspect ratio.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Uniformly scale both sides.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Top/left offset of an item inside the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Offset from the top edge.
    pub top: f64,
    /// Offset from the left edge.
    pub left: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Resolved placement of a single item: where it goes and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemRect {
    /// Top/left offset.
    pub position: Position,
    /// Resolved size.
    pub size: Size,
}

impl ItemRect {
    /// Create a new rect.
    pub fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }
}

/// A batch of measurements reported by the collaborator, keyed by item index.
///
/// Ordered so "the first reported measurement" is well defined (lowest index).
pub type ItemSizes = BTreeMap<usize, Size>;
