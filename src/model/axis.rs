//! Scroll-axis indirection.
//!
//! Every layout algorithm is written once in terms of a *primary* axis (the
//! scroll direction) and a *secondary* axis (the cross axis). [`Axis`] maps
//! those onto physical width/height and top/left, so the same code serves
//! vertical and horizontal scrolling.

use super::geometry::{Position, Size};
use serde::{Deserialize, Serialize};

/// Scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Content scrolls top to bottom; rows run left to right.
    #[default]
    Vertical,
    /// Content scrolls left to right; columns run top to bottom.
    Horizontal,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            other => Err(format!(
                "unknown direction '{other}' (expected 'vertical' or 'horizontal')"
            )),
        }
    }
}

/// Capability object selecting which physical dimension is primary.
///
/// # Mapping
/// | direction  | primary size | secondary size | primary pos | secondary pos |
/// |------------|--------------|----------------|-------------|---------------|
/// | vertical   | height       | width          | top         | left          |
/// | horizontal | width        | height         | left        | top           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axis {
    direction: Direction,
}

impl Axis {
    /// Create an axis for the given direction.
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    /// The scroll direction this axis maps.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Extent along the scroll axis.
    pub fn primary_size(&self, size: &Size) -> f64 {
        match self.direction {
            Direction::Vertical => size.height,
            Direction::Horizontal => size.width,
        }
    }

    /// Extent across the scroll axis.
    pub fn secondary_size(&self, size: &Size) -> f64 {
        match self.direction {
            Direction::Vertical => size.width,
            Direction::Horizontal => size.height,
        }
    }

    /// Offset along the scroll axis.
    pub fn primary_pos(&self, pos: &Position) -> f64 {
        match self.direction {
            Direction::Vertical => pos.top,
            Direction::Horizontal => pos.left,
        }
    }

    /// Offset across the scroll axis.
    pub fn secondary_pos(&self, pos: &Position) -> f64 {
        match self.direction {
            Direction::Vertical => pos.left,
            Direction::Horizontal => pos.top,
        }
    }

    /// Overwrite the offset along the scroll axis.
    pub fn set_primary_pos(&self, pos: &mut Position, value: f64) {
        match self.direction {
            Direction::Vertical => pos.top = value,
            Direction::Horizontal => pos.left = value,
        }
    }

    /// Overwrite the offset across the scroll axis.
    pub fn set_secondary_pos(&self, pos: &mut Position, value: f64) {
        match self.direction {
            Direction::Vertical => pos.left = value,
            Direction::Horizontal => pos.top = value,
        }
    }

    /// Build a physical size from primary/secondary extents.
    pub fn size(&self, primary: f64, secondary: f64) -> Size {
        match self.direction {
            Direction::Vertical => Size::new(secondary, primary),
            Direction::Horizontal => Size::new(primary, secondary),
        }
    }

    /// Build a physical position from primary/secondary offsets.
    pub fn position(&self, primary: f64, secondary: f64) -> Position {
        match self.direction {
            Direction::Vertical => Position::new(primary, secondary),
            Direction::Horizontal => Position::new(secondary, primary),
        }
    }

    /// Split a viewport size into `(dim1, dim2)`.
    pub fn split(&self, size: &Size) -> (f64, f64) {
        (self.primary_size(size), self.secondary_size(size))
    }
}
