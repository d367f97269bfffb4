//! Computed layout output and change notifications.

use crate::model::ItemRect;
use serde::Serialize;

/// Inclusive range of item indices that must currently be presented.
///
/// # Invariants
/// - `first <= last`
/// - `last < total_items` at the time of computation
///
/// An empty range is represented by the absence of an `ActiveRange`
/// (`Option<ActiveRange>::None`), never by `last < first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveRange {
    /// First active index (inclusive).
    pub first: usize,
    /// Last active index (inclusive).
    pub last: usize,
}

impl ActiveRange {
    /// Create a new range.
    ///
    /// # Panics
    /// In debug builds, panics if `first > last`.
    pub fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "active range {first}..={last} is inverted");
        Self { first, last }
    }

    /// Number of active items.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false: empty ranges are not representable.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether `index` is active.
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Iterate over active indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.first..=self.last
    }
}

/// Where an item should land in the viewport after `scroll_to_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    /// Item's leading edge at the viewport's leading edge.
    #[default]
    Start,
    /// Item centered in the viewport.
    Center,
    /// Item's trailing edge at the viewport's trailing edge.
    End,
    /// Minimal movement that makes the item fully visible.
    Nearest,
}

impl std::str::FromStr for ScrollAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            "nearest" => Ok(Self::Nearest),
            other => Err(format!(
                "unknown alignment '{other}' (expected start, center, end or nearest)"
            )),
        }
    }
}

/// Resolved placement of one active item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedItem {
    /// Item index.
    pub index: usize,
    /// Position and size.
    #[serde(flatten)]
    pub rect: ItemRect,
}

/// Snapshot of everything the collaborator needs to render a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutInfo {
    /// Active range, `None` when nothing needs to be presented.
    pub range: Option<ActiveRange>,
    /// Leading pixel bound of the active range along the scroll axis.
    pub physical_min: f64,
    /// Trailing pixel bound of the active range along the scroll axis.
    pub physical_max: f64,
    /// Total virtual extent along the scroll axis. Always `>= 1`.
    pub scroll_size: f64,
    /// Scroll position the range was computed for, after clamping.
    pub scroll_position: f64,
    /// Placement of every active item, in index order.
    pub items: Vec<PlacedItem>,
}

impl LayoutInfo {
    /// First active index, if any.
    pub fn first(&self) -> Option<usize> {
        self.range.map(|r| r.first)
    }

    /// Last active index, if any.
    pub fn last(&self) -> Option<usize> {
        self.range.map(|r| r.last)
    }

    /// Placement of `index` if it is active.
    pub fn item(&self, index: usize) -> Option<&PlacedItem> {
        let first = self.first()?;
        self.items.get(index.checked_sub(first)?)
    }
}

/// Notifications queued by a layout and drained by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LayoutEvent {
    /// State went from clean to dirty; the collaborator should schedule a recompute.
    ReflowRequested,
    /// The active range differs from the last one reported.
    RangeChanged {
        /// New range, `None` when empty.
        range: Option<ActiveRange>,
    },
    /// The virtual scroll extent changed.
    ScrollSizeChanged {
        /// New extent.
        size: f64,
    },
    /// The layout moved the scroll position (scroll-to-index).
    ScrollPositionChanged {
        /// New position.
        position: f64,
    },
}
