//! Auto-fitting uniform grid.
//!
//! Assumes every item shares one natural size, taken from the first
//! measurement reported. Column count and spacing are derived from that size
//! and the viewport's cross-axis extent; windowing and positioning are the
//! fixed grid's.

use super::base::{BaseLayout, Layout};
use super::config::LayoutConfig;
use super::grid::GridLayout;
use crate::model::{ItemRect, ItemSizes, LayoutError};
use tracing::debug;

/// Grid whose column count and spacing fit the viewport.
#[derive(Debug, Clone)]
pub struct NaturalSizeGridLayout {
    grid: GridLayout,
}

impl NaturalSizeGridLayout {
    /// Create a layout from configuration overrides on top of the defaults.
    ///
    /// `spacing` and `columns` are derived, so those overrides only matter
    /// until the first recompute.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is invalid.
    pub fn new(config: &LayoutConfig) -> Result<Self, LayoutError> {
        Ok(Self {
            grid: GridLayout::new(config)?,
        })
    }

    /// Derived column count.
    pub fn columns(&self) -> usize {
        self.grid.columns()
    }
}

/// Columns that fit `view_dim2` and the evenly distributed leftover gap.
pub fn fit_columns(view_dim2: f64, item_dim2: f64) -> (usize, f64) {
    if !(item_dim2 > 0.0) {
        return (1, 0.0);
    }
    let columns = ((view_dim2 / item_dim2).floor() as usize).max(1);
    if columns > 1 {
        let used = columns as f64 * item_dim2;
        (columns, (view_dim2 % used) / (columns as f64 + 1.0))
    } else {
        (1, 0.0)
    }
}

impl Layout for NaturalSizeGridLayout {
    fn base(&self) -> &BaseLayout {
        self.grid.base()
    }

    fn base_mut(&mut self) -> &mut BaseLayout {
        self.grid.base_mut()
    }

    fn update_layout(&mut self) {
        let base = self.grid.base();
        let (columns, spacing) = fit_columns(base.view_dim2(), base.item_dim2());
        debug!(columns, spacing, "natural grid fitted");
        self.grid.set_derived_columns(columns);
        self.grid.base_mut().set_spacing(spacing);
    }

    fn update_scroll_size(&mut self) {
        self.grid.update_scroll_size();
    }

    fn compute_active_items(&mut self) {
        self.grid.active_rows();
    }

    fn item_rect(&self, index: usize) -> Option<ItemRect> {
        self.grid.cell_rect(index)
    }

    fn update_item_sizes(&mut self, sizes: &ItemSizes) {
        // Uniform sizing: the lowest-index measurement speaks for every item.
        if let Some(size) = sizes.values().next().copied() {
            if size.is_measurable() {
                self.set_item_size(size);
            }
        }
    }
}
