//! Fixed-cell grid windowing.
//!
//! Items are uniform cells of the nominal item size, arranged in a fixed number
//! of columns (perpendicular to the scroll axis) and as many rows as needed.
//! Because every row has the same extent, the active range is pure arithmetic.

use super::base::{BaseLayout, Layout};
use super::config::{LayoutConfig, ResolvedLayoutConfig};
use super::info::ActiveRange;
use crate::model::{ItemRect, ItemSizes, LayoutError};
use tracing::trace;

/// Uniform grid with an externally supplied column count.
#[derive(Debug, Clone)]
pub struct GridLayout {
    base: BaseLayout,
    columns: usize,
}

impl GridLayout {
    /// Create a grid from configuration overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is invalid.
    pub fn new(config: &LayoutConfig) -> Result<Self, LayoutError> {
        let resolved = ResolvedLayoutConfig::default().merged(config)?;
        Ok(Self {
            base: BaseLayout::new(resolved),
            columns: resolved.columns,
        })
    }

    /// Column count currently in effect.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Change the column count.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidColumnCount`] for zero; the previous
    /// count stays in effect.
    pub fn set_columns(&mut self, columns: usize) -> Result<(), LayoutError> {
        self.apply_config(&LayoutConfig::columns(columns))
    }

    /// Number of rows needed for the current item count.
    pub fn row_count(&self) -> usize {
        self.base.total_items().div_ceil(self.columns)
    }

    pub(crate) fn set_derived_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub(crate) fn scroll_extent(&self) -> f64 {
        self.row_count() as f64 * self.base.delta() + self.base.spacing()
    }

    pub(crate) fn active_rows(&mut self) {
        let columns = self.columns;
        let rows = self.row_count();
        let delta = self.base.delta();
        let base = &mut self.base;

        let Some(last_index) = base.total_items().checked_sub(1) else {
            base.clear_active();
            return;
        };
        if !(delta > 0.0) {
            base.clear_active();
            return;
        }

        let (min, max) = base.active_window();
        let last_row_index = rows.saturating_sub(1);
        let first_row = ((min / delta).floor() as usize).min(last_row_index);
        let last_row = ((max / delta).ceil() as usize)
            .saturating_sub(1)
            .clamp(first_row, last_row_index);

        let first = first_row * columns;
        let last = ((last_row + 1) * columns - 1).min(last_index);
        base.set_active(
            ActiveRange::new(first, last),
            delta * first_row as f64,
            delta * (last_row + 1) as f64,
        );
    }

    pub(crate) fn cell_rect(&self, index: usize) -> Option<ItemRect> {
        if index >= self.base.total_items() {
            return None;
        }
        let spacing = self.base.spacing();
        let row = (index / self.columns) as f64;
        let column = (index % self.columns) as f64;
        let primary = spacing + row * self.base.delta();
        let secondary = spacing + column * (self.base.item_dim2() + spacing);
        let position = self.base.axis().position(primary, secondary);
        Some(ItemRect::new(position, self.base.item_size()))
    }
}

impl Layout for GridLayout {
    fn base(&self) -> &BaseLayout {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseLayout {
        &mut self.base
    }

    fn update_layout(&mut self) {
        self.columns = self.base.config().columns;
    }

    fn update_scroll_size(&mut self) {
        let extent = self.scroll_extent();
        self.base.set_scroll_size(extent);
    }

    fn compute_active_items(&mut self) {
        self.active_rows();
    }

    fn item_rect(&self, index: usize) -> Option<ItemRect> {
        self.cell_rect(index)
    }

    fn update_item_sizes(&mut self, sizes: &ItemSizes) {
        // Cells are fixed; measurements never change the layout.
        trace!(count = sizes.len(), "fixed grid ignores measurements");
    }
}
