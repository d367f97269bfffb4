//! Shared layout state and the contract every concrete layout satisfies.
//!
//! # Dirty-flag protocol
//!
//! Mutators never recompute. They record the new input and mark the layout
//! dirty through two flags:
//!
//! - `pending_reflow`: scroll extent and active range must be recomputed.
//! - `pending_layout_update`: the strategy's own derived state (columns,
//!   spacing, packed chunks) must be recomputed first.
//!
//! The first transition from clean to dirty queues a single
//! [`LayoutEvent::ReflowRequested`], so any number of mutations in the same
//! turn collapse into one recompute. The recompute itself runs only inside
//! [`Layout::layout_info`] or an explicit [`Layout::reflow_if_needed`], always
//! in the order: layout update → scroll size → active items → scroll-to-index
//! correction → change notifications.

use super::config::{LayoutConfig, ResolvedLayoutConfig};
use super::info::{ActiveRange, LayoutEvent, LayoutInfo, PlacedItem, ScrollAlign};
use crate::model::{Axis, ItemRect, ItemSizes, LayoutError, Position, Size};
use tracing::{debug, trace, warn};

/// Pending scroll-to-index request, resolved during the next recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    /// Requested item index (clamped on resolution).
    pub index: usize,
    /// Requested alignment.
    pub align: ScrollAlign,
}

/// Viewport, scroll and output state shared by every layout strategy.
#[derive(Debug, Clone)]
pub struct BaseLayout {
    config: ResolvedLayoutConfig,
    axis: Axis,
    viewport: Size,
    scroll_position: f64,
    total_items: usize,
    item_size: Size,
    spacing: f64,

    range: Option<ActiveRange>,
    physical_min: f64,
    physical_max: f64,
    scroll_size: f64,
    effective_scroll_position: f64,

    pending_reflow: bool,
    pending_layout_update: bool,
    scroll_target: Option<ScrollTarget>,

    reported_range: Option<Option<ActiveRange>>,
    reported_scroll_size: Option<f64>,
    events: Vec<LayoutEvent>,
}

impl BaseLayout {
    /// Create base state from a validated configuration.
    ///
    /// Starts dirty so the first `layout_info` performs a full recompute.
    pub fn new(config: ResolvedLayoutConfig) -> Self {
        Self {
            config,
            axis: Axis::new(config.direction),
            viewport: Size::default(),
            scroll_position: 0.0,
            total_items: 0,
            item_size: config.item_size,
            spacing: config.spacing,
            range: None,
            physical_min: 0.0,
            physical_max: 0.0,
            scroll_size: 1.0,
            effective_scroll_position: 0.0,
            pending_reflow: true,
            pending_layout_update: true,
            scroll_target: None,
            reported_range: None,
            reported_scroll_size: None,
            events: vec![LayoutEvent::ReflowRequested],
        }
    }

    // === Inputs ===

    /// Current validated configuration.
    pub fn config(&self) -> &ResolvedLayoutConfig {
        &self.config
    }

    /// Axis mapping for the configured direction.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Physical viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Visible extent along the scroll axis.
    pub fn view_dim1(&self) -> f64 {
        self.axis.primary_size(&self.viewport)
    }

    /// Visible extent across the scroll axis.
    pub fn view_dim2(&self) -> f64 {
        self.axis.secondary_size(&self.viewport)
    }

    /// Scroll position as last set by the collaborator (unclamped).
    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    /// Pre-render margin on each side of the viewport.
    pub fn overhang(&self) -> f64 {
        self.config.overhang
    }

    /// Authoritative item count.
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Nominal item size.
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    /// Nominal item extent along the scroll axis.
    pub fn item_dim1(&self) -> f64 {
        self.axis.primary_size(&self.item_size)
    }

    /// Nominal item extent across the scroll axis.
    pub fn item_dim2(&self) -> f64 {
        self.axis.secondary_size(&self.item_size)
    }

    /// Gap between items currently in effect.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Distance between consecutive grid rows.
    pub fn delta(&self) -> f64 {
        self.item_dim1() + self.spacing
    }

    // === Outputs ===

    /// Active range from the last recompute.
    pub fn range(&self) -> Option<ActiveRange> {
        self.range
    }

    /// Leading pixel bound of the active range.
    pub fn physical_min(&self) -> f64 {
        self.physical_min
    }

    /// Trailing pixel bound of the active range.
    pub fn physical_max(&self) -> f64 {
        self.physical_max
    }

    /// Total virtual extent along the scroll axis.
    pub fn scroll_size(&self) -> f64 {
        self.scroll_size
    }

    /// Scroll position used by the last active-range computation.
    pub fn effective_scroll_position(&self) -> f64 {
        self.effective_scroll_position
    }

    /// True when a recompute is owed.
    pub fn needs_reflow(&self) -> bool {
        self.pending_reflow
    }

    /// True when the strategy's derived state must be rebuilt first.
    pub fn needs_layout_update(&self) -> bool {
        self.pending_layout_update
    }

    // === Scheduling ===

    /// Mark scroll extent and active range dirty.
    pub fn schedule_reflow(&mut self) {
        if !self.pending_reflow {
            self.pending_reflow = true;
            self.events.push(LayoutEvent::ReflowRequested);
        }
    }

    /// Mark the strategy's derived state dirty (implies a reflow).
    pub fn schedule_layout_update(&mut self) {
        self.pending_layout_update = true;
        self.schedule_reflow();
    }

    // === Strategy-facing mutators ===

    /// Override the runtime spacing without touching the configuration.
    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
    }

    /// Record the extent computed by `update_scroll_size`, floored at 1.
    pub fn set_scroll_size(&mut self, size: f64) {
        let size = if size.is_finite() { size } else { 1.0 };
        self.scroll_size = size.max(1.0);
    }

    /// Record a non-empty active range and its pixel span.
    pub fn set_active(&mut self, range: ActiveRange, physical_min: f64, physical_max: f64) {
        debug_assert!(range.last < self.total_items.max(1));
        self.range = Some(range);
        self.physical_min = physical_min;
        self.physical_max = physical_max;
    }

    /// Record an empty active range.
    pub fn clear_active(&mut self) {
        self.range = None;
        self.physical_min = 0.0;
        self.physical_max = 0.0;
    }

    /// Clamp the scroll position into `[0, scroll_size - view_dim1]` and
    /// return the `(min, max)` pixel window including overhang.
    pub fn active_window(&mut self) -> (f64, f64) {
        let view = self.view_dim1();
        let max_scroll = (self.scroll_size - view).max(0.0);
        let position = self.scroll_position.clamp(0.0, max_scroll);
        self.effective_scroll_position = position;

        let overhang = self.overhang();
        let min = (position - overhang).max(0.0);
        let max = (position + view + overhang).min(self.scroll_size);
        (min, max)
    }

    fn replace_config(&mut self, next: ResolvedLayoutConfig) -> ResolvedLayoutConfig {
        std::mem::replace(&mut self.config, next)
    }

    fn publish_state(&mut self) {
        if self.reported_range != Some(self.range) {
            self.reported_range = Some(self.range);
            self.events
                .push(LayoutEvent::RangeChanged { range: self.range });
        }
        if self.reported_scroll_size != Some(self.scroll_size) {
            self.reported_scroll_size = Some(self.scroll_size);
            self.events.push(LayoutEvent::ScrollSizeChanged {
                size: self.scroll_size,
            });
        }
    }
}

/// A windowing strategy driven by an external scroller.
///
/// Implementors provide the geometric hooks; the scheduling protocol and the
/// public mutators are provided methods and must not be overridden.
pub trait Layout {
    /// Shared state.
    fn base(&self) -> &BaseLayout;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut BaseLayout;

    // === Strategy hooks ===

    /// Rebuild strategy-derived state (columns, spacing, packing).
    fn update_layout(&mut self);

    /// Compute the virtual scroll extent.
    fn update_scroll_size(&mut self);

    /// Compute the active range and its pixel bounds.
    fn compute_active_items(&mut self);

    /// Placement of `index`, or `None` when it is not laid out.
    fn item_rect(&self, index: usize) -> Option<ItemRect>;

    /// Absorb a batch of measurements.
    fn update_item_sizes(&mut self, sizes: &ItemSizes);

    /// The viewport's cross-axis extent changed.
    fn secondary_dim_changed(&mut self) {
        self.base_mut().schedule_layout_update();
    }

    /// The viewport's scroll-axis extent changed.
    fn primary_dim_changed(&mut self) {
        self.base_mut().schedule_reflow();
    }

    /// The nominal item's cross-axis extent changed.
    fn item_dim2_changed(&mut self) {
        self.base_mut().schedule_layout_update();
    }

    /// The item count changed from `previous`.
    fn total_items_changed(&mut self, _previous: usize) {}

    /// Discard every cached derived value.
    fn invalidate_caches(&mut self) {}

    // === Provided operations ===

    /// Position of `index`, if laid out.
    fn item_position(&self, index: usize) -> Option<Position> {
        self.item_rect(index).map(|rect| rect.position)
    }

    /// Update the viewport size.
    ///
    /// Negative or non-finite sides are treated as zero.
    fn set_viewport_size(&mut self, size: Size) {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let size = Size::new(sanitize(size.width), sanitize(size.height));

        let base = self.base();
        let axis = base.axis();
        let (dim1, dim2) = axis.split(&size);
        let dim1_changed = dim1 != base.view_dim1();
        let dim2_changed = dim2 != base.view_dim2();
        if !(dim1_changed || dim2_changed) {
            return;
        }

        trace!(dim1, dim2, "viewport size changed");
        self.base_mut().viewport = size;
        if dim2_changed {
            self.secondary_dim_changed();
        }
        if dim1_changed {
            self.primary_dim_changed();
        }
        self.base_mut().schedule_reflow();
    }

    /// Update the scroll position.
    ///
    /// Out-of-range values are stored as given and clamped during the next
    /// recompute. Non-finite values are treated as zero.
    fn set_scroll_position(&mut self, position: f64) {
        let position = if position.is_finite() { position } else { 0.0 };
        let base = self.base_mut();
        if position != base.scroll_position {
            base.scroll_position = position;
            base.schedule_reflow();
        }
    }

    /// Update the item count.
    fn set_total_items(&mut self, total: usize) {
        let previous = self.base().total_items;
        if total == previous {
            return;
        }
        trace!(previous, total, "total items changed");
        self.base_mut().total_items = total;
        self.total_items_changed(previous);
        self.base_mut().schedule_reflow();
    }

    /// Update the nominal item size.
    ///
    /// Sizes without a positive, finite extent on both sides are ignored.
    fn set_item_size(&mut self, size: Size) {
        if !size.is_measurable() {
            trace!(?size, "ignoring unmeasurable item size");
            return;
        }
        let base = self.base();
        if size == base.item_size {
            return;
        }
        let axis = base.axis();
        let dim1_changed = axis.primary_size(&size) != base.item_dim1();
        let dim2_changed = axis.secondary_size(&size) != base.item_dim2();

        self.base_mut().item_size = size;
        if dim2_changed {
            self.item_dim2_changed();
        }
        if dim1_changed {
            self.base_mut().schedule_reflow();
        }
    }

    /// Apply configuration overrides.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value; the previous configuration remains
    /// in effect.
    fn apply_config(&mut self, overrides: &LayoutConfig) -> Result<(), LayoutError> {
        let next = match self.base().config().merged(overrides) {
            Ok(next) => next,
            Err(err) => {
                warn!(%err, "rejected layout configuration");
                return Err(err);
            }
        };
        let previous = self.base_mut().replace_config(next);
        if previous == next {
            return Ok(());
        }
        debug!(?next, "layout configuration applied");

        if next.item_size != previous.item_size {
            self.set_item_size(next.item_size);
        }
        if next.overhang != previous.overhang {
            self.base_mut().schedule_reflow();
        }

        let structural = next.direction != previous.direction
            || next.spacing != previous.spacing
            || next.ideal_size != previous.ideal_size
            || next.columns != previous.columns;
        if structural {
            let base = self.base_mut();
            base.axis = Axis::new(next.direction);
            base.spacing = next.spacing;
            self.reflow();
        }
        Ok(())
    }

    /// Discard every cached computed value; the next recompute rebuilds
    /// everything from the current inputs.
    fn reflow(&mut self) {
        self.invalidate_caches();
        self.base_mut().schedule_layout_update();
    }

    /// Run the recompute pipeline if dirty (or unconditionally with `force`).
    ///
    /// Returns whether a recompute ran.
    fn reflow_if_needed(&mut self, force: bool) -> bool {
        if !(force || self.base().pending_reflow) {
            return false;
        }
        self.base_mut().pending_reflow = false;

        if self.base().pending_layout_update {
            self.base_mut().pending_layout_update = false;
            self.update_layout();
        }
        self.update_scroll_size();
        self.compute_active_items();
        resolve_scroll_target(self);
        self.base_mut().publish_state();

        let base = self.base();
        debug!(
            range = ?base.range,
            physical_min = base.physical_min,
            physical_max = base.physical_max,
            scroll_size = base.scroll_size,
            "layout recomputed"
        );
        true
    }

    /// Current output, recomputing first if dirty.
    fn layout_info(&mut self) -> LayoutInfo {
        self.reflow_if_needed(false);
        let base = self.base();
        let items = base
            .range
            .map(|range| {
                range
                    .indices()
                    .filter_map(|index| {
                        let rect = self.item_rect(index)?;
                        Some(PlacedItem { index, rect })
                    })
                    .collect()
            })
            .unwrap_or_default();

        LayoutInfo {
            range: base.range,
            physical_min: base.physical_min,
            physical_max: base.physical_max,
            scroll_size: base.scroll_size,
            scroll_position: base.effective_scroll_position,
            items,
        }
    }

    /// Request that `index` be scrolled into view with `align`.
    ///
    /// Resolved during the next recompute, once the scroll extent is known.
    fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) {
        let base = self.base_mut();
        base.scroll_target = Some(ScrollTarget { index, align });
        base.schedule_reflow();
    }

    /// Take every queued notification.
    fn drain_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.base_mut().events)
    }
}

fn resolve_scroll_target<L: Layout + ?Sized>(layout: &mut L) {
    let Some(target) = layout.base_mut().scroll_target.take() else {
        return;
    };
    let Some(last_index) = layout.base().total_items.checked_sub(1) else {
        return;
    };
    let index = target.index.min(last_index);
    let Some(rect) = layout.item_rect(index) else {
        return;
    };

    let base = layout.base();
    let axis = base.axis();
    let item_pos = axis.primary_pos(&rect.position);
    let item_size = axis.primary_size(&rect.size);
    let view = base.view_dim1();
    let current = base.effective_scroll_position;

    let desired = match target.align {
        ScrollAlign::Start => item_pos,
        ScrollAlign::Center => item_pos - (view - item_size) / 2.0,
        ScrollAlign::End => item_pos - (view - item_size),
        ScrollAlign::Nearest => {
            if item_pos < current {
                item_pos
            } else if item_pos + item_size > current + view {
                item_pos - (view - item_size)
            } else {
                current
            }
        }
    };
    let position = desired.clamp(0.0, (base.scroll_size - view).max(0.0));
    if position == current {
        return;
    }

    trace!(index, position, "scrolling to index");
    let base = layout.base_mut();
    base.scroll_position = position;
    base.events
        .push(LayoutEvent::ScrollPositionChanged { position });
    layout.compute_active_items();
}

#[cfg(test)]
#[path = "base_tests.rs"]
mod tests;
