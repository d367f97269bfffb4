//! Acceptance test harness simulating the scroller that drives a layout.
//!
//! A real collaborator batches scroll/resize events, recomputes once per
//! frame when the layout asked for it, renders the active items, measures the
//! ones it has not seen before, and feeds the measurements back. The harness
//! does the same against an in-memory "DOM" whose intrinsic item sizes come
//! from a closure.

use crate::layout::{self, Layout, LayoutConfig, LayoutEvent, LayoutInfo, ScrollAlign, Strategy};
use crate::model::{ItemSizes, Size};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Frames `settle` will run before declaring the layout unstable.
const MAX_SETTLE_FRAMES: usize = 32;

/// Drives a layout the way a scroller would.
pub struct ScrollerHarness {
    layout: Box<dyn Layout>,
    natural: Box<dyn Fn(usize) -> Size>,
    measured: BTreeSet<usize>,
    info: LayoutInfo,
    events: Vec<LayoutEvent>,
    recomputes: usize,
}

impl ScrollerHarness {
    /// Build a layout, size it and run it to a stable state.
    ///
    /// # Panics
    /// If `config` is invalid or the layout never settles.
    pub fn new(
        strategy: Strategy,
        config: &LayoutConfig,
        total_items: usize,
        viewport: Size,
        natural: impl Fn(usize) -> Size + 'static,
    ) -> Self {
        let mut layout =
            layout::build(strategy, config, Some(0x5eed)).expect("harness config must be valid");
        layout.set_total_items(total_items);
        layout.set_viewport_size(viewport);

        let mut harness = Self {
            layout,
            natural: Box::new(natural),
            measured: BTreeSet::new(),
            info: LayoutInfo::default(),
            events: Vec::new(),
            recomputes: 0,
        };
        harness.settle();
        harness
    }

    /// Run one frame: recompute if requested, then measure new active items.
    ///
    /// Returns whether a recompute happened.
    pub fn frame(&mut self) -> bool {
        let events = self.layout.drain_events();
        self.events.extend(events.iter().copied());
        if !events.contains(&LayoutEvent::ReflowRequested) {
            return false;
        }

        self.recomputes += 1;
        let info = self.layout.layout_info();
        let batch: ItemSizes = info
            .range
            .map(|range| {
                range
                    .indices()
                    .filter(|index| !self.measured.contains(index))
                    .map(|index| (index, (self.natural)(index)))
                    .collect()
            })
            .unwrap_or_default();
        self.info = info;

        if !batch.is_empty() {
            self.measured.extend(batch.keys().copied());
            self.layout.update_item_sizes(&batch);
        }
        true
    }

    /// Run frames until the layout stops requesting recomputes.
    ///
    /// # Panics
    /// If the layout is still dirty after a bounded number of frames.
    pub fn settle(&mut self) -> &LayoutInfo {
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.frame() {
                return &self.info;
            }
        }
        panic!("layout did not settle within {MAX_SETTLE_FRAMES} frames");
    }

    /// Scroll to `position` and settle.
    pub fn scroll_to(&mut self, position: f64) -> &LayoutInfo {
        self.layout.set_scroll_position(position);
        self.settle()
    }

    /// Request `index` be brought into view and settle.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) -> &LayoutInfo {
        self.layout.scroll_to_index(index, align);
        self.settle()
    }

    /// Resize the viewport and settle.
    pub fn resize(&mut self, viewport: Size) -> &LayoutInfo {
        self.layout.set_viewport_size(viewport);
        self.settle()
    }

    /// Deliver a burst of scroll events within a single frame.
    pub fn scroll_burst(&mut self, positions: &[f64]) {
        for &position in positions {
            self.layout.set_scroll_position(position);
        }
    }

    /// Output of the last recompute.
    pub fn info(&self) -> &LayoutInfo {
        &self.info
    }

    /// The layout under test.
    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    /// Number of recomputes run so far.
    pub fn recomputes(&self) -> usize {
        self.recomputes
    }

    /// Every notification observed so far.
    pub fn events(&self) -> &[LayoutEvent] {
        &self.events
    }

    /// Indices measured so far.
    pub fn measured(&self) -> &BTreeSet<usize> {
        &self.measured
    }

    /// Text rendering of the last output for snapshot tests.
    pub fn render_to_string(&self) -> String {
        let info = &self.info;
        let mut out = format!("scroll_size {:.1}", info.scroll_size);
        match info.range {
            Some(range) => {
                let _ = write!(out, " range {}..={}", range.first, range.last);
            }
            None => out.push_str(" range empty"),
        }
        for placed in &info.items {
            let rect = placed.rect;
            let _ = write!(
                out,
                "\n#{} top {:.1} left {:.1} size {:.1}x{:.1}",
                placed.index,
                rect.position.top,
                rect.position.left,
                rect.size.width,
                rect.size.height
            );
        }
        out
    }
}
