//! Justified variable-aspect-ratio layout.
//!
//! Items are scaled to a common ideal extent along the scroll axis, greedily
//! packed into rows, and each row is scaled so it exactly fills the viewport's
//! cross axis. Packing happens per chunk (see [`chunk`]) so a resize or a new
//! measurement only repacks a bounded number of items. Items that have not
//! been measured yet borrow a ratio sampled from the ones that have
//! (see [`aspect`]).

pub mod aspect;
pub mod chunk;

use self::aspect::AspectRatioHistogram;
use self::chunk::{pack_chunk, ChunkCache, PackParams, Row};
use super::base::{BaseLayout, Layout};
use super::config::{LayoutConfig, ResolvedLayoutConfig};
use super::info::ActiveRange;
use crate::model::{ItemRect, ItemSizes, LayoutError, Size};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Justified packing layout with an injectable random source for estimation.
#[derive(Debug, Clone)]
pub struct FlexLayout<R = StdRng> {
    base: BaseLayout,
    item_sizes: HashMap<usize, Size>,
    aspect_ratios: AspectRatioHistogram,
    chunk_size: Option<usize>,
    packed_dim2: f64,
    chunks: ChunkCache,
    rows: Vec<Row>,
    stacked: Vec<StackedChunk>,
    rng: R,
}

/// Where a packed chunk sits in the stacked row list.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StackedChunk {
    offset: f64,
    first_row: usize,
}

impl FlexLayout<StdRng> {
    /// Create a flex layout seeded from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is invalid (e.g. `ideal_size <= 0`).
    pub fn new(config: &LayoutConfig) -> Result<Self, LayoutError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a flex layout whose estimates are reproducible for `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is invalid.
    pub fn seeded(config: &LayoutConfig, seed: u64) -> Result<Self, LayoutError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FlexLayout<R> {
    /// Create a flex layout drawing estimates from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if any override is invalid.
    pub fn with_rng(config: &LayoutConfig, rng: R) -> Result<Self, LayoutError> {
        let resolved = ResolvedLayoutConfig::default().merged(config)?;
        Ok(Self {
            base: BaseLayout::new(resolved),
            item_sizes: HashMap::new(),
            aspect_ratios: AspectRatioHistogram::new(),
            chunk_size: None,
            packed_dim2: 0.0,
            chunks: ChunkCache::new(),
            rows: Vec::new(),
            stacked: Vec::new(),
            rng,
        })
    }

    /// Target primary-axis size before justification.
    pub fn ideal_size(&self) -> f64 {
        self.base.config().ideal_size
    }

    /// Change the ideal size, discarding every packed chunk.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidIdealSize`] for non-positive values; the
    /// previous ideal size stays in effect.
    pub fn set_ideal_size(&mut self, px: f64) -> Result<(), LayoutError> {
        self.apply_config(&LayoutConfig::ideal_size(px))
    }

    /// Items per chunk, once the viewport has been sized.
    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Packed rows in scroll order, in container coordinates.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Observed aspect ratios.
    pub fn aspect_ratios(&self) -> &AspectRatioHistogram {
        &self.aspect_ratios
    }

    /// Chunk size covering about two viewports at the ideal item size.
    pub fn chunk_size_for(view_dim1: f64, view_dim2: f64, ideal_size: f64) -> usize {
        let estimate = (2.0 * view_dim1 * view_dim2 / (ideal_size * ideal_size)).ceil();
        if estimate.is_finite() {
            estimate.max(1.0) as usize
        } else {
            1
        }
    }

    fn natural_item_size(&mut self, index: usize) -> Size {
        match self.item_sizes.get(&index) {
            Some(size) => *size,
            None => self.aspect_ratios.sample(&mut self.rng),
        }
    }

    fn clear_packing(&mut self) {
        self.chunks.clear();
        self.rows.clear();
        self.stacked.clear();
    }

    /// Stack chunks `from..chunk_count` after the ones already in place.
    ///
    /// Rows of chunks before `from` are kept as they are. Returns the number
    /// of chunks stacked.
    fn restack_from(&mut self, from: usize, chunk_count: usize) -> usize {
        let spacing = self.base.spacing();
        let from = from.min(chunk_count).min(self.stacked.len());
        let resume = from.checked_sub(1).and_then(|prev| {
            let placed = self.stacked.get(prev)?;
            Some(placed.offset + self.chunks.get(prev)?.extent + spacing)
        });
        let (from, mut offset) = match resume {
            Some(offset) => (from, offset),
            None => (0, 0.0),
        };

        let kept_rows = self
            .stacked
            .get(from)
            .map_or(self.rows.len(), |placed| placed.first_row);
        self.rows.truncate(kept_rows);
        self.stacked.truncate(from);

        for k in from..chunk_count {
            let Some(chunk) = self.chunks.get(k) else {
                debug_assert!(false, "chunk {k} missing after packing");
                break;
            };
            self.stacked.push(StackedChunk {
                offset,
                first_row: self.rows.len(),
            });
            self.rows
                .extend(chunk.rows.iter().map(|row| row.shifted(offset)));
            offset += chunk.extent + spacing;
        }
        self.stacked.len() - from
    }

    fn chunk_for(&self, index: usize) -> Option<usize> {
        self.chunk_size.map(|size| index / size)
    }
}

impl<R: Rng> Layout for FlexLayout<R> {
    fn base(&self) -> &BaseLayout {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseLayout {
        &mut self.base
    }

    fn update_layout(&mut self) {
        let view_dim1 = self.base.view_dim1();
        let view_dim2 = self.base.view_dim2();
        let params = PackParams {
            axis: self.base.axis(),
            view_dim2,
            spacing: self.base.spacing(),
            ideal_size: self.ideal_size(),
        };
        if !(view_dim1 > 0.0 && params.row_span() > 0.0) {
            trace!(view_dim1, view_dim2, "viewport too small to pack");
            self.chunk_size = None;
            self.clear_packing();
            return;
        }

        let chunk_size = Self::chunk_size_for(view_dim1, view_dim2, params.ideal_size);
        if self.chunk_size != Some(chunk_size) || self.packed_dim2 != view_dim2 {
            debug!(chunk_size, view_dim2, "re-chunking");
            self.chunks.clear();
            self.chunk_size = Some(chunk_size);
            self.packed_dim2 = view_dim2;
        }

        let total = self.base.total_items();
        let chunk_count = total.div_ceil(chunk_size);
        self.chunks.truncate(chunk_count);

        let mut repacked = 0;
        let mut first_repacked = chunk_count;
        for k in 0..chunk_count {
            if self.chunks.is_fresh(k) {
                continue;
            }
            let start = k * chunk_size;
            let end = (start + chunk_size).min(total);
            let natural: Vec<Size> = (start..end).map(|i| self.natural_item_size(i)).collect();
            self.chunks.insert(k, pack_chunk(start, &natural, &params));
            first_repacked = first_repacked.min(k);
            repacked += 1;
        }
        let restacked = self.restack_from(first_repacked, chunk_count);
        debug!(
            repacked,
            restacked,
            chunk_count,
            rows = self.rows.len(),
            "flex layout packed"
        );
    }

    fn update_scroll_size(&mut self) {
        let extent = match self.rows.last() {
            Some(row) => row.start + row.extent + 2.0 * self.base.spacing(),
            None => 1.0,
        };
        self.base.set_scroll_size(extent);
    }

    fn compute_active_items(&mut self) {
        let rows = &self.rows;
        let base = &mut self.base;
        let Some(last_row) = rows.len().checked_sub(1) else {
            base.clear_active();
            return;
        };

        let spacing = base.spacing();
        let scroll_size = base.scroll_size();
        let (min, max) = base.active_window();

        // Seed proportionally, then walk to the row containing `min`.
        let mid = (min + max) / 2.0;
        let estimate = (mid / scroll_size * rows.len() as f64).round();
        let mut idx = if estimate.is_finite() {
            (estimate.max(0.0) as usize).min(last_row)
        } else {
            0
        };
        while idx < last_row && rows[idx].start < min {
            idx += 1;
        }
        while idx > 0 && rows[idx].start > min {
            idx -= 1;
        }
        let first = rows[idx].start_index;
        let physical_min = rows[idx].start;

        let mut row_max = rows[idx].end(spacing);
        while idx < last_row && row_max < max {
            idx += 1;
            row_max = rows[idx].end(spacing);
        }
        let last = rows[idx].end_index;

        base.set_active(ActiveRange::new(first, last), physical_min, row_max);
    }

    fn item_rect(&self, index: usize) -> Option<ItemRect> {
        if index >= self.base.total_items() {
            return None;
        }
        let k = self.chunk_for(index)?;
        let chunk = self.chunks.get(k)?;
        let offset = self.stacked.get(k)?.offset;
        let mut rect = *chunk.item(index)?;
        let axis = self.base.axis();
        let primary = axis.primary_pos(&rect.position) + offset;
        axis.set_primary_pos(&mut rect.position, primary);
        Some(rect)
    }

    fn update_item_sizes(&mut self, sizes: &ItemSizes) {
        let mut changed = 0;
        for (&index, &size) in sizes {
            if !size.is_measurable() {
                continue;
            }
            let previous = self.item_sizes.insert(index, size);
            if previous == Some(size) {
                continue;
            }
            if let Some(previous) = previous {
                self.aspect_ratios.forget(&previous);
            }
            self.aspect_ratios.record(&size);
            if let Some(k) = self.chunk_for(index) {
                self.chunks.invalidate(k);
            }
            changed += 1;
        }
        if changed > 0 {
            trace!(changed, "flex measurements updated");
            self.base.schedule_layout_update();
        }
    }

    fn secondary_dim_changed(&mut self) {
        // Row membership depends on the cross-axis extent.
        self.chunks.clear();
        self.base.schedule_layout_update();
    }

    fn primary_dim_changed(&mut self) {
        // Chunk size depends on viewport area.
        self.base.schedule_layout_update();
    }

    fn total_items_changed(&mut self, previous: usize) {
        let total = self.base.total_items();
        if total < previous {
            let dropped: Vec<usize> = self
                .item_sizes
                .keys()
                .copied()
                .filter(|&index| index >= total)
                .collect();
            for index in dropped {
                if let Some(size) = self.item_sizes.remove(&index) {
                    self.aspect_ratios.forget(&size);
                }
            }
        }
        if let Some(k) = self.chunk_for(previous.min(total)) {
            self.chunks.invalidate_from(k);
        }
        self.base.schedule_layout_update();
    }

    fn invalidate_caches(&mut self) {
        self.chunk_size = None;
        self.clear_packing();
    }
}

#[cfg(test)]
#[path = "flex_tests.rs"]
mod tests;
