//! Justified row packing and the per-chunk cache.
//!
//! A chunk is a contiguous slice of items packed on its own, in coordinates
//! local to the chunk. Rows never straddle chunks, so a chunk can be repacked
//! without touching its neighbours.

use crate::model::{Axis, ItemRect, Position, Size};

/// A packed line of items perpendicular to the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    /// First item index in the row (global).
    pub start_index: usize,
    /// Last item index in the row (global, inclusive).
    pub end_index: usize,
    /// Leading edge of the row slot along the scroll axis. The row's items sit
    /// one spacing further in.
    pub start: f64,
    /// Resolved extent of the row's items along the scroll axis.
    pub extent: f64,
}

impl Row {
    /// Trailing edge of the row slot, including the gaps on both sides.
    pub fn end(&self, spacing: f64) -> f64 {
        self.start + self.extent + 2.0 * spacing
    }

    /// The same row moved `offset` pixels along the scroll axis.
    pub fn shifted(&self, offset: f64) -> Self {
        Self {
            start: self.start + offset,
            ..*self
        }
    }
}

/// Packed output for one slice of items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    /// Global index of the first item in the chunk.
    pub first_index: usize,
    /// Rows in packing order.
    pub rows: Vec<Row>,
    /// Item placements, indexed by `index - first_index`.
    pub items: Vec<ItemRect>,
    /// Extent along the scroll axis: the last row's `start + extent`.
    pub extent: f64,
}

impl Chunk {
    /// Number of items in the chunk.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the chunk holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Placement of global `index`, if it belongs to this chunk.
    pub fn item(&self, index: usize) -> Option<&ItemRect> {
        self.items.get(index.checked_sub(self.first_index)?)
    }
}

/// Inputs that fix how a chunk is packed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackParams {
    /// Axis mapping.
    pub axis: Axis,
    /// Viewport extent across the scroll axis.
    pub view_dim2: f64,
    /// Gap between items and around the row.
    pub spacing: f64,
    /// Target primary-axis extent before justification.
    pub ideal_size: f64,
}

impl PackParams {
    /// Cross-axis extent every row is justified to.
    pub fn row_span(&self) -> f64 {
        self.view_dim2 - 2.0 * self.spacing
    }
}

/// Pack `natural` sizes (items `first_index..`) into justified rows.
///
/// Greedy: an item joins the current row unless doing so moves the row's
/// required scale factor further from 1 than it already is, in which case the
/// row is closed without it. Every closed row is scaled uniformly so its items
/// plus interior gaps span exactly `view_dim2 - 2 * spacing`. The last item
/// always closes the final row.
///
/// Every size in `natural` must be measurable and `params.row_span()` must be
/// positive.
pub fn pack_chunk(first_index: usize, natural: &[Size], params: &PackParams) -> Chunk {
    debug_assert!(params.row_span() > 0.0);
    let PackParams {
        axis,
        view_dim2,
        spacing,
        ideal_size,
    } = *params;

    let mut chunk = Chunk {
        first_index,
        rows: Vec::new(),
        items: Vec::with_capacity(natural.len()),
        extent: 0.0,
    };
    let mut row_first = 0;
    let mut start_pos = spacing;
    let mut row_size2 = 0.0;
    let mut last_ratio = f64::INFINITY;

    for (local, dims) in natural.iter().enumerate() {
        debug_assert!(dims.is_measurable());
        let scale = ideal_size / axis.primary_size(dims);
        let adj_size2 = axis.secondary_size(dims) * scale;
        let size = axis.size(ideal_size, adj_size2);
        chunk.items.push(ItemRect::new(Position::default(), size));

        let count = (local - row_first + 1) as f64;
        let available = view_dim2 - spacing * (count + 1.0);
        let ratio = available / (row_size2 + adj_size2);

        let worse = ratio <= 0.0 || (1.0 - ratio).abs() > (1.0 - last_ratio).abs();
        if local > row_first && worse {
            // Row is better without this item.
            finish_row(
                &mut chunk,
                row_first,
                local - 1,
                last_ratio,
                start_pos,
                params,
            );
            start_pos += ideal_size * last_ratio + spacing;
            row_first = local;
            last_ratio = params.row_span() / adj_size2;
            row_size2 = adj_size2;
        } else {
            row_size2 += adj_size2;
            last_ratio = ratio;
        }
    }
    if let Some(last) = natural.len().checked_sub(1) {
        finish_row(&mut chunk, row_first, last, last_ratio, start_pos, params);
    }

    if let Some(row) = chunk.rows.last() {
        chunk.extent = row.start + row.extent;
    }
    chunk
}

fn finish_row(
    chunk: &mut Chunk,
    first: usize,
    last: usize,
    ratio: f64,
    start_pos: f64,
    params: &PackParams,
) {
    let axis = params.axis;
    let mut secondary = params.spacing;
    for rect in &mut chunk.items[first..=last] {
        rect.size = rect.size.scaled(ratio);
        rect.position = axis.position(start_pos, secondary);
        secondary += axis.secondary_size(&rect.size) + params.spacing;
    }
    chunk.rows.push(Row {
        start_index: chunk.first_index + first,
        end_index: chunk.first_index + last,
        start: start_pos - params.spacing,
        extent: axis.primary_size(&chunk.items[last].size),
    });
}

/// Packed chunks keyed by chunk index, with explicit staleness.
#[derive(Debug, Clone, Default)]
pub struct ChunkCache {
    entries: Vec<ChunkEntry>,
}

#[derive(Debug, Clone, Default)]
enum ChunkEntry {
    #[default]
    Stale,
    Packed(Chunk),
}

impl ChunkCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunk slots (fresh or stale).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no slots at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packed chunk `k`, unless stale or absent.
    pub fn get(&self, k: usize) -> Option<&Chunk> {
        match self.entries.get(k) {
            Some(ChunkEntry::Packed(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// True when chunk `k` is packed and current.
    pub fn is_fresh(&self, k: usize) -> bool {
        self.get(k).is_some()
    }

    /// Store a freshly packed chunk `k`.
    pub fn insert(&mut self, k: usize, chunk: Chunk) {
        if k >= self.entries.len() {
            self.entries.resize_with(k + 1, ChunkEntry::default);
        }
        self.entries[k] = ChunkEntry::Packed(chunk);
    }

    /// Mark chunk `k` stale.
    pub fn invalidate(&mut self, k: usize) {
        if let Some(entry) = self.entries.get_mut(k) {
            *entry = ChunkEntry::Stale;
        }
    }

    /// Mark chunk `k` and every later chunk stale.
    pub fn invalidate_from(&mut self, k: usize) {
        for entry in self.entries.iter_mut().skip(k) {
            *entry = ChunkEntry::Stale;
        }
    }

    /// Drop slots at and beyond `len`.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Drop every slot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
