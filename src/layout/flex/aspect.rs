//! Online aspect-ratio estimation for unmeasured items.

use crate::model::Size;
use rand::Rng;
use std::collections::BTreeMap;

/// Frequency of observed width/height ratios, quantized to one decimal.
///
/// Buckets are stored as integer tenths (ratio 1.5 is bucket 15) so keys are
/// exact. Ratios below 0.05 land in bucket 1 so no sample has zero width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AspectRatioHistogram {
    buckets: BTreeMap<u32, u32>,
    measured: u32,
}

impl AspectRatioHistogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket a measurement falls into, `None` if it has no usable ratio.
    pub fn bucket(size: &Size) -> Option<u32> {
        if !size.is_measurable() {
            return None;
        }
        let tenths = (size.width / size.height * 10.0).round();
        Some(tenths.clamp(1.0, u32::MAX as f64) as u32)
    }

    /// Count one observation of `size`'s ratio.
    pub fn record(&mut self, size: &Size) {
        if let Some(bucket) = Self::bucket(size) {
            *self.buckets.entry(bucket).or_insert(0) += 1;
            self.measured += 1;
        }
    }

    /// Remove one previously recorded observation of `size`'s ratio.
    pub fn forget(&mut self, size: &Size) {
        let Some(bucket) = Self::bucket(size) else {
            return;
        };
        if let Some(count) = self.buckets.get_mut(&bucket) {
            *count -= 1;
            self.measured -= 1;
            if *count == 0 {
                self.buckets.remove(&bucket);
            }
        }
    }

    /// Total observations.
    pub fn len(&self) -> u32 {
        self.measured
    }

    /// True when nothing has been measured.
    pub fn is_empty(&self) -> bool {
        self.measured == 0
    }

    /// Observations in the bucket for `ratio`.
    pub fn count(&self, ratio: f64) -> u32 {
        let tenths = (ratio * 10.0).round().max(1.0) as u32;
        self.buckets.get(&tenths).copied().unwrap_or(0)
    }

    /// Draw a representative size, weighted by observed frequency.
    ///
    /// Returns `ratio x 1`, or `1 x 1` when nothing has been measured.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Size {
        if self.measured == 0 {
            return Size::square(1.0);
        }
        let target = rng.gen_range(0..self.measured);
        let mut cumulative = 0;
        for (&bucket, &count) in &self.buckets {
            cumulative += count;
            if cumulative > target {
                return Size::new(f64::from(bucket) / 10.0, 1.0);
            }
        }
        // Unreachable while `measured` equals the bucket total.
        Size::square(1.0)
    }
}
