//! Bounded FIFO cache for computed visibility frames.

use std::collections::{HashMap, VecDeque};

use crate::VisibleFrame;

/// Maximum number of frames retained by the cache.
pub(crate) const CACHE_CAPACITY: usize = 100;

/// Cache key derived from an origin quantized to one decimal pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    tenth_x: i64,
    tenth_y: i64,
}

impl CacheKey {
    /// Quantizes a continuous origin to one decimal place.
    pub(crate) fn quantize(x: f32, y: f32) -> Self {
        Self {
            tenth_x: (f64::from(x) * 10.0).round() as i64,
            tenth_y: (f64::from(y) * 10.0).round() as i64,
        }
    }

    /// Continuous origin represented by the key.
    ///
    /// Sweeps run from this position rather than the raw input, so the
    /// computed frame is a pure function of the key.
    pub(crate) fn origin(&self) -> (f32, f32) {
        (self.tenth_x as f32 / 10.0, self.tenth_y as f32 / 10.0)
    }
}

/// Insertion-order bounded frame store.
///
/// Eviction is strict FIFO over insertion order. A cache hit does not refresh
/// the entry's position, so a long-lived entry is evicted exactly
/// `CACHE_CAPACITY` insertions after it was stored regardless of how often it
/// was read. This mirrors the original engine's behaviour and keeps eviction
/// deterministic.
#[derive(Debug, Default)]
pub(crate) struct FrameCache {
    order: VecDeque<CacheKey>,
    frames: HashMap<CacheKey, VisibleFrame>,
}

impl FrameCache {
    pub(crate) fn get(&self, key: &CacheKey) -> Option<&VisibleFrame> {
        self.frames.get(key)
    }

    /// Returns the frame for `key`, computing and storing it on a miss.
    ///
    /// On insertion beyond the capacity the oldest-inserted entry is dropped
    /// first, so the cache never holds more than `CACHE_CAPACITY` frames.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: CacheKey, compute: F) -> &VisibleFrame
    where
        F: FnOnce() -> VisibleFrame,
    {
        if !self.frames.contains_key(&key) {
            self.order.push_back(key);
            if self.order.len() > CACHE_CAPACITY {
                if let Some(oldest) = self.order.pop_front() {
                    let _ = self.frames.remove(&oldest);
                }
            }
        }
        self.frames.entry(key).or_insert_with(compute)
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.frames.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }
}
