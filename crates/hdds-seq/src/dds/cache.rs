// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-reader sample history with read/take semantics.
//!
//! ```text
//! Buffer: [S0][S1][S2][S3][S4][S5]   (KEEP_LAST depth = 6)
//!          ^              ^
//!          |              |
//!      oldest        read_cursor
//!
//! read()  -> clone at read_cursor, advance cursor
//! take()  -> remove oldest, shift cursor
//! push()  -> append, evict oldest when full
//! ```

use super::instance::InstanceHandle;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Sample delivered to a reader, with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<D> {
    /// Snapshot taken by the writer.
    pub data: D,
    /// Writer sequence number (starts at 1).
    pub seq: u64,
    /// Instance the sample was written for.
    pub instance_handle: InstanceHandle,
    /// Write timestamp (nanoseconds since epoch).
    pub timestamp_ns: u64,
}

struct History<D> {
    samples: VecDeque<Sample<D>>,
    /// Samples before this index have been returned by `read()`.
    read_cursor: usize,
}

/// Bounded KEEP_LAST history.
pub struct SampleCache<D> {
    history: Mutex<History<D>>,
    depth: usize,
    total_received: AtomicUsize,
    evicted: AtomicUsize,
}

impl<D> SampleCache<D> {
    /// Create a cache keeping the last `depth` samples (at least one).
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            history: Mutex::new(History {
                samples: VecDeque::with_capacity(depth),
                read_cursor: 0,
            }),
            depth,
            total_received: AtomicUsize::new(0),
            evicted: AtomicUsize::new(0),
        }
    }

    /// History depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Push a new sample, evicting the oldest one when the history is full.
    pub fn push(&self, sample: Sample<D>) {
        let mut history = self.history.lock();

        while history.samples.len() >= self.depth {
            history.samples.pop_front();
            history.read_cursor = history.read_cursor.saturating_sub(1);
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }

        history.samples.push_back(sample);
        self.total_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the oldest sample, removing it.
    pub fn take(&self) -> Option<Sample<D>> {
        let mut history = self.history.lock();
        let sample = history.samples.pop_front()?;
        history.read_cursor = history.read_cursor.saturating_sub(1);
        Some(sample)
    }

    /// Take up to `max` samples, oldest first.
    pub fn take_batch(&self, max: usize) -> Vec<Sample<D>> {
        let mut history = self.history.lock();
        let count = max.min(history.samples.len());
        let batch: Vec<_> = history.samples.drain(..count).collect();
        history.read_cursor = history.read_cursor.saturating_sub(count);
        batch
    }

    /// Take the oldest sample of a given instance.
    ///
    /// Linear scan; histories are small.
    pub fn take_instance(&self, handle: InstanceHandle) -> Option<Sample<D>> {
        let mut history = self.history.lock();
        let pos = history
            .samples
            .iter()
            .position(|s| s.instance_handle == handle)?;
        let sample = history.samples.remove(pos)?;
        if pos < history.read_cursor {
            history.read_cursor -= 1;
        }
        Some(sample)
    }

    /// Drop every sample.
    pub fn clear(&self) {
        let mut history = self.history.lock();
        history.samples.clear();
        history.read_cursor = 0;
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.history.lock().samples.len()
    }

    /// True when no sample is held.
    pub fn is_empty(&self) -> bool {
        self.history.lock().samples.is_empty()
    }

    /// Samples pushed since creation.
    pub fn total_received(&self) -> usize {
        self.total_received.load(Ordering::Relaxed)
    }

    /// Samples dropped by KEEP_LAST eviction.
    pub fn evicted(&self) -> usize {
        self.evicted.load(Ordering::Relaxed)
    }
}

// Read operations require D: Clone (samples are copied, not moved)
impl<D: Clone> SampleCache<D> {
    /// Read the next unread sample without removing it.
    pub fn read(&self) -> Option<Sample<D>> {
        let mut history = self.history.lock();
        let cursor = history.read_cursor;
        let sample = history.samples.get(cursor)?.clone();
        history.read_cursor = cursor + 1;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seq: u64) -> Sample<u64> {
        Sample {
            data: seq * 10,
            seq,
            instance_handle: InstanceHandle::nil(),
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_keep_last_evicts_oldest() {
        let cache = SampleCache::new(3);
        for seq in 1..=5 {
            cache.push(sample(seq));
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.total_received(), 5);
        assert_eq!(cache.evicted(), 2);
        assert_eq!(cache.take().map(|s| s.seq), Some(3));
    }

    #[test]
    fn test_zero_depth_is_clamped() {
        let cache = SampleCache::new(0);
        cache.push(sample(1));
        cache.push(sample(2));

        assert_eq!(cache.depth(), 1);
        assert_eq!(cache.take().map(|s| s.seq), Some(2));
    }

    #[test]
    fn test_read_does_not_remove() {
        let cache = SampleCache::new(4);
        cache.push(sample(1));
        cache.push(sample(2));

        assert_eq!(cache.read().map(|s| s.seq), Some(1));
        assert_eq!(cache.read().map(|s| s.seq), Some(2));
        assert!(cache.read().is_none());
        assert_eq!(cache.len(), 2);

        // take from the front keeps the cursor on unread samples
        cache.take();
        cache.push(sample(3));
        assert_eq!(cache.read().map(|s| s.seq), Some(3));
    }

    #[test]
    fn test_take_batch_and_instance() {
        let cache = SampleCache::new(8);
        let keyed = InstanceHandle::new([7u8; 16]);
        for seq in 1..=4 {
            let mut s = sample(seq);
            if seq % 2 == 0 {
                s.instance_handle = keyed;
            }
            cache.push(s);
        }

        assert_eq!(cache.take_instance(keyed).map(|s| s.seq), Some(2));
        let rest: Vec<u64> = cache.take_batch(10).into_iter().map(|s| s.seq).collect();
        assert_eq!(rest, vec![1, 3, 4]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = SampleCache::new(4);
        cache.push(sample(1));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.read().is_none());
    }
}
