// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::cache::{Sample, SampleCache};
use super::DataType;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

pub(super) struct TopicInner<D> {
    pub(super) name: String,
    pub(super) type_name: String,
    pub(super) history_depth: usize,
    /// Reader histories; dead readers are pruned on delivery.
    readers: Mutex<Vec<Weak<SampleCache<D>>>>,
    deleted: AtomicBool,
}

impl<D: DataType> TopicInner<D> {
    pub(super) fn new(name: &str, type_name: &str, history_depth: usize) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            history_depth,
            readers: Mutex::new(Vec::new()),
            deleted: AtomicBool::new(false),
        }
    }

    pub(super) fn attach_reader(&self) -> Arc<SampleCache<D>> {
        let cache = Arc::new(SampleCache::new(self.history_depth));
        self.readers.lock().push(Arc::downgrade(&cache));
        cache
    }

    /// Deliver one sample to every live reader. Returns the reader count.
    ///
    /// Runs under the reader-list lock, so it cannot interleave with
    /// `mark_deleted`: a topic deleted first receives nothing.
    pub(super) fn deliver(&self, sample: Sample<D>) -> usize {
        let mut readers = self.readers.lock();
        if self.is_deleted() {
            return 0;
        }
        readers.retain(|weak| weak.strong_count() > 0);

        let live: Vec<Arc<SampleCache<D>>> = readers.iter().filter_map(Weak::upgrade).collect();
        if let Some((last, rest)) = live.split_last() {
            for cache in rest {
                cache.push(sample.clone());
            }
            last.push(sample);
        }
        live.len()
    }

    pub(super) fn reader_count(&self) -> usize {
        self.readers
            .lock()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub(super) fn mark_deleted(&self) {
        self.deleted.store(true, Ordering::Release);
        let readers = std::mem::take(&mut *self.readers.lock());
        for cache in readers.iter().filter_map(Weak::upgrade) {
            cache.clear();
        }
    }

    pub(super) fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::Acquire)
    }
}

/// Named data channel carrying samples of type `D`.
///
/// Cheap to clone; all clones refer to the same topic.
pub struct Topic<D: DataType> {
    pub(super) inner: Arc<TopicInner<D>>,
}

impl<D: DataType> Clone for Topic<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: DataType> Topic<D> {
    /// Topic name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Number of live readers attached to the topic.
    pub fn reader_count(&self) -> usize {
        self.inner.reader_count()
    }

    /// True once the owning participant deleted its entities.
    pub fn is_deleted(&self) -> bool {
        self.inner.is_deleted()
    }
}

impl<D: DataType> std::fmt::Debug for Topic<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.inner.name)
            .field("type_name", &self.inner.type_name)
            .field("deleted", &self.is_deleted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::InstanceHandle;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    struct Tick;
    impl DataType for Tick {}

    fn tick(seq: u64) -> Sample<Tick> {
        Sample {
            data: Tick,
            seq,
            instance_handle: InstanceHandle::nil(),
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_deliver_after_delete_is_dropped() {
        let topic = TopicInner::<Tick>::new("ticks", "Tick", 8);
        let cache = topic.attach_reader();
        assert_eq!(topic.deliver(tick(1)), 1);

        topic.mark_deleted();

        assert_eq!(topic.deliver(tick(2)), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_delete_leaves_no_sample_behind() {
        for _ in 0..50 {
            let topic = Arc::new(TopicInner::<Tick>::new("ticks", "Tick", 1024));
            let cache = topic.attach_reader();

            let writer = {
                let topic = Arc::clone(&topic);
                thread::spawn(move || {
                    for seq in 1..=2_000 {
                        topic.deliver(tick(seq));
                    }
                })
            };
            thread::yield_now();
            topic.mark_deleted();
            writer.join().expect("writer thread");

            assert!(cache.is_empty());
        }
    }
}
