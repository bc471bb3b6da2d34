// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::cache::Sample;
use super::instance::InstanceHandle;
use super::topic::TopicInner;
use super::{current_time_ns, DataType, Topic, TopicType};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Writer counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    /// Samples accepted by `write()`.
    pub samples_written: u64,
    /// Sum over all writes of the number of readers the sample reached.
    pub deliveries: u64,
    /// Sequence number of the last sample written (0 before the first).
    pub last_seq: u64,
}

/// Typed writer publishing samples on a [`Topic`].
///
/// `write()` snapshots the sample: once it returns, the application may
/// modify (or unloan) the sample's memory without affecting what readers see.
///
/// # Example
///
/// ```rust
/// use hdds_seq::dds::{InstanceHandle, Participant};
/// use hdds_seq::{Sequences, SequencesData};
///
/// let participant = Participant::builder("writer_doc").build()?;
/// participant.register_type::<SequencesData>("sequences")?;
/// let topic = participant.create_topic::<SequencesData>("doc", "sequences")?;
/// let writer = participant.create_writer(&topic)?;
///
/// let mut sample = Sequences::new();
/// sample.set_id("sensor-1")?;
/// let handle = writer.register_instance(&sample);
/// writer.write(&sample, handle)?;
/// assert_eq!(writer.stats().samples_written, 1);
/// # Ok::<(), hdds_seq::Error>(())
/// ```
pub struct DataWriter<D: DataType> {
    topic: Arc<TopicInner<D>>,
    next_seq: AtomicU64,
    samples_written: AtomicU64,
    deliveries: AtomicU64,
}

impl<D: DataType> DataWriter<D> {
    pub(super) fn new(topic: &Topic<D>) -> Self {
        Self {
            topic: Arc::clone(&topic.inner),
            next_seq: AtomicU64::new(1),
            samples_written: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
        }
    }

    /// Instance handle of `sample` (derived from its key).
    pub fn register_instance<S>(&self, sample: &S) -> InstanceHandle
    where
        S: TopicType<Data = D> + ?Sized,
    {
        InstanceHandle::new(sample.compute_key())
    }

    /// Publish `sample` for instance `handle`.
    ///
    /// A nil handle is resolved from the sample key. The sample must be
    /// populated and length-consistent when this is called.
    ///
    /// # Errors
    ///
    /// - `AlreadyDeleted` after `Participant::delete_contained_entities`
    /// - any error from `TopicType::to_data` (e.g. a released sequence)
    pub fn write<S>(&self, sample: &S, handle: InstanceHandle) -> Result<()>
    where
        S: TopicType<Data = D> + ?Sized,
    {
        if self.topic.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }

        let data = sample.to_data()?;
        let instance_handle = if handle.is_nil() {
            InstanceHandle::new(sample.compute_key())
        } else {
            handle
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let reached = self.topic.deliver(Sample {
            data,
            seq,
            instance_handle,
            timestamp_ns: current_time_ns(),
        });

        self.samples_written.fetch_add(1, Ordering::Relaxed);
        self.deliveries.fetch_add(reached as u64, Ordering::Relaxed);

        log::trace!(
            "[writer] topic='{}' seq={} delivered to {} reader(s)",
            self.topic.name,
            seq,
            reached
        );
        Ok(())
    }

    /// Snapshot of the writer counters.
    pub fn stats(&self) -> WriterStats {
        WriterStats {
            samples_written: self.samples_written.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            last_seq: self.next_seq.load(Ordering::Relaxed) - 1,
        }
    }
}

impl<D: DataType> std::fmt::Debug for DataWriter<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataWriter")
            .field("topic", &self.topic.name)
            .field("stats", &self.stats())
            .finish()
    }
}
