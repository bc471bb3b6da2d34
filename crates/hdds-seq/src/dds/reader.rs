// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::cache::{Sample, SampleCache};
use super::instance::InstanceHandle;
use super::topic::TopicInner;
use super::{DataType, Topic};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Typed reader receiving the samples written on a [`Topic`].
///
/// Each reader owns its KEEP_LAST history; only samples written after the
/// reader was created are delivered.
pub struct DataReader<D: DataType> {
    topic: Arc<TopicInner<D>>,
    cache: Arc<SampleCache<D>>,
}

impl<D: DataType> DataReader<D> {
    pub(super) fn new(topic: &Topic<D>) -> Self {
        let cache = topic.inner.attach_reader();
        Self {
            topic: Arc::clone(&topic.inner),
            cache,
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.topic.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }
        Ok(())
    }

    /// Take the oldest sample.
    pub fn take(&self) -> Result<Option<Sample<D>>> {
        self.ensure_alive()?;
        Ok(self.cache.take())
    }

    /// Take up to `max` samples, oldest first.
    pub fn take_batch(&self, max: usize) -> Result<Vec<Sample<D>>> {
        self.ensure_alive()?;
        Ok(self.cache.take_batch(max))
    }

    /// Take the oldest sample of instance `handle`.
    pub fn take_instance(&self, handle: InstanceHandle) -> Result<Option<Sample<D>>> {
        self.ensure_alive()?;
        Ok(self.cache.take_instance(handle))
    }

    /// Read the next unread sample without removing it.
    pub fn read(&self) -> Result<Option<Sample<D>>> {
        self.ensure_alive()?;
        Ok(self.cache.read())
    }

    /// Number of samples waiting in the history.
    pub fn pending(&self) -> usize {
        self.cache.len()
    }

    /// Samples dropped because the history was full.
    pub fn evicted(&self) -> usize {
        self.cache.evicted()
    }
}

impl<D: DataType> std::fmt::Debug for DataReader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataReader")
            .field("topic", &self.topic.name)
            .field("pending", &self.pending())
            .finish()
    }
}
