// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Participant
//!
//! Entry point and factory for topics, writers and readers. Owns the type
//! registry (type name -> Rust type) and the topic registry (topic name ->
//! topic), and tears everything down in `delete_contained_entities`.

use super::reader::DataReader;
use super::topic::{Topic, TopicInner};
use super::writer::DataWriter;
use super::DataType;
use crate::config::{DEFAULT_HISTORY_DEPTH, MAX_DOMAIN_ID};
use crate::error::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Type-erased view of a `TopicInner<D>` used for teardown.
trait ErasedTopic: Send + Sync {
    fn mark_deleted(&self);
}

impl<D: DataType> ErasedTopic for TopicInner<D> {
    fn mark_deleted(&self) {
        TopicInner::mark_deleted(self);
    }
}

struct TopicEntry {
    type_name: String,
    any: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedTopic>,
}

/// Builder for [`Participant`].
#[derive(Debug, Clone)]
pub struct ParticipantBuilder {
    name: String,
    domain_id: u32,
    history_depth: usize,
}

impl ParticipantBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            domain_id: 0,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }

    /// Set the DDS domain ID (default: 0).
    pub fn domain_id(mut self, domain_id: u32) -> Self {
        self.domain_id = domain_id;
        self
    }

    /// KEEP_LAST depth of every reader history (default: 16, minimum 1).
    pub fn history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Build the participant.
    ///
    /// # Errors
    ///
    /// `InvalidDomainId` if the domain ID is above 232.
    pub fn build(self) -> Result<Arc<Participant>> {
        if self.domain_id > MAX_DOMAIN_ID {
            return Err(Error::InvalidDomainId(self.domain_id));
        }

        log::debug!(
            "[participant] '{}' joined domain {} (history depth {})",
            self.name,
            self.domain_id,
            self.history_depth
        );

        Ok(Arc::new(Participant {
            name: self.name,
            domain_id: self.domain_id,
            history_depth: self.history_depth.max(1),
            types: DashMap::new(),
            topics: DashMap::new(),
            deleted: AtomicBool::new(false),
        }))
    }
}

/// In-process domain participant.
pub struct Participant {
    name: String,
    domain_id: u32,
    history_depth: usize,
    types: DashMap<String, TypeId>,
    topics: DashMap<String, TopicEntry>,
    deleted: AtomicBool,
}

impl Participant {
    /// Create a participant on domain 0 with default settings.
    pub fn new(name: &str) -> Result<Arc<Self>> {
        Self::builder(name).build()
    }

    /// Create a new participant builder.
    pub fn builder(name: &str) -> ParticipantBuilder {
        ParticipantBuilder::new(name)
    }

    /// Number of topics currently registered.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.deleted.load(Ordering::Acquire) {
            return Err(Error::AlreadyDeleted);
        }
        Ok(())
    }

    /// Register `D` under `type_name`.
    ///
    /// Registering the same pair twice is a no-op.
    ///
    /// # Errors
    ///
    /// `RegistrationFailed` for an empty name or a name already bound to
    /// another type; `AlreadyDeleted` after teardown.
    pub fn register_type<D: DataType>(&self, type_name: &str) -> Result<()> {
        self.ensure_alive()?;
        if type_name.is_empty() {
            return Err(Error::RegistrationFailed("empty type name".to_string()));
        }

        match self.types.entry(type_name.to_string()) {
            Entry::Occupied(entry) if *entry.get() != TypeId::of::<D>() => {
                Err(Error::RegistrationFailed(format!(
                    "type name '{}' already registered for another type",
                    type_name
                )))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(TypeId::of::<D>());
                log::debug!("[participant] registered type '{}'", type_name);
                Ok(())
            }
        }
    }

    /// Create (or look up) topic `name` carrying `type_name`.
    ///
    /// # Errors
    ///
    /// - `RegistrationFailed` if `type_name` is not registered for `D`
    /// - `TypeMismatch` if the topic exists with another type
    /// - `AlreadyDeleted` after teardown
    pub fn create_topic<D: DataType>(&self, name: &str, type_name: &str) -> Result<Topic<D>> {
        self.ensure_alive()?;

        match self.types.get(type_name).map(|tid| *tid) {
            None => {
                return Err(Error::RegistrationFailed(format!(
                    "type '{}' is not registered",
                    type_name
                )))
            }
            Some(tid) if tid != TypeId::of::<D>() => {
                return Err(Error::RegistrationFailed(format!(
                    "type '{}' is registered for another type",
                    type_name
                )))
            }
            Some(_) => {}
        }

        match self.topics.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let existing = entry.get();
                let mismatch = || Error::TypeMismatch {
                    topic: name.to_string(),
                    expected: existing.type_name.clone(),
                    found: type_name.to_string(),
                };
                if existing.type_name != type_name {
                    return Err(mismatch());
                }
                let inner = Arc::clone(&existing.any)
                    .downcast::<TopicInner<D>>()
                    .map_err(|_| mismatch())?;
                Ok(Topic { inner })
            }
            Entry::Vacant(entry) => {
                let inner = Arc::new(TopicInner::<D>::new(name, type_name, self.history_depth));
                let any: Arc<dyn Any + Send + Sync> = inner.clone();
                let erased: Arc<dyn ErasedTopic> = inner.clone();
                entry.insert(TopicEntry {
                    type_name: type_name.to_string(),
                    any,
                    erased,
                });
                log::debug!(
                    "[participant] created topic '{}' (type '{}')",
                    name,
                    type_name
                );
                Ok(Topic { inner })
            }
        }
    }

    fn ensure_owned<D: DataType>(&self, topic: &Topic<D>) -> Result<()> {
        self.ensure_alive()?;
        if topic.is_deleted() {
            return Err(Error::AlreadyDeleted);
        }
        let owned = self.topics.get(topic.name()).is_some_and(|entry| {
            std::ptr::eq(
                Arc::as_ptr(&entry.any).cast::<()>(),
                Arc::as_ptr(&topic.inner).cast::<()>(),
            )
        });
        if !owned {
            return Err(Error::RegistrationFailed(format!(
                "topic '{}' does not belong to participant '{}'",
                topic.name(),
                self.name
            )));
        }
        Ok(())
    }

    /// Create a writer on `topic`.
    pub fn create_writer<D: DataType>(&self, topic: &Topic<D>) -> Result<DataWriter<D>> {
        self.ensure_owned(topic)?;
        log::debug!("[participant] created writer on '{}'", topic.name());
        Ok(DataWriter::new(topic))
    }

    /// Create a reader on `topic`.
    pub fn create_reader<D: DataType>(&self, topic: &Topic<D>) -> Result<DataReader<D>> {
        self.ensure_owned(topic)?;
        log::debug!("[participant] created reader on '{}'", topic.name());
        Ok(DataReader::new(topic))
    }

    /// Delete every topic, writer and reader created by this participant.
    ///
    /// Histories are cleared and every later operation on the participant or
    /// its entities fails with `AlreadyDeleted`. Calling it again is a no-op.
    pub fn delete_contained_entities(&self) -> Result<()> {
        if self.deleted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let count = self.topics.len();
        for entry in self.topics.iter() {
            entry.erased.mark_deleted();
        }
        self.topics.clear();
        self.types.clear();

        log::debug!(
            "[participant] '{}' deleted {} topic(s) and their endpoints",
            self.name,
            count
        );
        Ok(())
    }
}

impl Drop for Participant {
    fn drop(&mut self) {
        let _ = self.delete_contained_entities();
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("domain_id", &self.domain_id)
            .field("topics", &self.topics.len())
            .finish()
    }
}
