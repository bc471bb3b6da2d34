// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # In-process DDS entities
//!
//! The minimal publish/subscribe collaborator the sequence samples are written
//! through. Everything stays inside the process: a writer copies the sample
//! into the history of every reader attached to the topic. There is no
//! discovery, no QoS negotiation and no wire format here.
//!
//! ## Entity Hierarchy
//!
//! ```text
//! Participant (domain_id, registered types, topic registry)
//! +-- Topic<D>  ----------------------------+
//!     +-- DataWriter<D>  --write(sample)--> | SampleCache<D> per reader (KEEP_LAST)
//!     +-- DataReader<D>  <--take()/read()-- |
//! ```
//!
//! ## Data Types vs Samples
//!
//! A [`TopicType`] is what the application fills in (it may borrow memory,
//! like a loaned sequence). Its [`DataType`] is the owned snapshot that is
//! actually delivered to readers, taken at the moment of `write()`.
//!
//! ## Example
//!
//! ```rust
//! use hdds_seq::dds::{InstanceHandle, Participant};
//! use hdds_seq::{Sequences, SequencesData};
//!
//! let participant = Participant::builder("example").domain_id(0).build()?;
//! participant.register_type::<SequencesData>("sequences")?;
//! let topic = participant.create_topic::<SequencesData>("Example sequences", "sequences")?;
//! let writer = participant.create_writer(&topic)?;
//! let reader = participant.create_reader(&topic)?;
//!
//! let mut sample = Sequences::new();
//! sample.data.assign(&[1, 2, 3])?;
//! writer.write(&sample, InstanceHandle::nil())?;
//!
//! let received = reader.take()?.expect("sample delivered");
//! assert_eq!(received.data.data, vec![1, 2, 3]);
//! # Ok::<(), hdds_seq::Error>(())
//! ```

mod cache;
mod instance;
mod participant;
mod reader;
mod topic;
mod writer;

pub use cache::{Sample, SampleCache};
pub use instance::{key_hash, InstanceHandle};
pub use participant::{Participant, ParticipantBuilder};
pub use reader::DataReader;
pub use topic::Topic;
pub use writer::{DataWriter, WriterStats};

use crate::error::Result;

/// Owned data type delivered to readers.
pub trait DataType: Clone + Send + Sync + 'static {
    /// Compute the instance key hash (16 bytes).
    ///
    /// Keyless types keep the default (nil handle).
    fn compute_key(&self) -> [u8; 16] {
        [0u8; 16]
    }
}

/// Application-side sample that can be published on a topic of `Self::Data`.
pub trait TopicType {
    /// Snapshot type delivered to readers.
    type Data: DataType;

    /// Copy the current contents into an owned snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the sample is not in a publishable state.
    fn to_data(&self) -> Result<Self::Data>;

    /// Instance key hash of this sample (same as its snapshot's).
    fn compute_key(&self) -> [u8; 16] {
        [0u8; 16]
    }
}

pub(crate) fn current_time_ns() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
