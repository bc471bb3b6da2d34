// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-seq - Loanable bounded sequences for DDS samples
//!
//! Bounded IDL sequences (`sequence<T, N>`) whose storage is either owned by
//! the sample or loaned from a caller-allocated block, plus the in-process
//! participant/topic/writer/reader used to publish samples carrying them.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_seq::dds::{InstanceHandle, Participant};
//! use hdds_seq::{Sequences, SequencesData, MAX_SEQUENCE_LEN, SEQUENCES_TYPE_NAME};
//!
//! let participant = Participant::builder("quick_start").domain_id(0).build()?;
//! participant.register_type::<SequencesData>(SEQUENCES_TYPE_NAME)?;
//! let topic = participant.create_topic::<SequencesData>("Example sequences", SEQUENCES_TYPE_NAME)?;
//! let writer = participant.create_writer(&topic)?;
//!
//! // Borrow the sequence memory from the application
//! let mut block = vec![0i16; MAX_SEQUENCE_LEN];
//! let mut sample = Sequences::new();
//! sample.data.set_capacity(0)?;
//! sample.data.loan(&mut block, 0, MAX_SEQUENCE_LEN)?;
//!
//! sample.data.set_length(2)?;
//! sample.data.set(0, 10)?;
//! sample.data.set(1, 20)?;
//! writer.write(&sample, InstanceHandle::nil())?;
//!
//! // Return the block before it goes away
//! sample.data.unloan()?;
//! sample.delete()?;
//! participant.delete_contained_entities()?;
//! # Ok::<(), hdds_seq::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |  Application: fills Sequences (owned or loaned data)         |
//! +--------------------------------------------------------------+
//! |  sequence:  SequenceBuffer (Owned | Loaned | Released)       |
//! +--------------------------------------------------------------+
//! |  dds:  Participant -> Topic -> DataWriter / DataReader       |
//! |        (snapshot on write, KEEP_LAST history per reader)     |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`sequence`] - Bounded sequence storage and its loan lifecycle
//! - [`sample`] - The `sequences` sample type
//! - [`dds`] - In-process publish/subscribe entities
//! - [`config`] - Bounds and defaults

/// Bounds and defaults (single source of truth).
pub mod config;
/// In-process DDS entities (Participant, Topic, DataWriter, DataReader).
pub mod dds;
/// Error types.
pub mod error;
/// The `sequences` sample type.
pub mod sample;
/// Bounded sequences with owned or loaned storage.
pub mod sequence;

pub use config::{MAX_DOMAIN_ID, MAX_ID_LEN, MAX_SEQUENCE_LEN};
pub use error::{Error, Result};
pub use sample::{Sequences, SequencesData, SEQUENCES_TYPE_NAME};
pub use sequence::{BufferMode, SequenceBuffer, SequenceState};

/// Version of hdds-seq
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
