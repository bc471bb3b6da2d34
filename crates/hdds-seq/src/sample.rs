// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # `sequences` sample type
//!
//! ```idl
//! const long MAX_SEQUENCE_LEN = 10;
//! const long MAX_ID_LEN = 64;
//!
//! struct sequences {
//!     @key string<MAX_ID_LEN> id;
//!     long count;
//!     sequence<short, MAX_SEQUENCE_LEN> data;
//! };
//! ```
//!
//! [`Sequences`] is the application-side sample (its `data` may be loaned),
//! [`SequencesData`] the owned snapshot readers receive.

use crate::config::{MAX_ID_LEN, MAX_SEQUENCE_LEN};
use crate::dds::{key_hash, DataType, TopicType};
use crate::error::{Error, Result};
use crate::sequence::SequenceBuffer;

/// Type name the sample is registered under.
pub const SEQUENCES_TYPE_NAME: &str = "sequences";

/// Application-side `sequences` sample.
///
/// `new()` behaves like a generated `create_data()`: `data` owns an
/// allocation of `MAX_SEQUENCE_LEN` elements. To loan a buffer instead, reset
/// its capacity to 0 first:
///
/// ```rust
/// use hdds_seq::{Sequences, MAX_SEQUENCE_LEN};
///
/// let mut block = vec![0i16; MAX_SEQUENCE_LEN];
/// let mut sample = Sequences::new();
/// sample.data.set_capacity(0)?;
/// sample.data.loan(&mut block, 0, MAX_SEQUENCE_LEN)?;
/// // ... publish ...
/// sample.data.unloan()?;
/// sample.delete()?;
/// # Ok::<(), hdds_seq::Error>(())
/// ```
#[derive(Debug)]
pub struct Sequences<'a> {
    id: String,
    /// Sample counter.
    pub count: i32,
    /// Bounded sequence of shorts.
    pub data: SequenceBuffer<'a, i16>,
}

impl<'a> Sequences<'a> {
    /// Create a sample with an empty id and an owned, fully allocated `data`.
    pub fn new() -> Self {
        Self {
            id: String::new(),
            count: 0,
            data: SequenceBuffer::allocated(MAX_SEQUENCE_LEN),
        }
    }

    /// Key of the sample.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the key.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if `id` is longer than `MAX_ID_LEN` bytes.
    pub fn set_id(&mut self, id: &str) -> Result<()> {
        if id.len() > MAX_ID_LEN {
            return Err(Error::CapacityExceeded {
                requested: id.len(),
                limit: MAX_ID_LEN,
            });
        }
        self.id.clear();
        self.id.push_str(id);
        Ok(())
    }

    /// Checked destroy (`delete_data`).
    ///
    /// # Errors
    ///
    /// `InvalidState` if `data` is still loaned: `unloan()` must come first.
    pub fn delete(self) -> Result<()> {
        self.data.finalize()
    }
}

impl Default for Sequences<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owned snapshot of a [`Sequences`] sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencesData {
    /// Key.
    pub id: String,
    /// Sample counter.
    pub count: i32,
    /// The first `length` elements of the sequence at write time.
    pub data: Vec<i16>,
}

impl DataType for SequencesData {
    fn compute_key(&self) -> [u8; 16] {
        key_hash(&self.id)
    }
}

impl TopicType for Sequences<'_> {
    type Data = SequencesData;

    fn to_data(&self) -> Result<SequencesData> {
        Ok(SequencesData {
            id: self.id.clone(),
            count: self.count,
            data: self.data.as_slice()?.to_vec(),
        })
    }

    fn compute_key(&self) -> [u8; 16] {
        key_hash(&self.id)
    }
}
