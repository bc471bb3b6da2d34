// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Bounded Sequences
//!
//! [`SequenceBuffer`] is the storage of a bounded IDL sequence field
//! (`sequence<short, 10>`) inside a sample. It either owns its memory or
//! borrows ("loans") a block the application allocated itself.
//!
//! ## Memory Modes
//!
//! ```text
//! Owned:                               Loaned:
//! +---------------------------+        +---------------------------+
//! | SequenceBuffer            |        | SequenceBuffer            |
//! |  capacity: 10  length: 3  |        |  capacity: 10  length: 3  |
//! |  storage --+              |        |  storage --+              |
//! +------------|--------------+        +------------|--------------+
//!              v                                    v  (&'a mut [T])
//!   +--+--+--+--+--+--+--+--+--+--+      +--+--+--+--+--+--+--+--+--+--+
//!   | 1| 2| 3|  |  |  |  |  |  |  |      | 1| 2| 3|  |  |  |  |  |  |  |
//!   +--+--+--+--+--+--+--+--+--+--+      +--+--+--+--+--+--+--+--+--+--+
//!   Vec<T> freed with the buffer          caller's buffer, returned by unloan()
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! EMPTY(capacity=0) --set_capacity(n)--> OWNED --set_capacity(0)--> EMPTY
//! EMPTY(capacity=0) --loan-------------> LOANED
//! LOANED            --unloan-----------> RELEASED(capacity=0)
//! RELEASED          --set_capacity/loan-> OWNED / LOANED
//! LOANED            --drop-------------> panic (finalize() -> InvalidState)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hdds_seq::SequenceBuffer;
//!
//! let mut caller_block = vec![0i16; 10];
//! let mut seq = SequenceBuffer::<i16>::new(10);
//!
//! seq.loan(&mut caller_block, 0, 10)?;
//! seq.set_length(3)?;
//! seq.set(0, 7)?;
//! assert_eq!(seq.as_slice()?, &[7, 0, 0]);
//!
//! let block = seq.unloan()?;
//! assert_eq!(block[0], 7);
//! # Ok::<(), hdds_seq::Error>(())
//! ```

mod storage;

use crate::error::{Error, Result};
use storage::Storage;

/// Memory discipline currently applied by a [`SequenceBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    /// The buffer owns (and frees) whatever it holds.
    Owned,
    /// The buffer addresses caller storage it must hand back via `unloan`.
    Loaned,
}

/// Lifecycle state of a [`SequenceBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Owned mode with capacity 0 (fresh buffer, or after `set_capacity(0)`).
    Empty,
    /// Owned mode with an allocation of `capacity` elements.
    Owned,
    /// Bound to caller storage.
    Loaned,
    /// Loan returned; element access is refused until re-bound.
    Released,
}

/// Bounded, variable-length sequence with owned or loaned storage.
///
/// Invariant: `len() <= capacity() <= bound()` at all times.
///
/// No internal synchronization: every mutator takes `&mut self`, one buffer
/// per producer.
#[derive(Debug)]
pub struct SequenceBuffer<'a, T> {
    bound: usize,
    capacity: usize,
    len: usize,
    storage: Storage<'a, T>,
}

impl<'a, T: Copy + Default> SequenceBuffer<'a, T> {
    /// Create an empty owned buffer (capacity 0, length 0).
    ///
    /// `bound` is the declared maximum of the sequence and never changes.
    pub fn new(bound: usize) -> Self {
        Self {
            bound,
            capacity: 0,
            len: 0,
            storage: Storage::Owned(Vec::new()),
        }
    }

    /// Create an owned buffer allocated to its full bound.
    pub fn allocated(bound: usize) -> Self {
        Self {
            bound,
            capacity: bound,
            len: 0,
            storage: Storage::Owned(vec![T::default(); bound]),
        }
    }

    /// Create an owned buffer pre-allocated to `capacity` elements.
    pub fn with_capacity(bound: usize, capacity: usize) -> Result<Self> {
        let mut seq = Self::new(bound);
        seq.set_capacity(capacity)?;
        Ok(seq)
    }

    /// Declared bound of the sequence.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Current maximum number of elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current logical number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the sequence holds no element.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lifecycle state.
    pub fn state(&self) -> SequenceState {
        match &self.storage {
            Storage::Loaned(_) => SequenceState::Loaned,
            Storage::Released => SequenceState::Released,
            Storage::Owned(_) if self.capacity == 0 => SequenceState::Empty,
            Storage::Owned(_) => SequenceState::Owned,
        }
    }

    /// Release discipline that applies to the current storage.
    pub fn mode(&self) -> BufferMode {
        if self.storage.is_loaned() {
            BufferMode::Loaned
        } else {
            BufferMode::Owned
        }
    }

    /// True while bound to caller storage.
    pub fn is_loaned(&self) -> bool {
        self.storage.is_loaned()
    }

    /// Change the capacity of an owned buffer.
    ///
    /// Re-allocates the owned storage (the previous allocation is released).
    /// `set_capacity(0)` frees it entirely, which is the reset step required
    /// before [`loan`](Self::loan). Also re-binds a released buffer to owned
    /// storage.
    ///
    /// # Errors
    ///
    /// - `InvalidState` while loaned (call `unloan` first)
    /// - `CapacityExceeded` if `new_capacity > bound` or `new_capacity < len`
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<()> {
        if self.storage.is_loaned() {
            return Err(Error::InvalidState(
                "cannot change capacity of a loaned sequence (unloan first)".to_string(),
            ));
        }
        if new_capacity > self.bound {
            return Err(Error::CapacityExceeded {
                requested: new_capacity,
                limit: self.bound,
            });
        }
        if new_capacity < self.len {
            return Err(Error::CapacityExceeded {
                requested: self.len,
                limit: new_capacity,
            });
        }

        if let Storage::Owned(vec) = &mut self.storage {
            if new_capacity == 0 {
                *vec = Vec::new();
            } else {
                vec.resize(new_capacity, T::default());
                vec.shrink_to_fit();
            }
        } else {
            log::debug!("[seq] re-binding released sequence to owned storage");
            self.storage = Storage::Owned(vec![T::default(); new_capacity]);
        }

        self.capacity = new_capacity;
        Ok(())
    }

    /// Bind the sequence to caller-allocated storage.
    ///
    /// The buffer performs no allocation: all reads and writes address
    /// `storage` directly until [`unloan`](Self::unloan) returns it.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already loaned or capacity is not 0
    /// - `CapacityExceeded` if `new_capacity > bound`, `storage.len() < new_capacity`
    ///   or `initial_length > new_capacity`
    pub fn loan(
        &mut self,
        storage: &'a mut [T],
        initial_length: usize,
        new_capacity: usize,
    ) -> Result<()> {
        if self.storage.is_loaned() {
            return Err(Error::InvalidState("sequence is already loaned".to_string()));
        }
        if self.capacity != 0 {
            return Err(Error::InvalidState(format!(
                "capacity must be reset to 0 before loan (current {})",
                self.capacity
            )));
        }
        if new_capacity > self.bound {
            return Err(Error::CapacityExceeded {
                requested: new_capacity,
                limit: self.bound,
            });
        }
        if storage.len() < new_capacity {
            return Err(Error::CapacityExceeded {
                requested: new_capacity,
                limit: storage.len(),
            });
        }
        if initial_length > new_capacity {
            return Err(Error::CapacityExceeded {
                requested: initial_length,
                limit: new_capacity,
            });
        }

        log::debug!(
            "[seq] loan: capacity={} length={} (caller block of {} elements)",
            new_capacity,
            initial_length,
            storage.len()
        );

        self.storage = Storage::Loaned(storage);
        self.capacity = new_capacity;
        self.len = initial_length;
        Ok(())
    }

    /// Return the loaned storage to the caller.
    ///
    /// The buffer ends up released with capacity 0; element access fails with
    /// `InvalidState` until `set_capacity` or `loan` binds it again.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the buffer is not currently loaned (this includes a
    /// second `unloan`).
    pub fn unloan(&mut self) -> Result<&'a mut [T]> {
        if !self.storage.is_loaned() {
            return Err(Error::InvalidState("sequence is not loaned".to_string()));
        }

        let Storage::Loaned(storage) = std::mem::replace(&mut self.storage, Storage::Released)
        else {
            unreachable!("storage checked as loaned above");
        };

        log::debug!("[seq] unloan: returning {} elements to caller", storage.len());

        self.capacity = 0;
        self.len = 0;
        Ok(storage)
    }

    /// Set the logical length.
    ///
    /// Elements past the previous length keep whatever the storage holds;
    /// populate them before reading.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if `new_length > capacity`
    /// - `InvalidState` if the buffer was released
    pub fn set_length(&mut self, new_length: usize) -> Result<()> {
        self.ensure_bound()?;
        if new_length > self.capacity {
            return Err(Error::CapacityExceeded {
                requested: new_length,
                limit: self.capacity,
            });
        }
        self.len = new_length;
        Ok(())
    }

    /// Read the element at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.ensure_bound()?;
        self.check_index(index)?;
        Ok(self.storage.elements()[index])
    }

    /// Write `value` at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.ensure_bound()?;
        self.check_index(index)?;
        self.storage.elements_mut()[index] = value;
        Ok(())
    }

    /// Replace the contents with `values` (length becomes `values.len()`).
    pub fn assign(&mut self, values: &[T]) -> Result<()> {
        self.set_length(values.len())?;
        self.storage.elements_mut()[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// The first `len()` elements.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the buffer was released.
    pub fn as_slice(&self) -> Result<&[T]> {
        self.ensure_bound()?;
        Ok(&self.storage.elements()[..self.len])
    }

    /// Mutable view of the first `len()` elements.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the buffer was released.
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        self.ensure_bound()?;
        let len = self.len;
        Ok(&mut self.storage.elements_mut()[..len])
    }

    /// Iterate over the first `len()` elements.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, T>> {
        Ok(self.as_slice()?.iter())
    }

    /// Checked destroy.
    ///
    /// Owned, empty and released buffers are simply dropped. A buffer that is
    /// still loaned has its loan detached without touching the caller's
    /// memory and `InvalidState` is returned so the defect is visible.
    pub fn finalize(mut self) -> Result<()> {
        if !self.storage.is_loaned() {
            return Ok(());
        }

        self.storage = Storage::Released;
        log::error!("[seq] sequence destroyed while still loaned (missing unloan)");
        Err(Error::InvalidState(
            "sequence destroyed while still loaned".to_string(),
        ))
    }

    fn ensure_bound(&self) -> Result<()> {
        if self.storage.is_released() {
            return Err(Error::InvalidState(
                "sequence was unloaned and is not bound to storage".to_string(),
            ));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<T> Drop for SequenceBuffer<'_, T> {
    fn drop(&mut self) {
        if !self.storage.is_loaned() {
            return;
        }
        if std::thread::panicking() {
            log::error!("[seq] loaned sequence dropped during unwind without unloan");
            return;
        }
        panic!("loaned SequenceBuffer dropped without unloan()");
    }
}
