// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for hdds-seq

use std::fmt;

/// Result type for hdds-seq operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by sequence buffers and the in-process DDS entities.
///
/// Sequence errors are local and recoverable: the caller decides whether to
/// skip the publish cycle or retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Sequence Errors
    // ========================================================================
    /// Illegal mode transition (double loan, double unloan, resize while
    /// loaned, access after release, destroy while loaned).
    InvalidState(String),
    /// Length, capacity or storage request beyond the allowed limit.
    CapacityExceeded {
        /// Requested element (or byte) count.
        requested: usize,
        /// Limit that was exceeded.
        limit: usize,
    },
    /// Element access outside `[0, length)`.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current sequence length.
        len: usize,
    },

    // ========================================================================
    // Entity Errors
    // ========================================================================
    /// Domain ID out of range (0-232).
    InvalidDomainId(u32),
    /// Type or topic registration failed.
    RegistrationFailed(String),
    /// Topic already exists with a different type.
    TypeMismatch {
        /// Topic name.
        topic: String,
        /// Type name the topic was created with.
        expected: String,
        /// Type name requested by the caller.
        found: String,
    },
    /// Entity was torn down by `delete_contained_entities`.
    AlreadyDeleted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::CapacityExceeded { requested, limit } => {
                write!(f, "Capacity exceeded: requested {} (limit {})", requested, limit)
            }
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} (length {})", index, len)
            }
            Error::InvalidDomainId(id) => write!(f, "Invalid domain_id: {} (must be 0-232)", id),
            Error::RegistrationFailed(msg) => write!(f, "Registration failed: {}", msg),
            Error::TypeMismatch {
                topic,
                expected,
                found,
            } => write!(
                f,
                "Type mismatch on topic '{}': expected '{}', found '{}'",
                topic, expected, found
            ),
            Error::AlreadyDeleted => write!(f, "Entity already deleted"),
        }
    }
}

impl std::error::Error for Error {}
