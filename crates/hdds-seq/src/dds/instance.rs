// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

const FNV1A_OFFSET_BASIS_64: u64 = 0xcbf29ce484222325;
const FNV1A_PRIME_64: u64 = 0x100000001b3;

/// Instance handle for keyed topics (16-byte key hash).
///
/// For keyless topics, this is all zeros. Passing a nil handle to
/// `DataWriter::write` asks the writer to derive it from the sample key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InstanceHandle(pub [u8; 16]);

impl InstanceHandle {
    /// Create a new instance handle from a key hash.
    pub const fn new(key_hash: [u8; 16]) -> Self {
        Self(key_hash)
    }

    /// Create a nil (all zeros) instance handle.
    pub const fn nil() -> Self {
        Self([0u8; 16])
    }

    /// Check if this is a nil handle.
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 16]
    }
}

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash = seed;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV1A_PRIME_64);
    }
    hash
}

/// Key hash of a string key (FNV-1a, widened to 16 bytes).
///
/// The low half is FNV-1a of the key, the high half a second pass seeded
/// with the low half.
pub fn key_hash(key: &str) -> [u8; 16] {
    let lo = fnv1a(FNV1A_OFFSET_BASIS_64, key.as_bytes());
    let hi = fnv1a(lo, key.as_bytes());

    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&lo.to_le_bytes());
    out[8..].copy_from_slice(&hi.to_le_bytes());
    out
}
