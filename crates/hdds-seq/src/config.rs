// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global constants for hdds-seq.
//!
//! Every bound used by the sample type, the in-process entities and the
//! publisher tool lives here. Do not hardcode them elsewhere.

/// Maximum domain ID (RTPS v2.3 Sec.9.6.1.1).
///
/// DDS domain_id valid range: 0..232 (inclusive)
pub const MAX_DOMAIN_ID: u32 = 232;

/// Declared bound of `Sequences::data` (`sequence<short, MAX_SEQUENCE_LEN>`).
pub const MAX_SEQUENCE_LEN: usize = 10;

/// Maximum length in bytes of `Sequences::id` (`string<MAX_ID_LEN>`).
pub const MAX_ID_LEN: usize = 64;

/// KEEP_LAST depth of a topic history when the builder does not set one.
pub const DEFAULT_HISTORY_DEPTH: usize = 16;

/// Period between two publications of the publisher loop (milliseconds).
pub const DEFAULT_SEND_PERIOD_MS: u64 = 1000;

/// Topic name used by the sequences publisher.
pub const SEQUENCES_TOPIC: &str = "Example sequences";
