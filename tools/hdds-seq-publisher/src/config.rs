// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publisher configuration.
//!
//! Values come from an optional YAML file, then CLI flags override them.
//!
//! ```yaml
//! domain_id: 0
//! sample_count: 20        # 0 = run until Ctrl+C
//! send_period_ms: 1000
//! topic_name: Example sequences
//! history_depth: 16
//! ```

use anyhow::{bail, Context, Result};
use hdds_seq::config::{DEFAULT_HISTORY_DEPTH, DEFAULT_SEND_PERIOD_MS, SEQUENCES_TOPIC};
use hdds_seq::MAX_DOMAIN_ID;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublisherConfig {
    /// DDS domain ID (0..=232).
    pub domain_id: u32,
    /// Rounds to publish, 0 = infinite.
    pub sample_count: u64,
    /// Pause between two rounds.
    pub send_period_ms: u64,
    /// Topic the samples are written on.
    pub topic_name: String,
    /// KEEP_LAST depth of the topic history.
    pub history_depth: usize,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            domain_id: 0,
            sample_count: 0,
            send_period_ms: DEFAULT_SEND_PERIOD_MS,
            topic_name: SEQUENCES_TOPIC.to_string(),
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl PublisherConfig {
    /// Load a configuration from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse_yaml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML")
    }

    /// Apply CLI overrides (`None` keeps the current value).
    pub fn apply_overrides(
        &mut self,
        domain_id: Option<u32>,
        sample_count: Option<u64>,
        send_period_ms: Option<u64>,
    ) {
        if let Some(domain_id) = domain_id {
            self.domain_id = domain_id;
        }
        if let Some(sample_count) = sample_count {
            self.sample_count = sample_count;
        }
        if let Some(send_period_ms) = send_period_ms {
            self.send_period_ms = send_period_ms;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain_id > MAX_DOMAIN_ID {
            bail!(
                "domain_id {} out of range (must be 0-{})",
                self.domain_id,
                MAX_DOMAIN_ID
            );
        }
        if self.history_depth == 0 {
            bail!("history_depth must be at least 1");
        }
        if self.topic_name.is_empty() {
            bail!("topic_name must not be empty");
        }
        Ok(())
    }

    pub fn send_period(&self) -> Duration {
        Duration::from_millis(self.send_period_ms)
    }
}
