// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coalescer configuration
//!
//! Loaded from a `herd.toml` file:
//!
//! ```toml
//! [coalescer]
//! shards = 32
//! ```

use crate::routing::DEFAULT_SHARD_COUNT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("shard count must be greater than 0")]
    ZeroShards,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for a single coalescer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoalescerConfig {
    /// Number of independently locked partitions, fixed at construction
    pub shards: usize,
}

impl CoalescerConfig {
    pub fn new(shards: usize) -> Self {
        Self { shards }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shards == 0 {
            return Err(ConfigError::ZeroShards);
        }
        Ok(())
    }
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARD_COUNT,
        }
    }
}

/// Top-level `herd.toml` document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HerdConfig {
    pub coalescer: CoalescerConfig,
}

impl HerdConfig {
    /// Parse and validate configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: HerdConfig = toml::from_str(content)?;
        config.coalescer.validate()?;
        Ok(config)
    }

    /// Read configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
