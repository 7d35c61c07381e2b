//! Store configuration
//!
//! `StoreConfig` tunes the in-memory map backing a store. It can be built in
//! code or loaded from TOML:
//!
//! ```toml
//! # Number of map shards (power of two, greater than 1)
//! shard_amount = 16
//!
//! # Entries to reserve capacity for up front
//! initial_capacity = 0
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of map shards
pub const DEFAULT_SHARD_AMOUNT: usize = 16;

fn default_shard_amount() -> usize {
    DEFAULT_SHARD_AMOUNT
}

/// Configuration for the in-memory store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of shards in the concurrent map. Must be a power of two > 1.
    #[serde(default = "default_shard_amount")]
    pub shard_amount: usize,
    /// Capacity reserved when the store is created.
    #[serde(default)]
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shard_amount: DEFAULT_SHARD_AMOUNT,
            initial_capacity: 0,
        }
    }
}

impl StoreConfig {
    /// Set the shard count
    pub fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = shard_amount;
        self
    }

    /// Set the initial capacity
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Check the config for values the map cannot accept.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `shard_amount` is not a power of two
    /// greater than 1.
    pub fn validate(&self) -> Result<()> {
        if self.shard_amount <= 1 || !self.shard_amount.is_power_of_two() {
            return Err(Error::invalid_config(format!(
                "shard_amount must be a power of two greater than 1, got {}",
                self.shard_amount
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => {
                Error::invalid_config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# spanstore configuration
#
# Number of map shards (power of two, greater than 1)
shard_amount = 16

# Entries to reserve capacity for up front
initial_capacity = 0
"#
    }
}
