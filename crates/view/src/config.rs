//! View configuration.

use viewdex_core::{Error, Result};

/// Default number of shards a view spreads its documents over.
pub const DEFAULT_SHARDS: usize = 4;

/// Upper bound on the shard count.
pub const MAX_SHARDS: usize = 1024;

/// Tunables of a single view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewConfig {
    /// Number of partitions documents are routed to by id. Each shard keeps
    /// its own leaf reductions; queries combine them with rereduce.
    pub shards: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            shards: DEFAULT_SHARDS,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Checks the configuration before a view is built.
    pub fn validate(&self) -> Result<()> {
        if self.shards == 0 {
            return Err(Error::invalid_config("shards must be at least 1"));
        }
        if self.shards > MAX_SHARDS {
            return Err(Error::invalid_config(alloc::format!(
                "shards must be at most {}, got {}",
                MAX_SHARDS,
                self.shards
            )));
        }
        Ok(())
    }
}
