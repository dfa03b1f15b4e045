//! Serializable cache configuration.
//!
//! ```toml
//! capacity = 1024
//! preallocate = false
//! ```
//!
//! Load it with [`CacheConfig::load`] or [`CacheConfig::from_toml_str`] and
//! hand it to [`CacheBuilder::from_config`](crate::builder::CacheBuilder::from_config).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CacheError, Result};

/// Settings for constructing an LRU cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries. Must be at least 1.
    pub capacity: usize,

    /// Reserve index and list storage for `capacity` entries up front.
    #[serde(default = "default_preallocate")]
    pub preallocate: bool,
}

fn default_preallocate() -> bool {
    true
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            preallocate: default_preallocate(),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading cache configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Rejects values no cache could be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}
