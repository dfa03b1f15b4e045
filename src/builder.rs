//! Cache builder.
//!
//! Collects construction options, validates them once, and produces either a
//! single-threaded [`LruCore`] or a shareable [`LruCache`].
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::CacheBuilder;
//!
//! let cache = CacheBuilder::new(100)
//!     .preallocate(false)
//!     .try_build::<u64, String>()
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1).as_deref(), Some(&"hello".to_string()));
//!
//! assert!(CacheBuilder::new(0).try_build::<u64, String>().is_err());
//! ```

use std::hash::Hash;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::policy::lru::{LruCache, LruCore};

/// Builder for LRU cache instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    preallocate: bool,
}

impl CacheBuilder {
    /// Starts a builder for a cache of `capacity` entries.
    ///
    /// Validation happens in the `try_build*` methods.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            preallocate: true,
        }
    }

    /// Seeds the builder from a loaded configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            capacity: config.capacity,
            preallocate: config.preallocate,
        }
    }

    /// Whether to reserve storage for `capacity` entries up front (default `true`).
    pub fn preallocate(mut self, preallocate: bool) -> Self {
        self.preallocate = preallocate;
        self
    }

    /// Builds a single-threaded core.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`](crate::error::CacheError::InvalidCapacity)
    /// if the capacity is 0.
    pub fn try_build_core<K, V>(self) -> Result<LruCore<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        LruCore::with_preallocation(self.capacity, self.preallocate)
    }

    /// Builds a thread-safe cache.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`](crate::error::CacheError::InvalidCapacity)
    /// if the capacity is 0.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>>
    where
        K: Eq + Hash + Clone,
    {
        self.try_build_core::<K, V>().map(LruCache::from_core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn builds_working_cache() {
        let cache = CacheBuilder::new(2).try_build::<u64, String>().unwrap();

        cache.put(1, "one".to_string());
        cache.put(2, "two".to_string());
        cache.put(3, "three".to_string());

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
    }

    #[test]
    fn builds_core_without_preallocation() {
        let mut core = CacheBuilder::new(3)
            .preallocate(false)
            .try_build_core::<&str, i32>()
            .unwrap();
        core.put("a", 1);
        assert_eq!(core.capacity(), 3);
        assert_eq!(core.len(), 1);
    }

    #[test]
    fn zero_capacity_fails_both_paths() {
        let err = CacheBuilder::new(0).try_build::<u8, u8>().unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity(0)));
        let err = CacheBuilder::new(0).try_build_core::<u8, u8>().unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn from_config_carries_settings() {
        let config = CacheConfig::from_toml_str("capacity = 4\npreallocate = false").unwrap();
        let cache = CacheBuilder::from_config(&config)
            .try_build::<u32, u32>()
            .unwrap();
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn large_configured_capacity_builds() {
        let config = CacheConfig::from_toml_str("capacity = 1099511627776").unwrap();
        let cache = CacheBuilder::from_config(&config)
            .try_build::<u32, u32>()
            .unwrap();
        cache.put(1, 1);
        assert_eq!(cache.capacity(), 1 << 40);
        assert_eq!(cache.len(), 1);
    }
}
