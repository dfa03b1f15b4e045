//! Error types for the lrukit library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: construction and configuration failures. Steady-state
//!   operations never return it; a `get` or `delete` miss is a normal
//!   outcome reported through `Option`.
//! - [`InvariantError`]: returned by `check_invariants` when the index and the
//!   recency list have drifted apart.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::CacheError;
//! use lrukit::policy::lru::LruCache;
//!
//! let err = LruCache::<String, i32>::new(0).unwrap_err();
//! assert!(matches!(err, CacheError::InvalidCapacity(0)));
//! assert!(err.to_string().contains("capacity"));
//! ```

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised while constructing or configuring a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Capacity below 1. Fatal to construction; the caller must pick another.
    #[error("invalid capacity {0}: capacity must be at least 1")]
    InvalidCapacity(usize),

    /// Configuration file could not be read.
    #[error("failed to read cache configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration text is not valid TOML for [`CacheConfig`](crate::config::CacheConfig).
    #[error("failed to parse cache configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_capacity_display_names_the_value() {
        let err = CacheError::InvalidCapacity(0);
        assert_eq!(
            err.to_string(),
            "invalid capacity 0: capacity must be at least 1"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CacheError = io.into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn invariant_message_round_trips() {
        let err = InvariantError::new("order length mismatch");
        assert_eq!(err.message(), "order length mismatch");
        assert_eq!(err.to_string(), "order length mismatch");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn both_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
        assert_error::<InvariantError>();
    }
}
