//! lrukit: fixed-capacity, thread-safe LRU cache.
//!
//! The cache pairs a hash index with an arena-backed intrusive list so that
//! `get`, `put` and `delete` stay O(1) while one lock keeps both structures
//! in step. See [`policy::lru`] for the data-structure invariants.

pub mod builder;
pub mod config;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
