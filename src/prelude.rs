pub use crate::builder::CacheBuilder;
pub use crate::config::CacheConfig;
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{CacheError, InvariantError};
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::traits::RecencyOrder;
