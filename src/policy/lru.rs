//! # Least Recently Used (LRU) Cache
//!
//! Fixed-capacity key/value cache that evicts the least recently used entry
//! when a new key would push it past capacity.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                               │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │                 Arc<RwLock<LruCore<K, V>>>                   │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                 │                                    │
//!   │                                 ▼                                    │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  index: FxHashMap<K, Entry { value: Arc<V>, position }>      │   │
//!   │   │                                                     │        │   │
//!   │   │          ┌──────────────────────────────────────────┘        │   │
//!   │   │          ▼                                                   │   │
//!   │   │  order: IntrusiveList<K>                                     │   │
//!   │   │    head ──► [C] ◄──► [A] ◄──► [B] ◄── tail                   │   │
//!   │   │             MRU                LRU                           │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every key in `index` owns exactly one node in `order`, and the entry's
//! `position` is that node's [`SlotId`](crate::ds::SlotId). Following the
//! position always yields the entry's own key.
//!
//! ## Operations
//!
//! | Method          | Lock  | Complexity | Effect                                 |
//! |-----------------|-------|------------|----------------------------------------|
//! | `get(&k)`       | Write | O(1)       | Return value, move to MRU              |
//! | `put(k, v)`     | Write | O(1)       | Update + move to MRU, or insert/evict  |
//! | `delete(&k)`    | Write | O(1)       | Unlink and drop the entry              |
//! | `peek(&k)`      | Read  | O(1)       | Return value, order untouched          |
//! | `peek_lru()`    | Read  | O(1)       | Next eviction candidate                |
//! | `iter()`        | Read  | O(n) lazy  | Front-to-back enumeration              |
//! | `snapshot()`    | Read  | O(n)       | Eager copy of `iter()`                 |
//! | `clear()`       | Write | O(n)       | Drop every entry                       |
//!
//! ## Eviction
//!
//! ```text
//!   capacity = 3
//!     head ──► [C] ◄──► [B] ◄──► [A] ◄── tail
//!
//!   get(A)        head ──► [A] ◄──► [C] ◄──► [B] ◄── tail
//!   put(D, ..)    pop [B] from tail, push [D] at head
//!                 head ──► [D] ◄──► [A] ◄──► [C] ◄── tail
//! ```
//!
//! Updating an existing key never evicts; only a new key arriving at a full
//! cache pops exactly one entry from the tail.
//!
//! ## Thread Safety
//!
//! - `LruCore`: single-threaded, needs `&mut self` for anything that touches
//!   recency.
//! - `LruCache`: one `parking_lot::RwLock` guards index and order together.
//!   `get` takes the write lock because it reorders. Guards release on every
//!   exit path, unwinding included.
//! - Read paths use `read_recursive`, so a thread already holding a read guard
//!   (a live `iter()`) can keep reading while a writer is queued.
//! - Values are stored as `Arc<V>` and handed out without copying. Interior
//!   mutability inside `V` is the caller's concern.
//!
//! Two successive enumerations may see different states if writers run in
//! between; a single enumeration is consistent because it holds the read lock
//! until dropped.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let cache = LruCache::new(2).unwrap();
//! cache.put("A", 1);
//! cache.put("B", 2);
//! assert_eq!(cache.get("A").as_deref(), Some(&1));
//!
//! // B is now least recently used
//! let evicted = cache.put("C", 3);
//! assert_eq!(evicted.map(|(k, _)| k), Some("B"));
//!
//! let order: Vec<_> = cache.iter().map(|(k, v)| (k, *v)).collect();
//! assert_eq!(order, vec![("C", 3), ("A", 1)]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{CacheError, InvariantError, Result};
use crate::traits::RecencyOrder;

/// Upper bound on entries reserved up front; larger caches grow on demand.
pub const PREALLOC_LIMIT: usize = 1 << 16;

/// Index entry: the value plus the key's position in the recency order.
#[derive(Debug)]
struct Entry<V, T> {
    value: Arc<V>,
    position: T,
}

/// Single-threaded LRU core: hash index plus recency order.
///
/// `O` is the ordering structure; the default is the arena-backed
/// [`IntrusiveList`]. Wrap the core in [`LruCache`] to share it across threads.
pub struct LruCore<K, V, O = IntrusiveList<K>>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    index: FxHashMap<K, Entry<V, O::Token>>,
    order: O,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core holding at most `capacity` entries, storage reserved up front
    /// (up to [`PREALLOC_LIMIT`] entries).
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCore;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(LruCore::<u32, String>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_preallocation(capacity, true)
    }

    /// Like [`new`](Self::new), but only reserves storage when `preallocate` is set.
    ///
    /// The reservation is capped at [`PREALLOC_LIMIT`] entries, so any
    /// positive capacity is accepted without allocating for all of it.
    pub fn with_preallocation(capacity: usize, preallocate: bool) -> Result<Self> {
        let reserve = if preallocate {
            capacity.min(PREALLOC_LIMIT)
        } else {
            0
        };
        Self::with_order_and_reserve(capacity, IntrusiveList::with_capacity(reserve), reserve)
    }
}

impl<K, V, O> LruCore<K, V, O>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    /// Creates a core on top of a caller-supplied ordering structure.
    ///
    /// Any elements already in `order` are discarded.
    pub fn with_order(capacity: usize, order: O) -> Result<Self> {
        Self::with_order_and_reserve(capacity, order, 0)
    }

    fn with_order_and_reserve(capacity: usize, mut order: O, reserve: usize) -> Result<Self> {
        if capacity == 0 {
            debug!(capacity, "rejected LRU cache capacity");
            return Err(CacheError::InvalidCapacity(capacity));
        }
        order.clear();
        debug!(capacity, "created LRU cache");
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            order,
            capacity,
        })
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss leaves the recency order untouched.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.index.get(key)?;
        self.order.move_to_front(entry.position);
        Some(&entry.value)
    }

    /// Inserts or updates `key`, returning the entry evicted to make room.
    ///
    /// An existing key gets its value replaced and moves to the front; the
    /// size does not change and nothing is evicted. A new key arriving at a
    /// full cache evicts exactly the least recently used entry first.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCore;
    ///
    /// let mut cache = LruCore::new(1).unwrap();
    /// assert!(cache.put("a", 1).is_none());
    /// assert!(cache.put("a", 2).is_none()); // update, no eviction
    ///
    /// let (key, value) = cache.put("b", 3).unwrap();
    /// assert_eq!((key, *value), ("a", 2));
    /// ```
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, Arc<V>)> {
        self.put_arc(key, Arc::new(value))
    }

    /// [`put`](Self::put) for a value that is already shared.
    pub fn put_arc(&mut self, key: K, value: Arc<V>) -> Option<(K, Arc<V>)> {
        if let Some(entry) = self.index.get_mut(&key) {
            entry.value = value;
            self.order.move_to_front(entry.position);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let position = self.order.push_front(key.clone());
        self.index.insert(key, Entry { value, position });
        debug_assert_eq!(self.index.len(), self.order.len());
        evicted
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    #[inline]
    pub fn delete<Q>(&mut self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.index.remove(key)?;
        self.order.remove(entry.position);
        Some(entry.value)
    }

    /// Returns the value for `key` without touching recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|entry| &entry.value)
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// The entry the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &Arc<V>)> {
        let key = self.order.back()?;
        let entry = self.index.get(key)?;
        Some((key, &entry.value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, K, V, O> {
        Iter {
            core: self,
            cursor: self.order.front_token(),
            remaining: self.index.len(),
        }
    }

    /// Checks that index and order describe the same set of keys.
    ///
    /// Verifies the size bound, that both sides have the same length, that
    /// every node in the order is the one its key's entry points at, and the
    /// ordering structure's own link invariants.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but order holds {}",
                self.index.len(),
                self.order.len()
            )));
        }
        self.order.validate()?;

        let mut visited = 0usize;
        let mut cursor = self.order.front_token();
        while let Some(token) = cursor {
            let key = self
                .order
                .get(token)
                .ok_or_else(|| InvariantError::new("order yielded a dead token"))?;
            let entry = self
                .index
                .get(key)
                .ok_or_else(|| InvariantError::new("order holds a key missing from index"))?;
            if entry.position != token {
                return Err(InvariantError::new(
                    "index entry points at a different order node (duplicate key?)",
                ));
            }
            visited += 1;
            if visited > self.index.len() {
                return Err(InvariantError::new("order is longer than index"));
            }
            cursor = self.order.next_token(token);
        }

        if visited != self.index.len() {
            return Err(InvariantError::new(format!(
                "walked {visited} order nodes for {} index entries",
                self.index.len()
            )));
        }
        Ok(())
    }

    fn evict(&mut self) -> Option<(K, Arc<V>)> {
        let key = self.order.pop_back()?;
        let entry = self.index.remove(&key)?;
        trace!(capacity = self.capacity, len = self.index.len(), "evicted LRU entry");
        Some((key, entry.value))
    }
}

impl<K, V, O> fmt::Debug for LruCore<K, V, O>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V, O> fmt::Display for LruCore<K, V, O>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: fmt::Display,
    O: RecencyOrder<K>,
{
    /// One `key: value` line per entry, front to back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

impl<K, V, O> Extend<(K, V)> for LruCore<K, V, O>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

/// Front-to-back iterator over an [`LruCore`].
pub struct Iter<'a, K, V, O = IntrusiveList<K>>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    core: &'a LruCore<K, V, O>,
    cursor: Option<O::Token>,
    remaining: usize,
}

impl<'a, K, V, O> Iterator for Iter<'a, K, V, O>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
    type Item = (&'a K, &'a Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.cursor?;
        let key = self.core.order.get(token)?;
        let entry = self.core.index.get(key)?;
        self.cursor = self.core.order.next_token(token);
        self.remaining = self.remaining.saturating_sub(1);
        Some((key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, O> ExactSizeIterator for Iter<'_, K, V, O>
where
    K: Eq + Hash + Clone,
    O: RecencyOrder<K>,
{
}

/// Thread-safe LRU cache.
///
/// Cloning is cheap and yields another handle to the same cache.
pub struct LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<RwLock<LruCore<K, V>>>,
}

impl<K, V> Clone for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// [`CacheError::InvalidCapacity`] if `capacity` is 0.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<String, u64> = LruCache::new(256).unwrap();
    /// assert_eq!(cache.capacity(), 256);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Result<Self> {
        LruCore::new(capacity).map(Self::from_core)
    }

    /// Wraps an existing core, keeping its entries and order.
    pub fn from_core(core: LruCore<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
        }
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// `None` means "not found"; a miss does not reorder anything. Takes the
    /// write lock because a hit reorders.
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.get(key).map(Arc::clone)
    }

    /// Inserts or updates `key`; returns the evicted entry, if any.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache = LruCache::new(3).unwrap();
    /// cache.put("A", 1);
    /// cache.put("B", 2);
    /// cache.put("C", 3);
    /// cache.get("A");
    ///
    /// let (evicted, _) = cache.put("D", 4).unwrap();
    /// assert_eq!(evicted, "B");
    /// ```
    pub fn put(&self, key: K, value: V) -> Option<(K, Arc<V>)> {
        let value = Arc::new(value);
        let mut cache = self.inner.write();
        cache.put_arc(key, value)
    }

    /// [`put`](Self::put) for a value that is already shared.
    pub fn put_arc(&self, key: K, value: Arc<V>) -> Option<(K, Arc<V>)> {
        let mut cache = self.inner.write();
        cache.put_arc(key, value)
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub fn delete<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut cache = self.inner.write();
        cache.delete(key)
    }

    /// Returns the value for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.read_recursive();
        cache.peek(key).map(Arc::clone)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let cache = self.inner.read_recursive();
        cache.contains(key)
    }

    /// The entry the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.read_recursive();
        cache
            .peek_lru()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.read_recursive();
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        let cache = self.inner.read_recursive();
        cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let cache = self.inner.read_recursive();
        cache.capacity()
    }

    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    /// Lazily enumerates `(key, value)` pairs from most to least recently used.
    ///
    /// The iterator holds the read lock until it is dropped: writers on other
    /// threads wait, and calling a writing method on this cache from the same
    /// thread while it is alive deadlocks. Read-only methods such as `peek`
    /// and `len` remain usable from that thread, even with a writer queued.
    /// Enumeration never changes recency.
    pub fn iter(&self) -> LockedIter<'_, K, V> {
        let guard = self.inner.read_recursive();
        let cursor = guard.order.front_id();
        let remaining = guard.len();
        LockedIter {
            guard,
            cursor,
            remaining,
        }
    }

    /// Eager copy of [`iter`](Self::iter); the lock is released on return.
    pub fn snapshot(&self) -> Vec<(K, Arc<V>)> {
        self.iter().collect()
    }

    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        let cache = self.inner.read_recursive();
        cache.check_invariants()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read_recursive();
        f.debug_struct("LruCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read_recursive();
        fmt::Display::fmt(&*cache, f)
    }
}

/// Enumeration over an [`LruCache`] that holds its read lock.
pub struct LockedIter<'a, K, V>
where
    K: Eq + Hash + Clone,
{
    guard: RwLockReadGuard<'a, LruCore<K, V>>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<K, V> Iterator for LockedIter<'_, K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = (K, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.cursor?;
        let key = self.guard.order.get(token)?;
        let entry = self.guard.index.get(key)?;
        let item = (key.clone(), Arc::clone(&entry.value));
        self.cursor = self.guard.order.next_id(token);
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for LockedIter<'_, K, V> where K: Eq + Hash + Clone {}
