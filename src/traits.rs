//! Trait seam between the LRU index and its recency ordering.
//!
//! The cache core only needs a handful of operations from its ordering
//! structure. [`RecencyOrder`] names them so the core can be written against
//! "an ordered sequence with O(1) relocate-to-front given an opaque token"
//! instead of a concrete list type.
//!
//! ```text
//!   front (MRU) ─► [k3] ◄──► [k1] ◄──► [k2] ◄── back (LRU)
//!                   ▲
//!                   └── Token handed out by push_front, stored in the index
//! ```
//!
//! [`IntrusiveList`](crate::ds::IntrusiveList) is the implementation used by
//! [`LruCore`](crate::policy::lru::LruCore).

use std::fmt;

use crate::error::InvariantError;

/// Ordered sequence, front = most recently used, back = least recently used.
///
/// Tokens are ownership-free: they do not borrow the sequence and stay valid
/// across insertions and removals of *other* elements. A token becomes invalid
/// once its own element is removed; implementations must treat an invalid
/// token as absent rather than panic.
///
/// # Example
///
/// ```
/// use lrukit::ds::IntrusiveList;
/// use lrukit::traits::RecencyOrder;
///
/// fn promote<O: RecencyOrder<&'static str>>(order: &mut O) -> Option<&'static str> {
///     let a = order.push_front("a");
///     order.push_front("b");
///     order.move_to_front(a);
///     order.pop_back()
/// }
///
/// let mut list = IntrusiveList::new();
/// assert_eq!(promote(&mut list), Some("b"));
/// ```
pub trait RecencyOrder<T> {
    /// Opaque position handle.
    type Token: Copy + Eq + fmt::Debug;

    /// Number of elements in the sequence.
    fn len(&self) -> usize;

    /// Returns `true` if the sequence holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value` at the front and returns its token.
    fn push_front(&mut self, value: T) -> Self::Token;

    /// Relocates the element behind `token` to the front.
    ///
    /// Returns `false` if the token does not refer to a live element.
    fn move_to_front(&mut self, token: Self::Token) -> bool;

    /// Removes and returns the back element.
    fn pop_back(&mut self) -> Option<T>;

    /// Removes the element behind `token`, wherever it sits.
    fn remove(&mut self, token: Self::Token) -> Option<T>;

    /// Dereferences a token.
    fn get(&self, token: Self::Token) -> Option<&T>;

    /// Returns the back element without removing it.
    fn back(&self) -> Option<&T>;

    /// Token of the front element.
    fn front_token(&self) -> Option<Self::Token>;

    /// Token of the element after `token` (one step toward the back).
    fn next_token(&self, token: Self::Token) -> Option<Self::Token>;

    /// Removes every element.
    fn clear(&mut self);

    /// Checks the structure's own link invariants.
    ///
    /// The default accepts everything; linked implementations override it.
    fn validate(&self) -> Result<(), InvariantError> {
        Ok(())
    }
}
