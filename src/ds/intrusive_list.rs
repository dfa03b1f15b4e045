//! Intrusive doubly linked list backed by `SlotArena`.
//!
//! Nodes live in a [`SlotArena`] and link to each other by [`SlotId`], so a
//! node's handle stays stable while other nodes come and go. This is the
//! recency ordering behind [`LruCore`](crate::policy::lru::LruCore).
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//! ```
//!
//! ## Performance
//! - `push_front` / `pop_back`: O(1)
//! - `move_to_front` / `remove(id)`: O(1)
//! - `validate`: O(n)
use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;
use crate::traits::RecencyOrder;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
/// Doubly linked list whose nodes are addressed by `SlotId`.
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Value at the back (LRU end).
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Handle of the node following `id`, toward the back.
    pub fn next_id(&self, id: SlotId) -> Option<SlotId> {
        self.arena.get(id).and_then(|node| node.next)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|head| self.arena.get_mut(head)) {
            Some(old_head) => old_head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        id
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks `id` and frees its slot.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front; `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Walks the list and checks link symmetry, head/tail and node count.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() || !self.arena.is_empty() {
                return Err(InvariantError::new(
                    "list head/tail disagree with node count",
                ));
            }
            return Ok(());
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("dangling link to slot {}", id.0)))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "slot {} has a prev link that does not point back",
                    id.0
                )));
            }
            count += 1;
            if count > self.arena.len() {
                return Err(InvariantError::new("cycle detected in list"));
            }
            prev = Some(id);
            current = node.next;
        }

        if prev != self.tail {
            return Err(InvariantError::new("tail does not match last reachable node"));
        }
        if count != self.arena.len() {
            return Err(InvariantError::new(format!(
                "{count} reachable nodes but {} allocated",
                self.arena.len()
            )));
        }
        Ok(())
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        match old_head.and_then(|h| self.arena.get_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyOrder<T> for IntrusiveList<T> {
    type Token = SlotId;

    fn len(&self) -> usize {
        IntrusiveList::len(self)
    }

    fn push_front(&mut self, value: T) -> SlotId {
        IntrusiveList::push_front(self, value)
    }

    fn move_to_front(&mut self, token: SlotId) -> bool {
        IntrusiveList::move_to_front(self, token)
    }

    fn pop_back(&mut self) -> Option<T> {
        IntrusiveList::pop_back(self)
    }

    fn remove(&mut self, token: SlotId) -> Option<T> {
        IntrusiveList::remove(self, token)
    }

    fn get(&self, token: SlotId) -> Option<&T> {
        IntrusiveList::get(self, token)
    }

    fn back(&self) -> Option<&T> {
        IntrusiveList::back(self)
    }

    fn front_token(&self) -> Option<SlotId> {
        self.head
    }

    fn next_token(&self, token: SlotId) -> Option<SlotId> {
        self.next_id(token)
    }

    fn clear(&mut self) {
        IntrusiveList::clear(self)
    }

    fn validate(&self) -> Result<(), InvariantError> {
        IntrusiveList::validate(self)
    }
}
