//! Append-only storage indexed by typed IDs.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// A key type for [`Arena`]: a bijection with `usize` positions.
pub trait ArenaId: Copy {
    /// The ID at `index`.
    fn from_index(index: usize) -> Self;

    /// The position this ID names.
    fn index(self) -> usize;
}

/// Items of one kind, addressed by the ID returned from [`alloc`](Arena::alloc).
///
/// Nothing is ever removed and no `&mut` access is offered, so an ID stays
/// valid and its item unchanged once allocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    key: PhantomData<fn() -> I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// An empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            key: PhantomData,
        }
    }

    /// The ID the next [`alloc`](Self::alloc) returns.
    pub fn next_id(&self) -> I {
        I::from_index(self.items.len())
    }

    /// Stores `item` and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = self.next_id();
        self.items.push(item);
        id
    }

    /// The item named by `id`.
    ///
    /// # Panics
    ///
    /// If `id` was issued by a different arena and is out of range.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.index()]
    }

    /// Like [`get`](Self::get) but `None` for an out-of-range ID.
    pub fn try_get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when nothing has been allocated.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(id, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        (0..).map(I::from_index).zip(&self.items)
    }

    /// Items in allocation order.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SignalId;

    fn clocking_wires() -> (Arena<SignalId, &'static str>, SignalId, SignalId) {
        let mut arena = Arena::new();
        let clkin = arena.alloc("clkin");
        let fb = arena.alloc("clkfbout");
        (arena, clkin, fb)
    }

    #[test]
    fn ids_follow_allocation_order() {
        let (arena, clkin, fb) = clocking_wires();
        assert_eq!((clkin.index(), fb.index()), (0, 1));
        assert_eq!(arena[fb], "clkfbout");
        assert_eq!(arena.next_id().index(), 2);
    }

    #[test]
    fn foreign_id_is_none() {
        let (arena, _, _) = clocking_wires();
        assert_eq!(arena.try_get(SignalId::from_raw(7)), None);
    }

    #[test]
    fn iter_pairs_ids_with_items() {
        let (arena, clkin, _) = clocking_wires();
        let first = arena.iter().next().unwrap();
        assert_eq!(first, (clkin, &"clkin"));
        assert_eq!(arena.values().count(), 2);
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut arena: Arena<SignalId, u32> = Arena::new();
        arena.alloc(8);
        arena.alloc(32);
        let json = serde_json::to_string(&arena).unwrap();
        assert_eq!(json, "[8,32]");
        let back: Arena<SignalId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[SignalId::from_raw(1)], 32);
    }
}
