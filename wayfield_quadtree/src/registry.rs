// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat item registry: the slot arena that owns every item record of a tree.

use alloc::vec::Vec;

use crate::types::{ItemKey, Placement, SpatialItem, TreeId};

#[derive(Clone, Debug)]
pub(crate) struct Entry<P> {
    pub(crate) generation: u32,
    pub(crate) item: SpatialItem<P>,
    pub(crate) placement: Option<Placement>,
}

#[derive(Debug)]
pub(crate) struct Registry<P> {
    tree: TreeId,
    entries: Vec<Option<Entry<P>>>, // slots
    generations: Vec<u32>,          // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    len: usize,
}

impl<P> Registry<P> {
    pub(crate) fn new(tree: TreeId) -> Self {
        Self {
            tree,
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
        self.generations.reserve(n);
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// True if `key` was issued by this registry's tree.
    pub(crate) fn owns(&self, key: ItemKey) -> bool {
        key.tree == self.tree
    }

    pub(crate) fn insert(&mut self, item: SpatialItem<P>) -> ItemKey {
        let entry = |generation| Entry {
            generation,
            item,
            placement: None,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            // Freed slots never sit at `u32::MAX`; see `release`.
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            self.entries[idx] = Some(entry(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(entry(generation)));
            self.generations.push(generation);
            (self.entries.len() - 1, generation)
        };
        self.len += 1;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ItemKey uses 32-bit slots by design."
        )]
        ItemKey {
            slot: idx as u32,
            generation,
            tree: self.tree,
        }
    }

    pub(crate) fn remove(&mut self, key: ItemKey) -> Option<Entry<P>> {
        self.get(key)?;
        let entry = self.entries[key.idx()].take();
        self.release(key.idx());
        self.len -= 1;
        entry
    }

    /// Return a slot to the free list unless its generation is exhausted.
    fn release(&mut self, idx: usize) {
        if self.generations[idx] < u32::MAX {
            self.free_list.push(idx);
        }
    }

    /// Free every slot; outstanding keys become stale.
    pub(crate) fn clear(&mut self) {
        for idx in 0..self.entries.len() {
            if self.entries[idx].take().is_some() {
                self.release(idx);
            }
        }
        self.len = 0;
    }

    pub(crate) fn get(&self, key: ItemKey) -> Option<&Entry<P>> {
        if !self.owns(key) {
            return None;
        }
        let e = self.entries.get(key.idx())?.as_ref()?;
        (e.generation == key.generation).then_some(e)
    }

    pub(crate) fn get_mut(&mut self, key: ItemKey) -> Option<&mut Entry<P>> {
        if !self.owns(key) {
            return None;
        }
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        (e.generation == key.generation).then_some(e)
    }

    /// Live entries in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ItemKey, &Entry<P>)> + '_ {
        self.entries.iter().enumerate().filter_map(|(idx, e)| {
            let e = e.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ItemKey uses 32-bit slots by design."
            )]
            let key = ItemKey {
                slot: idx as u32,
                generation: e.generation,
                tree: self.tree,
            };
            Some((key, e))
        })
    }

    pub(crate) fn keys(&self) -> Vec<ItemKey> {
        self.iter().map(|(k, _)| k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn item(owner: u32) -> SpatialItem<u32> {
        SpatialItem::new(Rect::new(0.0, 0.0, 1.0, 1.0), owner)
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut reg = Registry::new(TreeId::next());
        let a = reg.insert(item(1));
        assert!(reg.remove(a).is_some());
        let b = reg.insert(item(2));
        assert_eq!(a.slot, b.slot);
        assert!(b.generation > a.generation, "generation must increase on reuse");
        assert!(reg.get(a).is_none());
        assert_eq!(reg.get(b).map(|e| e.item.owner), Some(2));
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut reg = Registry::new(TreeId::next());
        let a = reg.insert(item(1));
        reg.generations[a.idx()] = u32::MAX;
        reg.entries[a.idx()].as_mut().expect("live").generation = u32::MAX;
        let worn = ItemKey {
            generation: u32::MAX,
            ..a
        };
        assert!(reg.remove(worn).is_some());
        let b = reg.insert(item(2));
        assert_ne!(b.slot, worn.slot, "exhausted slots are not reused");
        assert!(reg.get(worn).is_none());
        assert_eq!(reg.get(b).map(|e| e.item.owner), Some(2));
    }

    #[test]
    fn clear_stales_every_key() {
        let mut reg = Registry::new(TreeId::next());
        let a = reg.insert(item(1));
        let b = reg.insert(item(2));
        reg.clear();
        assert_eq!(reg.len(), 0);
        assert!(reg.get(a).is_none());
        assert!(reg.get(b).is_none());
        let c = reg.insert(item(3));
        assert!(reg.get(c).is_some());
        assert_eq!(reg.iter().count(), 1);
    }

    #[test]
    fn foreign_keys_are_rejected() {
        let mut mine = Registry::new(TreeId::next());
        let mut other = Registry::new(TreeId::next());
        let _ = mine.insert(item(1));
        let theirs = other.insert(item(2));
        assert!(!mine.owns(theirs));
        assert!(mine.get(theirs).is_none());
        assert!(mine.remove(theirs).is_none());
        assert_eq!(mine.len(), 1);
    }
}
