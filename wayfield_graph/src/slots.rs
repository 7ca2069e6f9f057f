// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by vertices and edges.

use alloc::vec::Vec;

#[derive(Clone, Debug)]
pub(crate) struct Slots<T> {
    values: Vec<Option<T>>, // slots
    generations: Vec<u32>,  // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    /// Live slots in insertion order, for index-based access.
    order: Vec<(u32, u32)>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }
}

impl<T> Slots<T> {
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn insert(&mut self, value: T) -> (u32, u32) {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            // Freed slots never sit at `u32::MAX`; see `remove`.
            let generation = self.generations[idx] + 1;
            self.generations[idx] = generation;
            self.values[idx] = Some(value);
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.values.push(Some(value));
            self.generations.push(generation);
            (self.values.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Graph handles use 32-bit indices by design."
        )]
        let handle = (idx as u32, generation);
        self.order.push(handle);
        handle
    }

    pub(crate) fn remove(&mut self, (idx, generation): (u32, u32)) -> Option<T> {
        if !self.is_alive((idx, generation)) {
            return None;
        }
        let value = self.values[idx as usize].take();
        // An exhausted generation retires the slot for good.
        if generation < u32::MAX {
            self.free_list.push(idx as usize);
        }
        if let Some(pos) = self.position((idx, generation)) {
            self.order.remove(pos);
        }
        value
    }

    pub(crate) fn is_alive(&self, (idx, generation): (u32, u32)) -> bool {
        self.values
            .get(idx as usize)
            .is_some_and(|v| v.is_some() && self.generations[idx as usize] == generation)
    }

    pub(crate) fn get(&self, handle: (u32, u32)) -> Option<&T> {
        if !self.is_alive(handle) {
            return None;
        }
        self.values[handle.0 as usize].as_ref()
    }

    pub(crate) fn get_mut(&mut self, handle: (u32, u32)) -> Option<&mut T> {
        if !self.is_alive(handle) {
            return None;
        }
        self.values[handle.0 as usize].as_mut()
    }

    /// Handle at insertion-order position `i`.
    pub(crate) fn at(&self, i: usize) -> Option<(u32, u32)> {
        self.order.get(i).copied()
    }

    /// Insertion-order position of `handle`.
    pub(crate) fn position(&self, handle: (u32, u32)) -> Option<usize> {
        self.order.iter().position(|&h| h == handle)
    }

    pub(crate) fn handles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused_with_a_new_generation() {
        let mut slots = Slots::default();
        let a = slots.insert('a');
        assert_eq!(slots.remove(a), Some('a'));
        let b = slots.insert('b');
        assert_eq!(a.0, b.0);
        assert!(b.1 > a.1);
        assert!(!slots.is_alive(a));
        assert_eq!(slots.get(b), Some(&'b'));
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut slots = Slots::default();
        let a = slots.insert('a');
        slots.generations[a.0 as usize] = u32::MAX;
        slots.order[0] = (a.0, u32::MAX);
        let worn = (a.0, u32::MAX);
        assert_eq!(slots.remove(worn), Some('a'));
        let b = slots.insert('b');
        assert_ne!(b.0, worn.0, "exhausted slots are not reused");
        assert!(!slots.is_alive(worn));
        assert_eq!(slots.len(), 1);
    }
}
