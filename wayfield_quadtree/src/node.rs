// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Statically subdivided regions and the arena that owns them.
//!
//! ## Overview
//!
//! Every region has a strict `area` (the exact, non-overlapping division) and a
//! `loose_area` (the strict area grown by the tree's slack on each side).
//! Interior regions own exactly four children; leaves own an ordered item list.
//! The shape is fixed at build time: changing the depth means rebuilding the tree.
//!
//! ## Placement rules
//!
//! - Insertion looks only at an item's center, tested against strict areas.
//! - Whether an item may stay where it is after moving is tested against the
//!   loose area of its leaf, so small moves near a boundary never migrate it.
//! - Queries prune against loose areas. An item larger than the slack can overhang its
//!   leaf's loose area, so the tree widens the pruning rectangle by the largest overhang
//!   it has placed.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::geom::{contains_point, contains_rect, intersects};
use crate::registry::Registry;
use crate::types::{Corner, ItemKey, NodeId, Placement, SpatialItem};

/// A region of the tree.
#[derive(Clone, Debug)]
pub struct SpatialNode {
    area: Rect,
    loose_area: Rect,
    corner: Corner,
    depth: u32,
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Clone, Debug)]
enum NodeKind {
    Interior([NodeId; 4]),
    Leaf(Vec<ItemKey>),
}

impl SpatialNode {
    /// Exact division boundary.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Strict area grown by the tree's slack margins.
    pub fn loose_area(&self) -> Rect {
        self.loose_area
    }

    /// Position relative to the parent.
    pub fn corner(&self) -> Corner {
        self.corner
    }

    /// Distance from the top level (top-level nodes are at depth 0).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Parent node, `None` for the four top-level nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// True if this node stores items rather than children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children in [`Corner::ALL`] order, or `None` for a leaf.
    pub fn children(&self) -> Option<[NodeId; 4]> {
        match &self.kind {
            NodeKind::Interior(children) => Some(*children),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Items stored at this node; always empty for interior nodes.
    pub fn items(&self) -> &[ItemKey] {
        match &self.kind {
            NodeKind::Interior(_) => &[],
            NodeKind::Leaf(items) => items,
        }
    }
}

/// Why a leaf refused to give up an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SlotMismatch;

#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<SpatialNode>,
}

impl NodeArena {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub(crate) fn get(&self, id: NodeId) -> &SpatialNode {
        &self.nodes[id.idx()]
    }

    /// Build a region and, while `subdivisions_left > 0`, its four children.
    pub(crate) fn build(
        &mut self,
        area: Rect,
        subdivisions_left: u32,
        corner: Corner,
        parent: Option<NodeId>,
        slack: (f64, f64),
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let depth = parent.map_or(0, |p| self.get(p).depth + 1);
        self.nodes.push(SpatialNode {
            area,
            loose_area: area.inflate(slack.0, slack.1),
            corner,
            depth,
            parent,
            kind: NodeKind::Leaf(Vec::new()),
        });
        if subdivisions_left == 0 {
            return id;
        }
        let children = Corner::ALL
            .map(|c| self.build(c.quadrant_of(area), subdivisions_left - 1, c, Some(id), slack));
        self.nodes[id.idx()].kind = NodeKind::Interior(children);
        id
    }

    /// The leaf under `id` that accepts an item centered at `center`.
    ///
    /// Interior nodes try their children in [`Corner::ALL`] order; a leaf accepts any
    /// center inside its strict area.
    pub(crate) fn accepting_leaf(&self, id: NodeId, center: Point) -> Option<NodeId> {
        let node = self.get(id);
        if !contains_point(node.area, center) {
            return None;
        }
        match &node.kind {
            NodeKind::Leaf(_) => Some(id),
            NodeKind::Interior(children) => children
                .iter()
                .find_map(|&child| self.accepting_leaf(child, center)),
        }
    }

    /// Append `key` to `leaf`'s item list and return where it landed.
    pub(crate) fn attach(&mut self, leaf: NodeId, key: ItemKey) -> Placement {
        match &mut self.nodes[leaf.idx()].kind {
            NodeKind::Leaf(items) => {
                items.push(key);
                Placement {
                    leaf,
                    slot: items.len() - 1,
                }
            }
            NodeKind::Interior(_) => panic!("attach called on an interior node"),
        }
    }

    /// Remove `key` from the slot recorded in `placement`.
    ///
    /// On success returns the item moved into the vacated slot, whose placement the
    /// caller must patch.
    pub(crate) fn detach(
        &mut self,
        placement: Placement,
        key: ItemKey,
    ) -> Result<Option<ItemKey>, SlotMismatch> {
        let Some(node) = self.nodes.get_mut(placement.leaf.idx()) else {
            return Err(SlotMismatch);
        };
        let NodeKind::Leaf(items) = &mut node.kind else {
            return Err(SlotMismatch);
        };
        if items.get(placement.slot) != Some(&key) {
            return Err(SlotMismatch);
        }
        items.swap_remove(placement.slot);
        Ok(items.get(placement.slot).copied())
    }

    /// Best-effort removal of `key` from every leaf, for when its placement is untrustworthy.
    ///
    /// Returns the leaves it was found in; their remaining items may have shifted slots.
    pub(crate) fn purge(&mut self, key: ItemKey) -> Vec<NodeId> {
        let mut touched = Vec::new();
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            let NodeKind::Leaf(items) = &mut node.kind else {
                continue;
            };
            let before = items.len();
            items.retain(|&k| k != key);
            if items.len() != before {
                touched.push(NodeId::new(idx));
            }
        }
        touched
    }

    /// Empty every leaf under `id`, reporting each removed item.
    pub(crate) fn remove_all(&mut self, id: NodeId, removed: &mut impl FnMut(ItemKey)) {
        let children = match &mut self.nodes[id.idx()].kind {
            NodeKind::Leaf(items) => {
                for key in items.drain(..) {
                    removed(key);
                }
                return;
            }
            NodeKind::Interior(children) => *children,
        };
        for child in children {
            self.remove_all(child, removed);
        }
    }

    /// Collect visible items from leaves whose loose area meets `reach`.
    ///
    /// `reach` is `query` grown by the overhang of the placed items. With `exact` unset
    /// the leaf contributes every visible item without a per-item test, so the result
    /// is a superset suited to drawing; with `exact` set only items whose bounds
    /// intersect `query` are kept.
    pub(crate) fn find_visible<P>(
        &self,
        id: NodeId,
        reach: Rect,
        query: Rect,
        registry: &Registry<P>,
        exact: bool,
        out: &mut Vec<ItemKey>,
    ) {
        let node = self.get(id);
        if !intersects(node.loose_area, reach) {
            return;
        }
        match &node.kind {
            NodeKind::Leaf(items) => {
                for &key in items {
                    let Some(entry) = registry.get(key) else {
                        continue;
                    };
                    if entry.item.visible && (!exact || intersects(entry.item.bounds, query)) {
                        out.push(key);
                    }
                }
            }
            NodeKind::Interior(children) => {
                for &child in children {
                    self.find_visible(child, reach, query, registry, exact, out);
                }
            }
        }
    }

    /// True if a visible item under `id` intersecting `query` satisfies `predicate`.
    pub(crate) fn contains_item<P>(
        &self,
        id: NodeId,
        reach: Rect,
        query: Rect,
        registry: &Registry<P>,
        predicate: &mut impl FnMut(ItemKey, &SpatialItem<P>) -> bool,
    ) -> bool {
        let node = self.get(id);
        if !intersects(node.loose_area, reach) {
            return false;
        }
        match &node.kind {
            NodeKind::Leaf(items) => items.iter().any(|&key| {
                registry.get(key).is_some_and(|entry| {
                    entry.item.visible
                        && intersects(entry.item.bounds, query)
                        && predicate(key, &entry.item)
                })
            }),
            NodeKind::Interior(children) => children
                .iter()
                .any(|&child| self.contains_item(child, reach, query, registry, predicate)),
        }
    }

    /// How far `bounds` sticks out of the loose area of `leaf` on each axis.
    pub(crate) fn overhang(&self, leaf: NodeId, bounds: Rect) -> Vec2 {
        let Some(node) = self.nodes.get(leaf.idx()) else {
            return Vec2::ZERO;
        };
        let loose = node.loose_area;
        Vec2::new(
            (loose.x0 - bounds.x0).max(bounds.x1 - loose.x1).max(0.0),
            (loose.y0 - bounds.y0).max(bounds.y1 - loose.y1).max(0.0),
        )
    }

    /// True if `bounds` still fits the loose area of `leaf`.
    pub(crate) fn still_fits(&self, leaf: NodeId, bounds: Rect) -> bool {
        self.nodes
            .get(leaf.idx())
            .is_some_and(|n| contains_rect(n.loose_area, bounds))
    }

    #[cfg(test)]
    pub(crate) fn leaf_items_mut(&mut self, leaf: NodeId) -> Option<&mut Vec<ItemKey>> {
        match &mut self.nodes.get_mut(leaf.idx())?.kind {
            NodeKind::Leaf(items) => Some(items),
            NodeKind::Interior(_) => None,
        }
    }
}
