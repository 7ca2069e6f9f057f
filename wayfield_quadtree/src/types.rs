// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the quad-tree: handles, corners, items, and check outcomes.

use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::{Point, Rect};

/// Position of a node relative to its parent (or of a top-level node relative to the tree).
///
/// Only used to lay out quadrants and for diagnostics; it never affects queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Upper-left quadrant (minimum x, minimum y).
    UpperLeft,
    /// Upper-right quadrant.
    UpperRight,
    /// Bottom-left quadrant.
    BottomLeft,
    /// Bottom-right quadrant (maximum x, maximum y).
    BottomRight,
}

impl Corner {
    /// All corners, in the order insertion tries them.
    pub const ALL: [Self; 4] = [
        Self::UpperLeft,
        Self::UpperRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// The quadrant of `area` named by this corner.
    ///
    /// The four quadrants tile `area` exactly: shared edges use the same midpoint value.
    pub fn quadrant_of(self, area: Rect) -> Rect {
        let mid_x = area.x0 + area.width() * 0.5;
        let mid_y = area.y0 + area.height() * 0.5;
        match self {
            Self::UpperLeft => Rect::new(area.x0, area.y0, mid_x, mid_y),
            Self::UpperRight => Rect::new(mid_x, area.y0, area.x1, mid_y),
            Self::BottomLeft => Rect::new(area.x0, mid_y, mid_x, area.y1),
            Self::BottomRight => Rect::new(mid_x, mid_y, area.x1, area.y1),
        }
    }
}

/// Identifier of a node in a tree's node arena.
///
/// Node ids are only meaningful for the tree that produced them and are invalidated
/// wholesale by [`LooseQuadTree::create`](crate::LooseQuadTree::create) and
/// [`LooseQuadTree::rebuild_tree`](crate::LooseQuadTree::rebuild_tree).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node arenas are bounded by the subdivision limit, far below u32::MAX."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Process-unique identity of a tree instance, stamped into every [`ItemKey`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TreeId(u32);

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(1);

impl TreeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Generational handle of an item registered in a [`LooseQuadTree`](crate::LooseQuadTree).
///
/// ## Semantics
///
/// - A key is issued by a successful insert and stays valid until the item is removed,
///   dropped by a failed reinsertion, or evicted.
/// - Freed slots are reused with a bumped generation, so stale keys never alias a new item.
/// - Keys carry the identity of the tree that issued them; any other tree treats them as foreign.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
    pub(crate) tree: TreeId,
}

impl ItemKey {
    /// A key no tree ever issues; every tree treats it as foreign.
    pub const DANGLING: Self = Self {
        slot: u32::MAX,
        generation: 0,
        tree: TreeId(0),
    };

    pub(crate) const fn idx(self) -> usize {
        self.slot as usize
    }
}

/// The capability record an owner registers with the tree.
///
/// `owner` is the back-reference used to resolve query results to higher-level objects
/// (a waypoint, a game entity, ...). The tree keeps its own copy of `bounds` and `visible`;
/// owners push changes through [`LooseQuadTree::set_bounds`](crate::LooseQuadTree::set_bounds)
/// and [`LooseQuadTree::set_visible`](crate::LooseQuadTree::set_visible).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialItem<P> {
    /// Current world-space bounds.
    pub bounds: Rect,
    /// Whether the item participates in visibility queries.
    pub visible: bool,
    /// Owner back-reference.
    pub owner: P,
}

impl<P> SpatialItem<P> {
    /// A visible item with the given bounds.
    pub const fn new(bounds: Rect, owner: P) -> Self {
        Self {
            bounds,
            visible: true,
            owner,
        }
    }

    /// Center of the bounds; insertion is decided by this point alone.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

/// Where an item currently lives: its leaf and its position in that leaf's item list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Owning leaf node.
    pub leaf: NodeId,
    /// Index into the leaf's item list.
    pub slot: usize,
}

/// Result of re-checking an item after its bounds changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome<P> {
    /// The bounds still fit the leaf's loose area; nothing moved.
    Kept,
    /// The item was reinserted from the top and now lives in `to`.
    Relocated {
        /// Previous leaf, if the item had one.
        from: Option<NodeId>,
        /// New leaf.
        to: NodeId,
    },
    /// No top-level node accepted the item's new center; it was removed from the tree.
    Dropped(P),
    /// The leaf's item list disagreed with the item's placement; the item was removed and
    /// its owner should be taken out of the scene.
    Evicted(P),
    /// The key is stale or belongs to another tree.
    Unknown,
}

impl<P> CheckOutcome<P> {
    /// True if the item is no longer tracked after this check.
    pub fn removed_item(&self) -> bool {
        matches!(self, Self::Dropped(_) | Self::Evicted(_))
    }
}
