// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loose quad-tree: top-level regions, the flat registry, and the operations over both.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::{ConfigError, QuadTreeConfig};
use crate::geom::intersects;
use crate::node::{NodeArena, SpatialNode};
use crate::registry::Registry;
use crate::types::{CheckOutcome, Corner, ItemKey, NodeId, Placement, SpatialItem, TreeId};

/// Loose quad-tree over items with owner payloads `P`.
///
/// ## Lifecycle
///
/// - [`LooseQuadTree::new`] gives an uninitialized tree; [`LooseQuadTree::create`] (or
///   [`LooseQuadTree::with_config`]) builds the four top-level regions and empties the registry.
/// - Inserting into or removing from an uninitialized tree is a contract violation and panics.
/// - [`LooseQuadTree::rebuild_tree`] rebuilds the regions from the current config and
///   reinserts every registered item, keeping their keys.
///
/// ## Moving items
///
/// Owners report new bounds through [`LooseQuadTree::set_bounds`]. The item stays in its
/// leaf while the bounds fit the leaf's loose area; otherwise it is reinserted from the top.
///
/// Mutating the tree while iterating query results is impossible through the borrow
/// checker; all operations are synchronous and single-threaded.
pub struct LooseQuadTree<P> {
    id: TreeId,
    config: QuadTreeConfig,
    nodes: NodeArena,
    top: Option<[NodeId; 4]>,
    registry: Registry<P>,
    /// Largest distance any placed item reached past its leaf's loose area, per axis.
    overhang: Vec2,
    use_brute_force: bool,
}

impl<P> core::fmt::Debug for LooseQuadTree<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LooseQuadTree")
            .field("config", &self.config)
            .field("initialized", &self.top.is_some())
            .field("nodes", &self.nodes.len())
            .field("items", &self.registry.len())
            .field("use_brute_force", &self.use_brute_force)
            .finish_non_exhaustive()
    }
}

impl<P: Copy> Default for LooseQuadTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy> LooseQuadTree<P> {
    /// Create an uninitialized tree.
    pub fn new() -> Self {
        let id = TreeId::next();
        Self {
            id,
            config: QuadTreeConfig::default(),
            nodes: NodeArena::default(),
            top: None,
            registry: Registry::new(id),
            overhang: Vec2::ZERO,
            use_brute_force: false,
        }
    }

    /// Create and build a tree.
    ///
    /// Panics if `config` fails [`QuadTreeConfig::validate`].
    pub fn with_config(config: QuadTreeConfig) -> Self {
        let mut tree = Self::new();
        tree.create(config);
        tree
    }

    /// (Re)build the four top-level regions from `config` and empty the registry.
    ///
    /// Panics if `config` fails [`QuadTreeConfig::validate`]; see [`Self::try_create`].
    pub fn create(&mut self, config: QuadTreeConfig) {
        if let Err(err) = self.try_create(config) {
            panic!("invalid quad-tree config: {err}");
        }
    }

    /// Fallible form of [`Self::create`]. The tree is untouched on error.
    pub fn try_create(&mut self, config: QuadTreeConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config.normalized();
        self.registry.clear();
        self.registry.reserve(self.config.item_count_hint);
        self.build_regions();
        Ok(())
    }

    fn build_regions(&mut self) {
        let total = self.config.total_area();
        let slack = (self.config.extra_loose_width, self.config.extra_loose_height);
        let below_top = self.config.subdivision_count.saturating_sub(1);
        self.nodes.clear();
        self.overhang = Vec2::ZERO;
        let nodes = &mut self.nodes;
        self.top =
            Some(Corner::ALL.map(|c| nodes.build(c.quadrant_of(total), below_top, c, None, slack)));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = self.nodes.len(),
            levels = self.config.subdivision_count,
            "quad-tree regions built"
        );
    }

    /// Rebuild the regions from the current config and reinsert every item.
    ///
    /// Keys stay valid. Items whose center no longer lies inside the covered area are
    /// removed; their owners are returned.
    pub fn rebuild_tree(&mut self) -> Vec<P> {
        self.assert_initialized();
        let keys = self.registry.keys();
        self.build_regions();
        let mut dropped = Vec::new();
        for key in keys {
            let Some(entry) = self.registry.get_mut(key) else {
                continue;
            };
            entry.placement = None;
            let center = entry.item.center();
            match self.top_level_leaf(center) {
                Some(leaf) => self.place(key, leaf),
                None => {
                    if let Some(entry) = self.registry.remove(key) {
                        dropped.push(entry.item.owner);
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            items = self.registry.len(),
            dropped = dropped.len(),
            "quad-tree rebuilt"
        );
        dropped
    }

    /// Move or resize the covered area and rebuild. See [`Self::rebuild_tree`].
    pub fn set_bounds_and_rebuild(
        &mut self,
        offset: Point,
        size: Size,
    ) -> Result<Vec<P>, ConfigError> {
        self.reconfigure(QuadTreeConfig {
            offset,
            width: size.width,
            height: size.height,
            ..self.config
        })
    }

    /// Change the level count and rebuild. See [`Self::rebuild_tree`].
    pub fn set_subdivision_count(&mut self, subdivision_count: u32) -> Result<Vec<P>, ConfigError> {
        self.reconfigure(QuadTreeConfig {
            subdivision_count,
            ..self.config
        })
    }

    /// Change the slack margins and rebuild. Negative values act as 0.
    pub fn set_extra_loose(&mut self, width: f64, height: f64) -> Result<Vec<P>, ConfigError> {
        self.reconfigure(QuadTreeConfig {
            extra_loose_width: width,
            extra_loose_height: height,
            ..self.config
        })
    }

    fn reconfigure(&mut self, config: QuadTreeConfig) -> Result<Vec<P>, ConfigError> {
        config.validate()?;
        self.config = config.normalized();
        Ok(self.rebuild_tree())
    }

    /// Insert an item. Returns `None` if its center lies outside the covered area.
    ///
    /// Panics if the tree is not initialized.
    pub fn insert(&mut self, item: SpatialItem<P>) -> Option<ItemKey> {
        self.assert_initialized();
        let leaf = self.top_level_leaf(item.center())?;
        let key = self.registry.insert(item);
        self.place(key, leaf);
        Some(key)
    }

    /// Remove an item. Returns `false` for stale or foreign keys.
    ///
    /// Panics if the tree is not initialized.
    pub fn remove(&mut self, key: ItemKey) -> bool {
        self.assert_initialized();
        let Some(entry) = self.registry.remove(key) else {
            return false;
        };
        if let Some(placement) = entry.placement {
            self.unplace(placement, key);
        }
        true
    }

    /// Remove every item; outstanding keys become stale.
    pub fn remove_all(&mut self) {
        if let Some(top) = self.top {
            let registry = &mut self.registry;
            for node in top {
                self.nodes.remove_all(node, &mut |key| {
                    if let Some(entry) = registry.get_mut(key) {
                        entry.placement = None;
                    }
                });
            }
        }
        self.registry.clear();
        self.overhang = Vec2::ZERO;
    }

    /// Update an item's bounds, then [`check`](Self::check_item) it.
    pub fn set_bounds(&mut self, key: ItemKey, bounds: Rect) -> CheckOutcome<P> {
        let Some(entry) = self.registry.get_mut(key) else {
            return CheckOutcome::Unknown;
        };
        entry.item.bounds = bounds;
        self.check_item(key)
    }

    /// Update an item's visibility flag. Returns `false` for stale or foreign keys.
    pub fn set_visible(&mut self, key: ItemKey, visible: bool) -> bool {
        match self.registry.get_mut(key) {
            Some(entry) => {
                entry.item.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Re-check an item whose bounds changed.
    ///
    /// Bounds that still fit the leaf's loose area leave the item alone. Otherwise the
    /// item leaves its leaf and is reinserted from the top; if no region accepts its
    /// new center it is removed ([`CheckOutcome::Dropped`]). A leaf whose item list
    /// disagrees with the item's placement evicts the item ([`CheckOutcome::Evicted`]).
    pub fn check_item(&mut self, key: ItemKey) -> CheckOutcome<P> {
        let Some(entry) = self.registry.get(key) else {
            return CheckOutcome::Unknown;
        };
        let (bounds, owner, placement) = (entry.item.bounds, entry.item.owner, entry.placement);
        let from = match placement {
            Some(placement) => {
                if self.nodes.still_fits(placement.leaf, bounds) {
                    return CheckOutcome::Kept;
                }
                match self.nodes.detach(placement, key) {
                    Ok(Some(moved)) => self.set_placement(moved, placement),
                    Ok(None) => {}
                    Err(_) => return self.evict(key, owner, placement.leaf),
                }
                Some(placement.leaf)
            }
            None => None,
        };
        if let Some(entry) = self.registry.get_mut(key) {
            entry.placement = None;
        }
        self.reinsert(key, from, bounds.center(), owner)
    }

    fn reinsert(
        &mut self,
        key: ItemKey,
        from: Option<NodeId>,
        center: Point,
        owner: P,
    ) -> CheckOutcome<P> {
        match self.top_level_leaf(center) {
            Some(to) => {
                self.place(key, to);
                #[cfg(feature = "tracing")]
                tracing::trace!(?key, ?from, ?to, "item relocated");
                CheckOutcome::Relocated { from, to }
            }
            None => {
                self.registry.remove(key);
                #[cfg(feature = "tracing")]
                tracing::warn!(?key, x = center.x, y = center.y, "item left the tree and was dropped");
                CheckOutcome::Dropped(owner)
            }
        }
    }

    fn evict(&mut self, key: ItemKey, owner: P, leaf: NodeId) -> CheckOutcome<P> {
        self.registry.remove(key);
        self.purge(key, leaf);
        #[cfg(feature = "tracing")]
        tracing::error!(?key, "leaf slot disagrees with item placement; item evicted");
        CheckOutcome::Evicted(owner)
    }

    /// Append visible items in `query` to `out`.
    ///
    /// With brute force enabled this scans the registry and tests each item's exact
    /// bounds. Otherwise it walks the regions, pruning by loose area, and takes every
    /// visible item of each surviving leaf without a per-item test: a superset that is
    /// good enough for drawing. The superset always contains the brute-force set. Use [`Self::find_intersecting`] when exact results matter.
    pub fn find_visible(&self, out: &mut Vec<ItemKey>, query: Rect) {
        if self.use_brute_force {
            self.brute_force(out, query);
            return;
        }
        self.walk(out, query, false);
    }

    /// Append visible items whose bounds intersect `query` to `out`.
    ///
    /// Same result set as the brute-force path of [`Self::find_visible`], in tree order.
    /// Items larger than the slack margin may overhang their leaf's loose area; the walk
    /// widens its pruning rectangle by the largest such overhang so they are not missed.
    pub fn find_intersecting(&self, out: &mut Vec<ItemKey>, query: Rect) {
        if self.use_brute_force {
            self.brute_force(out, query);
            return;
        }
        self.walk(out, query, true);
    }

    fn brute_force(&self, out: &mut Vec<ItemKey>, query: Rect) {
        out.extend(
            self.registry
                .iter()
                .filter(|(_, e)| e.item.visible && intersects(e.item.bounds, query))
                .map(|(k, _)| k),
        );
    }

    fn walk(&self, out: &mut Vec<ItemKey>, query: Rect, exact: bool) {
        if let Some(top) = self.top {
            let reach = self.reach(query);
            for node in top {
                self.nodes
                    .find_visible(node, reach, query, &self.registry, exact, out);
            }
        }
    }

    /// True if `key` is registered here and placed in one of this tree's leaves.
    pub fn contains(&self, key: ItemKey) -> bool {
        self.registry
            .get(key)
            .is_some_and(|e| e.placement.is_some())
    }

    /// True if any visible item intersecting `query` satisfies `predicate`.
    pub fn contains_in(
        &self,
        query: Rect,
        mut predicate: impl FnMut(ItemKey, &SpatialItem<P>) -> bool,
    ) -> bool {
        let Some(top) = self.top else {
            return false;
        };
        let reach = self.reach(query);
        top.iter().any(|&node| {
            self.nodes
                .contains_item(node, reach, query, &self.registry, &mut predicate)
        })
    }

    /// The leaf that would accept an item centered at `point`.
    pub fn leaf_at(&self, point: Point) -> Option<NodeId> {
        self.top_level_leaf(point)
    }

    // --- accessors ---

    /// True once [`Self::create`] has run.
    pub fn is_initialized(&self) -> bool {
        self.top.is_some()
    }

    /// The normalized config the regions were built from.
    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    /// Full covered area.
    pub fn area(&self) -> Rect {
        self.config.total_area()
    }

    /// Whether [`Self::find_visible`] scans the registry instead of walking regions.
    pub fn use_brute_force(&self) -> bool {
        self.use_brute_force
    }

    /// Select the [`Self::find_visible`] strategy.
    pub fn set_use_brute_force(&mut self, enabled: bool) {
        self.use_brute_force = enabled;
    }

    /// The item record for `key`.
    pub fn item(&self, key: ItemKey) -> Option<&SpatialItem<P>> {
        self.registry.get(key).map(|e| &e.item)
    }

    /// Owner back-reference for `key`.
    pub fn owner(&self, key: ItemKey) -> Option<P> {
        self.item(key).map(|item| item.owner)
    }

    /// Where `key` currently lives.
    pub fn placement(&self, key: ItemKey) -> Option<Placement> {
        self.registry.get(key).and_then(|e| e.placement)
    }

    /// Leaf currently owning `key`.
    pub fn leaf_of(&self, key: ItemKey) -> Option<NodeId> {
        self.placement(key).map(|p| p.leaf)
    }

    /// Region by id. Panics on an id from another build of the tree that is out of range.
    pub fn node(&self, id: NodeId) -> &SpatialNode {
        self.nodes.get(id)
    }

    /// The four top-level regions in [`Corner::ALL`] order.
    pub fn top_nodes(&self) -> Option<[NodeId; 4]> {
        self.top
    }

    /// Total number of regions.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no item is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Every registered item, in registry slot order.
    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &SpatialItem<P>)> + '_ {
        self.registry.iter().map(|(k, e)| (k, &e.item))
    }

    // --- internals ---

    fn assert_initialized(&self) {
        assert!(
            self.top.is_some(),
            "quad-tree used before create() was called"
        );
    }

    fn reach(&self, query: Rect) -> Rect {
        query.inflate(self.overhang.x, self.overhang.y)
    }

    fn top_level_leaf(&self, center: Point) -> Option<NodeId> {
        self.top?
            .iter()
            .find_map(|&node| self.nodes.accepting_leaf(node, center))
    }

    fn place(&mut self, key: ItemKey, leaf: NodeId) {
        if let Some(entry) = self.registry.get(key) {
            let overhang = self.nodes.overhang(leaf, entry.item.bounds);
            self.overhang = Vec2::new(
                self.overhang.x.max(overhang.x),
                self.overhang.y.max(overhang.y),
            );
        }
        let placement = self.nodes.attach(leaf, key);
        self.set_placement(key, placement);
    }

    fn unplace(&mut self, placement: Placement, key: ItemKey) {
        match self.nodes.detach(placement, key) {
            Ok(Some(moved)) => self.set_placement(moved, placement),
            Ok(None) => {}
            Err(_) => self.purge(key, placement.leaf),
        }
    }

    /// Drop every occurrence of `key` from the leaves and re-derive the slots of the
    /// items that share those leaves (and `suspect`, whose order is already untrusted).
    fn purge(&mut self, key: ItemKey, suspect: NodeId) {
        let mut leaves = self.nodes.purge(key);
        leaves.push(suspect);
        for leaf in leaves {
            if leaf.idx() >= self.nodes.len() {
                continue;
            }
            let items = self.nodes.get(leaf).items().to_vec();
            for (slot, item) in items.into_iter().enumerate() {
                self.set_placement(item, Placement { leaf, slot });
            }
        }
    }

    fn set_placement(&mut self, key: ItemKey, placement: Placement) {
        if let Some(entry) = self.registry.get_mut(key) {
            entry.placement = Some(placement);
        }
    }
}
