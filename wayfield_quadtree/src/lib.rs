// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfield Quadtree: a Kurbo-native loose quad-tree.
//!
//! The tree covers a fixed rectangle with four top-level regions, each statically
//! subdivided to a configured depth. Items are registered with a bounding rectangle,
//! a visibility flag, and an owner payload, and are routed to the leaf whose strict
//! area contains their center.
//!
//! - Every region also has a *loose* area: the strict area grown by a slack margin.
//!   A moved item stays in its leaf while its bounds fit that loose area, so items
//!   hovering near a boundary do not bounce between neighbours.
//! - A flat registry mirrors the tree's contents. It backs enumeration, membership
//!   checks, and an optional brute-force query path.
//! - Items are addressed by generational [`ItemKey`]s that also record which tree
//!   issued them.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use wayfield_quadtree::{CheckOutcome, LooseQuadTree, QuadTreeConfig, SpatialItem};
//!
//! let mut tree = LooseQuadTree::with_config(QuadTreeConfig {
//!     width: 100.0,
//!     height: 100.0,
//!     extra_loose_width: 5.0,
//!     extra_loose_height: 5.0,
//!     subdivision_count: 3,
//!     ..Default::default()
//! });
//!
//! let key = tree
//!     .insert(SpatialItem::new(Rect::new(8.0, 8.0, 12.0, 12.0), "crate"))
//!     .unwrap();
//!
//! // A nudge that stays inside the leaf's loose area does not move the item.
//! assert_eq!(tree.set_bounds(key, Rect::new(11.0, 8.0, 15.0, 12.0)), CheckOutcome::Kept);
//!
//! // Query a viewport.
//! let mut hits = Vec::new();
//! tree.find_visible(&mut hits, Rect::new(0.0, 0.0, 20.0, 20.0));
//! assert_eq!(tree.owner(hits[0]), Some("crate"));
//! ```
//!
//! ## Queries
//!
//! - [`LooseQuadTree::find_visible`] prunes regions by loose area and returns every visible
//!   item of the surviving leaves. That superset is what a renderer wants; it skips the
//!   per-item test.
//! - [`LooseQuadTree::find_intersecting`] applies the exact per-item test as well.
//! - [`LooseQuadTree::set_use_brute_force`] switches `find_visible` to a registry scan with
//!   exact tests, useful to cross-check the tree.
//! - [`LooseQuadTree::contains_in`] asks whether any item in an area satisfies a predicate.
//!
//! ## Failure handling
//!
//! Invalid configs and use before [`LooseQuadTree::create`] are programmer errors and panic
//! ([`LooseQuadTree::try_create`] reports [`ConfigError`] instead). Missing items are
//! reported with `None`/`false`. [`LooseQuadTree::check_item`] never fails: an item that
//! leaves the covered area is removed and reported as [`CheckOutcome::Dropped`], and a leaf
//! whose bookkeeping disagrees with the item is repaired and the item reported as
//! [`CheckOutcome::Evicted`].
//!
//! With the `tracing` feature, relocations, drops, evictions and rebuilds emit `tracing` events.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
mod geom;
pub mod node;
mod registry;
pub mod tree;
pub mod types;

pub use config::{ConfigError, MAX_SUBDIVISION_COUNT, QuadTreeConfig};
pub use node::SpatialNode;
pub use tree::LooseQuadTree;
pub use types::{CheckOutcome, Corner, ItemKey, NodeId, Placement, SpatialItem};
