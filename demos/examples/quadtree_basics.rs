// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loose quad-tree basics.
//!
//! Insert a few crates, nudge one inside its leaf's loose area, push another across
//! the map, and query a viewport.
//!
//! Run:
//! - `cargo run -p wayfield_demos --example quadtree_basics`

use kurbo::{Rect, Vec2};
use wayfield_quadtree::{CheckOutcome, LooseQuadTree, QuadTreeConfig, SpatialItem};

fn main() {
    let mut tree = LooseQuadTree::with_config(QuadTreeConfig {
        width: 800.0,
        height: 600.0,
        extra_loose_width: 20.0,
        extra_loose_height: 20.0,
        subdivision_count: 3,
        ..Default::default()
    });
    println!("built {} regions", tree.node_count());

    let crate_a = tree
        .insert(SpatialItem::new(Rect::new(90.0, 90.0, 110.0, 110.0), "crate a"))
        .unwrap();
    let crate_b = tree
        .insert(SpatialItem::new(Rect::new(500.0, 400.0, 530.0, 430.0), "crate b"))
        .unwrap();

    // A small move stays within the loose area and keeps the leaf.
    let bounds = tree.item(crate_a).unwrap().bounds;
    let outcome = tree.set_bounds(crate_a, bounds + Vec2::new(15.0, 0.0));
    println!("nudge crate a: {outcome:?}");
    assert_eq!(outcome, CheckOutcome::Kept);

    // A long move relocates.
    let bounds = tree.item(crate_b).unwrap().bounds;
    let outcome = tree.set_bounds(crate_b, bounds - Vec2::new(380.0, 300.0));
    println!("push crate b: {outcome:?}");
    assert!(matches!(outcome, CheckOutcome::Relocated { .. }));

    let mut hits = Vec::new();
    tree.find_intersecting(&mut hits, Rect::new(0.0, 0.0, 200.0, 200.0));
    let owners: Vec<_> = hits.iter().filter_map(|&k| tree.owner(k)).collect();
    println!("in the top-left corner: {owners:?}");
    assert_eq!(owners.len(), 2);

    // Pushing an item off the map drops it.
    let outcome = tree.set_bounds(crate_a, Rect::new(-50.0, -50.0, -30.0, -30.0));
    println!("push crate a off the map: {outcome:?}");
    assert_eq!(outcome, CheckOutcome::Dropped("crate a"));
    assert_eq!(tree.len(), 1);
}
