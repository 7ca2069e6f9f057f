// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the loose quad-tree.
//!
//! 1. The exact tree walk and the brute-force scan return the same set.
//! 2. The loose walk returns a superset of the brute-force scan, including for items
//!    larger than the slack margin.
//! 3. Moves that stay inside the leaf's loose area never relocate.
//! 4. Every registered item is reachable from the leaf that owns its center.
//! 5. Insert followed by remove restores the empty state.

use std::collections::BTreeSet;

use kurbo::{Point, Rect, Vec2};
use proptest::prelude::*;
use wayfield_quadtree::{CheckOutcome, ItemKey, LooseQuadTree, QuadTreeConfig, SpatialItem};

const SIZE: f64 = 256.0;
const SLACK: f64 = 8.0;

fn tree(levels: u32) -> LooseQuadTree<usize> {
    tree_with_slack(levels, SLACK)
}

fn tree_with_slack(levels: u32, slack: f64) -> LooseQuadTree<usize> {
    LooseQuadTree::with_config(QuadTreeConfig {
        width: SIZE,
        height: SIZE,
        extra_loose_width: slack,
        extra_loose_height: slack,
        subdivision_count: levels,
        ..Default::default()
    })
}

/// Centers inside the tree and half-extents no larger than the slack.
fn item_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0..SIZE, 0.0..SIZE, 0.5..SLACK, 0.5..SLACK)
}

/// Centers inside the tree and half-extents up to five times the slack.
fn wide_item_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (0.0..SIZE, 0.0..SIZE, 0.5..SLACK * 5.0, 0.5..SLACK * 5.0)
}

fn slack_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(SLACK), 0.0..SLACK]
}

fn query_strategy() -> impl Strategy<Value = Rect> {
    (-20.0..SIZE, -20.0..SIZE, 1.0..120.0, 1.0..120.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

fn populate(tree: &mut LooseQuadTree<usize>, items: &[(f64, f64, f64, f64)]) -> Vec<ItemKey> {
    items
        .iter()
        .enumerate()
        .map(|(i, &(cx, cy, hw, hh))| {
            tree.insert(SpatialItem::new(
                Rect::new(cx - hw, cy - hh, cx + hw, cy + hh),
                i,
            ))
            .expect("centers are generated inside the tree")
        })
        .collect()
}

fn owners(tree: &LooseQuadTree<usize>, keys: Vec<ItemKey>) -> BTreeSet<usize> {
    keys.into_iter().filter_map(|k| tree.owner(k)).collect()
}

proptest! {
    #[test]
    fn exact_walk_matches_brute_force(
        items in prop::collection::vec(wide_item_strategy(), 0..64),
        query in query_strategy(),
        levels in 0_u32..5,
        slack in slack_strategy(),
    ) {
        let mut t = tree_with_slack(levels, slack);
        let _ = populate(&mut t, &items);

        let mut walked = Vec::new();
        t.find_intersecting(&mut walked, query);
        t.set_use_brute_force(true);
        let mut scanned = Vec::new();
        t.find_visible(&mut scanned, query);

        prop_assert_eq!(owners(&t, walked), owners(&t, scanned));
    }

    #[test]
    fn exact_walk_matches_brute_force_after_moves(
        items in prop::collection::vec(wide_item_strategy(), 1..48),
        moves in prop::collection::vec((0.0..SIZE, 0.0..SIZE), 1..48),
        query in query_strategy(),
        slack in slack_strategy(),
    ) {
        let mut t = tree_with_slack(3, slack);
        let keys = populate(&mut t, &items);
        for (key, (x, y)) in keys.iter().zip(moves) {
            let bounds = t.item(*key).expect("registered").bounds;
            let _ = t.set_bounds(*key, bounds + (Point::new(x, y) - bounds.center()));
        }

        let mut walked = Vec::new();
        t.find_intersecting(&mut walked, query);
        t.set_use_brute_force(true);
        let mut scanned = Vec::new();
        t.find_visible(&mut scanned, query);

        prop_assert_eq!(owners(&t, walked), owners(&t, scanned));
    }

    #[test]
    fn loose_walk_is_a_superset(
        items in prop::collection::vec(wide_item_strategy(), 0..64),
        query in query_strategy(),
        levels in 0_u32..5,
        slack in slack_strategy(),
    ) {
        let mut t = tree_with_slack(levels, slack);
        let _ = populate(&mut t, &items);

        let mut loose = Vec::new();
        t.find_visible(&mut loose, query);
        t.set_use_brute_force(true);
        let mut exact = Vec::new();
        t.find_visible(&mut exact, query);

        let loose = owners(&t, loose);
        let exact = owners(&t, exact);
        prop_assert!(exact.is_subset(&loose), "exact={:?} loose={:?}", exact, loose);
    }

    #[test]
    fn moves_within_loose_area_keep_the_leaf(
        (cx, cy, hw, hh) in item_strategy(),
        (dx, dy) in (-0.99..0.99_f64, -0.99..0.99_f64),
    ) {
        let mut t = tree(4);
        let key = t
            .insert(SpatialItem::new(Rect::new(cx - hw, cy - hh, cx + hw, cy + hh), 0))
            .expect("inside");
        let leaf = t.leaf_of(key).expect("placed");
        let loose = t.node(leaf).loose_area();
        let bounds = t.item(key).expect("registered").bounds;

        // Scale the step so the moved bounds stay inside the loose area.
        let room_x = if dx < 0.0 { bounds.x0 - loose.x0 } else { loose.x1 - bounds.x1 };
        let room_y = if dy < 0.0 { bounds.y0 - loose.y0 } else { loose.y1 - bounds.y1 };
        let step = Vec2::new(dx * room_x.max(0.0), dy * room_y.max(0.0));

        prop_assert_eq!(t.set_bounds(key, bounds + step), CheckOutcome::Kept);
        prop_assert_eq!(t.leaf_of(key), Some(leaf));
    }

    #[test]
    fn every_item_lives_where_its_center_routes(
        items in prop::collection::vec(item_strategy(), 1..48),
        moves in prop::collection::vec((0.0..SIZE, 0.0..SIZE), 1..48),
    ) {
        let mut t = tree(4);
        let keys = populate(&mut t, &items);
        for (key, (x, y)) in keys.iter().zip(moves) {
            let bounds = t.item(*key).expect("registered").bounds;
            let moved = bounds + (Point::new(x, y) - bounds.center());
            let outcome = t.set_bounds(*key, moved);
            prop_assert!(!outcome.removed_item());
        }
        for &key in &keys {
            prop_assert!(t.contains(key));
            let leaf = t.leaf_of(key).expect("placed");
            let node = t.node(leaf);
            prop_assert!(node.items().contains(&key));
            let bounds = t.item(key).expect("registered").bounds;
            prop_assert!(
                t.leaf_at(bounds.center()) == Some(leaf)
                    || (node.loose_area().x0 <= bounds.x0
                        && node.loose_area().y0 <= bounds.y0
                        && bounds.x1 <= node.loose_area().x1
                        && bounds.y1 <= node.loose_area().y1),
                "item must sit in its center's leaf or within the loose area of its leaf"
            );
        }
        prop_assert_eq!(t.len(), keys.len());
    }

    #[test]
    fn insert_remove_round_trip(items in prop::collection::vec(item_strategy(), 1..32)) {
        let mut t = tree(3);
        let keys = populate(&mut t, &items);
        prop_assert_eq!(t.len(), items.len());
        for key in keys {
            prop_assert!(t.remove(key));
            prop_assert_eq!(t.leaf_of(key), None);
        }
        prop_assert!(t.is_empty());
        let mut out = Vec::new();
        t.find_visible(&mut out, t.area());
        prop_assert!(out.is_empty());
    }
}
