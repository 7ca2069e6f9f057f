// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests: the graph and the spatial index stay in lockstep under random edits.

use std::collections::BTreeSet;

use kurbo::{Point, Size};
use proptest::prelude::*;
use wayfield_waypoints::{MapEvent, WaypointId, WaypointMap};

const SIZE: f64 = 600.0;

#[derive(Clone, Debug)]
enum Op {
    Add(f64, f64),
    Connect(usize, usize),
    Move(usize, f64, f64),
    Remove(usize, bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0..SIZE, 0.0..SIZE).prop_map(|(x, y)| Op::Add(x, y)),
        (0..16_usize, 0..16_usize).prop_map(|(a, b)| Op::Connect(a, b)),
        (0..16_usize, -50.0..SIZE + 50.0, -50.0..SIZE + 50.0)
            .prop_map(|(i, x, y)| Op::Move(i, x, y)),
        (0..16_usize, any::<bool>()).prop_map(|(i, keep)| Op::Remove(i, keep)),
    ]
}

fn pick(ids: &[WaypointId], i: usize) -> Option<WaypointId> {
    (!ids.is_empty()).then(|| ids[i % ids.len()])
}

fn assert_lockstep(map: &WaypointMap) -> Result<(), TestCaseError> {
    let tree = map.quad_tree();
    prop_assert_eq!(tree.len(), map.waypoint_count());
    for (id, waypoint) in map.waypoints() {
        prop_assert_eq!(tree.owner(waypoint.item()), Some(id));
        let item = tree.item(waypoint.item()).expect("indexed");
        prop_assert!(item.center().distance(waypoint.position()) < 1e-6);
        prop_assert!(tree.leaf_of(waypoint.item()).is_some());
    }
    for segment in map.path_segments() {
        let from = map.waypoint(segment.from()).expect("live endpoint").position();
        let to = map.waypoint(segment.to()).expect("live endpoint").position();
        prop_assert!((segment.distance() - from.distance(to)).abs() < 1e-9);
    }
    Ok(())
}

proptest! {
    #[test]
    fn edits_keep_graph_and_index_in_lockstep(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut map = WaypointMap::new();
        let _ = map.initialize(Size::new(SIZE, SIZE), 4);
        let mut ids: Vec<WaypointId> = Vec::new();

        for op in ops {
            match op {
                Op::Add(x, y) => ids.push(map.add_waypoint(Point::new(x, y)).expect("inside")),
                Op::Connect(a, b) => {
                    if let (Some(a), Some(b)) = (pick(&ids, a), pick(&ids, b)) {
                        let _ = map.add_path_segment(a, b);
                    }
                }
                Op::Move(i, x, y) => {
                    if let Some(id) = pick(&ids, i) {
                        prop_assert!(map.set_waypoint_position(id, Point::new(x, y)));
                    }
                }
                Op::Remove(i, keep) => {
                    if let Some(id) = pick(&ids, i) {
                        prop_assert!(map.remove_waypoint(id, keep));
                        ids.retain(|&w| w != id);
                    }
                }
            }
            assert_lockstep(&map)?;
        }

        let evicted: Vec<MapEvent> = map
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, MapEvent::WaypointEvicted(_)))
            .collect();
        prop_assert!(evicted.is_empty());
    }

    #[test]
    fn preserving_removal_keeps_routes(
        points in prop::collection::vec((0.0..SIZE, 0.0..SIZE), 3..10),
        links in prop::collection::vec((0..10_usize, 0..10_usize), 0..30),
        victim in 0..10_usize,
    ) {
        let mut map = WaypointMap::new();
        let _ = map.initialize(Size::new(SIZE, SIZE), 3);
        let ids: Vec<WaypointId> = points
            .iter()
            .map(|&(x, y)| map.add_waypoint(Point::new(x, y)).expect("inside"))
            .collect();
        for (a, b) in links {
            let _ = map.add_path_segment(ids[a % ids.len()], ids[b % ids.len()]);
        }
        let victim = ids[victim % ids.len()];
        let routable = |map: &WaypointMap| -> BTreeSet<(WaypointId, WaypointId)> {
            let mut pairs = BTreeSet::new();
            for &a in &ids {
                for &b in &ids {
                    if a != b && a != victim && b != victim && map.find_route(a, b).is_some() {
                        pairs.insert((a, b));
                    }
                }
            }
            pairs
        };
        let before = routable(&map);
        prop_assert!(map.remove_waypoint(victim, true));
        prop_assert_eq!(routable(&map), before);
        assert_lockstep(&map)?;
    }
}
