// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoint map basics.
//!
//! Lay out a corridor of waypoints, move one, route across it, then remove the middle
//! waypoint while keeping the route alive.
//!
//! Run:
//! - `cargo run -p wayfield_demos --example waypoint_map_basics`

use kurbo::{Point, Rect, Size};
use wayfield_waypoints::{MapConfig, WaypointMap};

fn main() {
    let mut map = WaypointMap::with_config(MapConfig {
        floor_count: 2,
        ..Default::default()
    });
    map.initialize(Size::new(1024.0, 1024.0), 4);

    let hall = map.add_waypoint(Point::new(100.0, 100.0)).unwrap();
    let door = map.add_waypoint(Point::new(300.0, 100.0)).unwrap();
    let stairs = map.add_waypoint(Point::new(300.0, 400.0)).unwrap();
    for (from, to) in [(hall, door), (door, hall), (door, stairs), (stairs, door)] {
        map.add_path_segment(from, to).unwrap();
    }
    map.set_waypoint_floor(stairs, 1);

    let route = map.find_route(hall, stairs).unwrap();
    println!("route hall -> stairs costs {:.1}", route.cost);

    // Moving the door lengthens both segments touching it.
    map.set_waypoint_position(door, Point::new(300.0, 250.0));
    let route = map.find_route(hall, stairs).unwrap();
    println!("after moving the door: {:.1}", route.cost);

    for event in map.drain_events() {
        println!("event: {event:?}");
    }

    // Removing the door but keeping its routes links hall and stairs directly.
    map.remove_waypoint(door, true);
    let direct = map.path_segment(hall, stairs).unwrap();
    let segment = map.segment(direct).unwrap();
    println!(
        "hall -> stairs now direct: {:.1} along {:?}",
        segment.distance(),
        segment.line()
    );

    let upstairs = map.waypoints_in_on_floor(Rect::new(0.0, 0.0, 512.0, 512.0), 1);
    println!("waypoints on floor 1 near the origin: {upstairs:?}");
    assert_eq!(upstairs, [stairs]);
}
