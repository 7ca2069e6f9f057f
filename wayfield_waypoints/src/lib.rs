// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfield Waypoints: a navigation map of waypoints and directed path segments.
//!
//! [`WaypointMap`] owns a [`wayfield_graph::Graph`] of waypoints and a
//! [`wayfield_quadtree::LooseQuadTree`] indexing them, and keeps the two consistent:
//! adding, moving and removing waypoints updates both, and spatial queries map tree
//! items back to waypoints.
//!
//! - Segments are directed. `has_path_segment_to(a, b)` says nothing about `b -> a`.
//! - Segment distance, weight and line are computed from the endpoints when read.
//! - Removing a waypoint with `preserve_path` bridges its neighbours first.
//! - Changes are recorded as [`MapEvent`]s and collected with [`WaypointMap::drain_events`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use wayfield_waypoints::WaypointMap;
//!
//! let mut map = WaypointMap::new();
//! map.initialize(Size::new(512.0, 512.0), 4);
//!
//! let a = map.add_waypoint(Point::new(0.0, 0.0)).unwrap();
//! let b = map.add_waypoint(Point::new(10.0, 0.0)).unwrap();
//! let ab = map.add_path_segment(a, b).unwrap();
//! assert_eq!(map.segment(ab).unwrap().distance(), 10.0);
//!
//! map.set_waypoint_position(b, Point::new(10.0, 10.0));
//! assert!((map.segment(ab).unwrap().distance() - 200_f64.sqrt()).abs() < 1e-9);
//!
//! let near = map.waypoints_in(Rect::new(0.0, 0.0, 32.0, 32.0));
//! assert!(near.contains(&a) && near.contains(&b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod map;
mod types;

pub use config::{MapConfig, MapError};
pub use map::WaypointMap;
pub use types::{
    MapEvent, PathSegment, PathSegmentId, PathSegmentRef, Route, Waypoint, WaypointId,
    WeightModifier,
};
