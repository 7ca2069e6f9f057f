// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoints, path segments, and the records the map hands out.

use alloc::vec::Vec;

use kurbo::{Line, Point};
use wayfield_graph::{EdgeId, VertexId};
use wayfield_quadtree::ItemKey;

/// Handle to a waypoint of a [`WaypointMap`](crate::WaypointMap).
pub type WaypointId = VertexId;

/// Handle to a directed path segment of a [`WaypointMap`](crate::WaypointMap).
pub type PathSegmentId = EdgeId;

/// Maps a segment's distance to its traversal weight.
pub type WeightModifier = fn(f64) -> f64;

/// A navigation point. Owned by the map; change it through the map's setters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub(crate) position: Point,
    pub(crate) floor: u32,
    pub(crate) item: ItemKey,
}

impl Waypoint {
    /// Position in map coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Floor index, below the map's `floor_count`.
    pub fn floor(&self) -> u32 {
        self.floor
    }

    /// The spatial item registered for this waypoint.
    pub fn item(&self) -> ItemKey {
        self.item
    }
}

/// Payload of a directed path segment.
///
/// Distance and line are not stored; they are derived from the endpoints on read.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PathSegment {
    /// Optional mapping from distance to weight. Without one, weight equals distance.
    pub weight_modifier: Option<WeightModifier>,
}

impl PathSegment {
    /// Weight for a segment of length `distance`.
    pub fn weight_for(&self, distance: f64) -> f64 {
        match self.weight_modifier {
            Some(modifier) => modifier(distance),
            None => distance,
        }
    }
}

/// Read view of a path segment, computed from the current endpoint positions.
#[derive(Copy, Clone, Debug)]
pub struct PathSegmentRef<'a> {
    pub(crate) id: PathSegmentId,
    pub(crate) from: WaypointId,
    pub(crate) to: WaypointId,
    pub(crate) line: Line,
    pub(crate) segment: &'a PathSegment,
}

impl<'a> PathSegmentRef<'a> {
    /// Segment handle.
    pub fn id(&self) -> PathSegmentId {
        self.id
    }

    /// Waypoint the segment leaves.
    pub fn from(&self) -> WaypointId {
        self.from
    }

    /// Waypoint the segment arrives at.
    pub fn to(&self) -> WaypointId {
        self.to
    }

    /// Straight line between the endpoint positions.
    pub fn line(&self) -> Line {
        self.line
    }

    /// Euclidean distance between the endpoints.
    pub fn distance(&self) -> f64 {
        self.line.p0.distance(self.line.p1)
    }

    /// Traversal weight: the distance, passed through the modifier if one is set.
    pub fn weight(&self) -> f64 {
        self.segment.weight_for(self.distance())
    }

    /// The stored payload.
    pub fn segment(&self) -> &'a PathSegment {
        self.segment
    }
}

/// A route found by [`WaypointMap::find_route`](crate::WaypointMap::find_route).
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Waypoints from start to goal, both included.
    pub waypoints: Vec<WaypointId>,
    /// Segments taken, one fewer than `waypoints`.
    pub segments: Vec<PathSegmentId>,
    /// Sum of segment weights.
    pub cost: f64,
}

/// Changes recorded by the map, drained with
/// [`WaypointMap::drain_events`](crate::WaypointMap::drain_events).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MapEvent {
    /// A waypoint was added.
    WaypointAdded(WaypointId),
    /// A waypoint was removed on request.
    WaypointRemoved(WaypointId),
    /// A waypoint moved.
    WaypointMoved {
        /// The waypoint.
        id: WaypointId,
        /// Previous position.
        from: Point,
        /// New position.
        to: Point,
    },
    /// A waypoint was removed because the spatial index lost track of it.
    WaypointEvicted(WaypointId),
    /// A path segment was added, including bridges created by a cut.
    PathSegmentAdded(PathSegmentId),
    /// A path segment was removed, directly or with one of its endpoints.
    PathSegmentRemoved(PathSegmentId),
    /// A path segment's weight may have changed.
    PathSegmentWeightChanged(PathSegmentId),
}
