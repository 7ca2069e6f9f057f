// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The waypoint map: a path graph and a loose quad-tree kept in lockstep.

use alloc::vec::Vec;

use kurbo::{Line, Point, Rect, Size};
use wayfield_graph::{Graph, RemovedVertex};
use wayfield_quadtree::{CheckOutcome, ItemKey, LooseQuadTree, QuadTreeConfig, SpatialItem};

use crate::config::{MapConfig, MapError};
use crate::types::{
    MapEvent, PathSegment, PathSegmentId, PathSegmentRef, Route, Waypoint, WaypointId,
    WeightModifier,
};

/// Waypoints connected by directed path segments, indexed spatially.
///
/// Every waypoint owns exactly one item in the map's quad-tree, centred on its
/// position, and every item belongs to a waypoint. Segment distance, weight and
/// line are derived from the endpoints whenever they are read, so moving a waypoint
/// never leaves stale geometry behind; the map records
/// [`MapEvent::PathSegmentWeightChanged`] for each affected segment instead.
///
/// The map must be [initialized](Self::initialize) before waypoints are added.
pub struct WaypointMap {
    config: MapConfig,
    graph: Graph<Waypoint, PathSegment>,
    tree: LooseQuadTree<WaypointId>,
    events: Vec<MapEvent>,
}

impl core::fmt::Debug for WaypointMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaypointMap")
            .field("config", &self.config)
            .field("initialized", &self.tree.is_initialized())
            .field("waypoints", &self.graph.vertex_count())
            .field("path_segments", &self.graph.edge_count())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Default for WaypointMap {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointMap {
    /// Create an empty, uninitialized map with [`MapConfig::default`].
    pub fn new() -> Self {
        Self {
            config: MapConfig::default(),
            graph: Graph::new(),
            tree: LooseQuadTree::new(),
            events: Vec::new(),
        }
    }

    /// Create an empty, uninitialized map.
    ///
    /// Panics if `config` fails [`MapConfig::validate`].
    pub fn with_config(config: MapConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid map config: {err}");
        }
        Self {
            config,
            ..Self::new()
        }
    }

    /// Span the spatial index over `map_size` with `subdivision_count` levels.
    ///
    /// Existing waypoints are re-indexed; those outside the new area are removed and
    /// returned. Panics on a size or depth the quad-tree rejects; see
    /// [`Self::try_initialize`].
    pub fn initialize(&mut self, map_size: Size, subdivision_count: u32) -> Vec<WaypointId> {
        match self.try_initialize(map_size, subdivision_count) {
            Ok(removed) => removed,
            Err(err) => panic!("cannot initialize waypoint map: {err}"),
        }
    }

    /// Fallible form of [`Self::initialize`]. The map is untouched on error.
    pub fn try_initialize(
        &mut self,
        map_size: Size,
        subdivision_count: u32,
    ) -> Result<Vec<WaypointId>, MapError> {
        let tree_config = QuadTreeConfig {
            extra_loose_width: self.config.loose_margin,
            extra_loose_height: self.config.loose_margin,
            subdivision_count,
            item_count_hint: self.graph.vertex_count(),
            ..QuadTreeConfig::with_size(map_size)
        };
        self.tree.try_create(tree_config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            width = map_size.width,
            height = map_size.height,
            subdivision_count,
            waypoints = self.graph.vertex_count(),
            "waypoint map initialized"
        );

        let ids: Vec<WaypointId> = self.graph.vertices().collect();
        let mut removed = Vec::new();
        for id in ids {
            let Some(position) = self.graph.vertex(id).map(|w| w.position) else {
                continue;
            };
            let item = self.spatial_item(id, position);
            match self.tree.insert(item) {
                Some(item) => {
                    if let Some(w) = self.graph.vertex_mut(id) {
                        w.item = item;
                    }
                }
                None => {
                    if let Some(vertex) = self.graph.remove_vertex(id) {
                        self.forget(vertex, MapEvent::WaypointRemoved(id), false);
                    }
                    removed.push(id);
                }
            }
        }
        Ok(removed)
    }

    /// True once [`Self::initialize`] has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.tree.is_initialized()
    }

    /// The map's configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Area covered by the spatial index.
    pub fn area(&self) -> Rect {
        self.tree.area()
    }

    /// The spatial index, for inspection.
    pub fn quad_tree(&self) -> &LooseQuadTree<WaypointId> {
        &self.tree
    }

    /// Add a waypoint on floor 0.
    ///
    /// Fails with [`MapError::OutOfBounds`] if `position` lies outside the map area.
    /// Panics if the map is not initialized.
    pub fn add_waypoint(&mut self, position: Point) -> Result<WaypointId, MapError> {
        assert!(
            self.tree.is_initialized(),
            "waypoint map used before initialize() was called"
        );
        if self.tree.leaf_at(position).is_none() {
            return Err(MapError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        let position = self.fit_position(position);
        let id = self.graph.add_vertex(Waypoint {
            position,
            floor: 0,
            item: ItemKey::DANGLING,
        });
        let item = self.spatial_item(id, position);
        let Some(item) = self.tree.insert(item) else {
            let _ = self.graph.remove_vertex(id);
            return Err(MapError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        };
        if let Some(w) = self.graph.vertex_mut(id) {
            w.item = item;
        }
        self.events.push(MapEvent::WaypointAdded(id));
        Ok(id)
    }

    /// Add a directed segment from `from` to `to`.
    pub fn add_path_segment(
        &mut self,
        from: WaypointId,
        to: WaypointId,
    ) -> Result<PathSegmentId, MapError> {
        let id = self.graph.add_edge(from, to, PathSegment::default())?;
        self.events.push(MapEvent::PathSegmentAdded(id));
        Ok(id)
    }

    /// Remove a waypoint and its segments.
    ///
    /// With `preserve_path`, every predecessor is first linked to every successor so
    /// that routes through the waypoint survive: `A -> X -> B` becomes `A -> B`.
    /// Returns `false` for unknown ids.
    pub fn remove_waypoint(&mut self, id: WaypointId, preserve_path: bool) -> bool {
        let removed = if preserve_path {
            let Some(cut) = self.graph.cut_vertex(id, |_, _| PathSegment::default()) else {
                return false;
            };
            self.events
                .extend(cut.added.iter().map(|&e| MapEvent::PathSegmentAdded(e)));
            cut.removed
        } else {
            let Some(removed) = self.graph.remove_vertex(id) else {
                return false;
            };
            removed
        };
        self.forget(removed, MapEvent::WaypointRemoved(id), true);
        true
    }

    /// Drop the spatial item and record events for a vertex the graph gave back.
    fn forget(
        &mut self,
        removed: RemovedVertex<Waypoint, PathSegment>,
        event: MapEvent,
        unindex: bool,
    ) {
        if unindex {
            let _ = self.tree.remove(removed.value.item);
        }
        self.events.extend(
            removed
                .edges
                .iter()
                .map(|&(edge, ..)| MapEvent::PathSegmentRemoved(edge)),
        );
        self.events.push(event);
    }

    /// Remove a segment. Returns `false` for unknown ids.
    pub fn remove_path_segment(&mut self, id: PathSegmentId) -> bool {
        if self.graph.remove_edge(id).is_none() {
            return false;
        }
        self.events.push(MapEvent::PathSegmentRemoved(id));
        true
    }

    /// Move a waypoint.
    ///
    /// The position is clamped into the map area so a waypoint never leaves the
    /// spatial index. Returns `false` for unknown ids, non-finite positions, and for a
    /// waypoint the index had lost track of, which is removed
    /// ([`MapEvent::WaypointEvicted`]).
    pub fn set_waypoint_position(&mut self, id: WaypointId, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        let position = self.fit_position(position);
        let Some(waypoint) = self.graph.vertex_mut(id) else {
            return false;
        };
        let (previous, item) = (waypoint.position, waypoint.item);
        waypoint.position = position;

        let bounds = self.item_bounds(position);
        match self.tree.set_bounds(item, bounds) {
            CheckOutcome::Kept | CheckOutcome::Relocated { .. } => {}
            CheckOutcome::Unknown => {
                let item = self.spatial_item(id, position);
                match self.tree.insert(item) {
                    Some(item) => {
                        if let Some(w) = self.graph.vertex_mut(id) {
                            w.item = item;
                        }
                    }
                    None => return self.evict(id),
                }
            }
            CheckOutcome::Dropped(_) | CheckOutcome::Evicted(_) => return self.evict(id),
        }

        if previous != position {
            self.events.push(MapEvent::WaypointMoved {
                id,
                from: previous,
                to: position,
            });
            let incident: Vec<PathSegmentId> = self
                .graph
                .outgoing(id)
                .iter()
                .chain(self.graph.incoming(id))
                .copied()
                .collect();
            self.events.extend(
                incident
                    .into_iter()
                    .map(MapEvent::PathSegmentWeightChanged),
            );
        }
        true
    }

    fn evict(&mut self, id: WaypointId) -> bool {
        #[cfg(feature = "tracing")]
        tracing::warn!(waypoint = ?id, "spatial index lost a waypoint; removing it");
        if let Some(vertex) = self.graph.remove_vertex(id) {
            self.forget(vertex, MapEvent::WaypointEvicted(id), true);
        }
        false
    }

    /// Move a waypoint to another floor. Returns `false` for unknown ids.
    ///
    /// Panics if `floor` is not below the configured `floor_count`.
    pub fn set_waypoint_floor(&mut self, id: WaypointId, floor: u32) -> bool {
        assert!(
            floor < self.config.floor_count,
            "floor {floor} out of range for a map with {} floors",
            self.config.floor_count
        );
        match self.graph.vertex_mut(id) {
            Some(w) => {
                w.floor = floor;
                true
            }
            None => false,
        }
    }

    /// Attach or clear a segment's weight modifier. Returns `false` for unknown ids.
    pub fn set_weight_modifier(
        &mut self,
        id: PathSegmentId,
        modifier: Option<WeightModifier>,
    ) -> bool {
        let Some(segment) = self.graph.edge_mut(id) else {
            return false;
        };
        segment.weight_modifier = modifier;
        self.events.push(MapEvent::PathSegmentWeightChanged(id));
        true
    }

    /// Waypoints whose spatial items the quad-tree reports for `area`.
    ///
    /// Uses the tree's loose query, so waypoints slightly outside `area` may appear.
    /// Every waypoint whose square overlaps `area` is included, whatever the loose margin.
    pub fn waypoints_in(&self, area: Rect) -> Vec<WaypointId> {
        let mut items = Vec::new();
        self.tree.find_visible(&mut items, area);
        items
            .into_iter()
            .filter_map(|item| self.tree.owner(item))
            .collect()
    }

    /// [`Self::waypoints_in`] restricted to one floor.
    pub fn waypoints_in_on_floor(&self, area: Rect, floor: u32) -> Vec<WaypointId> {
        let mut found = self.waypoints_in(area);
        found.retain(|&id| self.graph.vertex(id).is_some_and(|w| w.floor == floor));
        found
    }

    /// The waypoint closest to `point`, within `max_distance` of it.
    pub fn nearest_waypoint(&self, point: Point, max_distance: f64) -> Option<WaypointId> {
        if max_distance.is_nan() || max_distance < 0.0 {
            return None;
        }
        let reach = 2.0 * max_distance + self.config.waypoint_extent;
        let mut items = Vec::new();
        self.tree
            .find_intersecting(&mut items, Rect::from_center_size(point, (reach, reach)));
        items
            .into_iter()
            .filter_map(|item| self.tree.owner(item))
            .filter_map(|id| {
                let d = self.graph.vertex(id)?.position.distance(point);
                (d <= max_distance).then_some((id, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
            .map(|(id, _)| id)
    }

    /// The segment leaving `from` for `to`, if one exists.
    pub fn path_segment(&self, from: WaypointId, to: WaypointId) -> Option<PathSegmentId> {
        self.graph.find_edge(from, to)
    }

    /// True if a segment leads from `from` to `to`. Reverse segments do not count.
    pub fn has_path_segment_to(&self, from: WaypointId, to: WaypointId) -> bool {
        self.graph.has_edge(from, to)
    }

    /// Read view of a segment with its current distance, weight and line.
    pub fn segment(&self, id: PathSegmentId) -> Option<PathSegmentRef<'_>> {
        let (from, to) = self.graph.endpoints(id)?;
        let segment = self.graph.edge(id)?;
        let p0 = self.graph.vertex(from)?.position;
        let p1 = self.graph.vertex(to)?.position;
        Some(PathSegmentRef {
            id,
            from,
            to,
            line: Line::new(p0, p1),
            segment,
        })
    }

    /// A waypoint by id.
    pub fn waypoint(&self, id: WaypointId) -> Option<&Waypoint> {
        self.graph.vertex(id)
    }

    /// Segments leaving `id`.
    pub fn outgoing(&self, id: WaypointId) -> &[PathSegmentId] {
        self.graph.outgoing(id)
    }

    /// Segments arriving at `id`.
    pub fn incoming(&self, id: WaypointId) -> &[PathSegmentId] {
        self.graph.incoming(id)
    }

    /// The `i`-th waypoint in insertion order.
    pub fn waypoint_at(&self, i: usize) -> Option<WaypointId> {
        self.graph.vertex_at(i)
    }

    /// The `i`-th segment in insertion order.
    pub fn path_segment_at(&self, i: usize) -> Option<PathSegmentId> {
        self.graph.edge_at(i)
    }

    /// Insertion-order position of a waypoint.
    pub fn index_of_waypoint(&self, id: WaypointId) -> Option<usize> {
        self.graph.index_of_vertex(id)
    }

    /// Insertion-order position of a segment.
    pub fn index_of_path_segment(&self, id: PathSegmentId) -> Option<usize> {
        self.graph.index_of_edge(id)
    }

    /// Number of waypoints.
    pub fn waypoint_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Number of segments.
    pub fn path_segment_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All waypoints in insertion order.
    pub fn waypoints(&self) -> impl Iterator<Item = (WaypointId, &Waypoint)> + '_ {
        self.graph
            .vertices()
            .filter_map(|id| self.graph.vertex(id).map(|w| (id, w)))
    }

    /// All segments in insertion order.
    pub fn path_segments(&self) -> impl Iterator<Item = PathSegmentRef<'_>> + '_ {
        self.graph.edges().filter_map(|id| self.segment(id))
    }

    /// Cheapest route from `from` to `to` by segment weight.
    pub fn find_route(&self, from: WaypointId, to: WaypointId) -> Option<Route> {
        let (waypoints, cost) = self.graph.shortest_path(from, to, |edge, _| {
            self.segment(edge).map_or(f64::NAN, |s| s.weight())
        })?;
        let segments = waypoints
            .windows(2)
            .map(|pair| self.graph.find_edge(pair[0], pair[1]))
            .collect::<Option<Vec<_>>>()?;
        Some(Route {
            waypoints,
            segments,
            cost,
        })
    }

    /// Take the events recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        core::mem::take(&mut self.events)
    }

    /// Clamp `position` into the map so the item centred on it routes to a leaf.
    fn fit_position(&self, position: Point) -> Point {
        let area = self.tree.area();
        let clamped = clamp_into(area, position);
        if self.tree.leaf_at(self.item_bounds(clamped).center()).is_some() {
            return clamped;
        }
        // The item's center rounded onto the far edge; pull it in slightly.
        let (dx, dy) = (area.width() * 1e-9, area.height() * 1e-9);
        clamp_into(
            Rect::new(area.x0 + dx, area.y0 + dy, area.x1 - dx, area.y1 - dy),
            position,
        )
    }

    fn item_bounds(&self, position: Point) -> Rect {
        let side = self.config.waypoint_extent;
        Rect::from_center_size(position, (side, side))
    }

    fn spatial_item(&self, id: WaypointId, position: Point) -> SpatialItem<WaypointId> {
        SpatialItem::new(self.item_bounds(position), id)
    }
}

/// Clamp `point` into the half-open `area`.
fn clamp_into(area: Rect, point: Point) -> Point {
    Point::new(
        point.x.clamp(area.x0, area.x1.next_down().max(area.x0)),
        point.y.clamp(area.y0, area.y1.next_down().max(area.y0)),
    )
}
