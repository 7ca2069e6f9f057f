// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The directed graph: vertex and edge storage plus adjacency.

use alloc::vec::Vec;

use crate::slots::Slots;
use crate::types::{EdgeId, GraphError, RemovedVertex, VertexId};

#[derive(Clone, Debug)]
struct VertexSlot<V> {
    value: V,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

#[derive(Clone, Debug)]
struct EdgeSlot<E> {
    from: VertexId,
    to: VertexId,
    value: E,
}

/// Directed graph with payloads on vertices and edges.
///
/// At most one edge runs in each direction between two vertices and self-loops
/// are rejected. Vertices and edges keep their insertion order for index access.
#[derive(Clone)]
pub struct Graph<V, E> {
    vertices: Slots<VertexSlot<V>>,
    edges: Slots<EdgeSlot<E>>,
}

impl<V, E> core::fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .finish_non_exhaustive()
    }
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Graph<V, E> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Slots::default(),
            edges: Slots::default(),
        }
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, value: V) -> VertexId {
        VertexId::from_handle(self.vertices.insert(VertexSlot {
            value,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }))
    }

    /// Remove a vertex and every edge touching it.
    ///
    /// Returns `None` if `id` is stale or was never part of this graph.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<RemovedVertex<V, E>> {
        let slot = self.vertices.remove(id.handle())?;
        let mut edges = Vec::with_capacity(slot.outgoing.len() + slot.incoming.len());
        for edge in slot.outgoing.into_iter().chain(slot.incoming) {
            if let Some((from, to, value)) = self.take_edge(edge) {
                edges.push((edge, from, to, value));
            }
        }
        Some(RemovedVertex {
            id,
            value: slot.value,
            edges,
        })
    }

    /// Add an edge from `from` to `to`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, value: E) -> Result<EdgeId, GraphError> {
        for v in [from, to] {
            if !self.is_vertex_alive(v) {
                return Err(GraphError::UnknownVertex(v));
            }
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if let Some(existing) = self.find_edge(from, to) {
            return Err(GraphError::DuplicateEdge(existing));
        }
        let id = EdgeId::from_handle(self.edges.insert(EdgeSlot { from, to, value }));
        if let Some(v) = self.vertices.get_mut(from.handle()) {
            v.outgoing.push(id);
        }
        if let Some(v) = self.vertices.get_mut(to.handle()) {
            v.incoming.push(id);
        }
        Ok(id)
    }

    /// Remove an edge and return its payload.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<E> {
        self.take_edge(id).map(|(_, _, value)| value)
    }

    fn take_edge(&mut self, id: EdgeId) -> Option<(VertexId, VertexId, E)> {
        let EdgeSlot { from, to, value } = self.edges.remove(id.handle())?;
        if let Some(v) = self.vertices.get_mut(from.handle()) {
            v.outgoing.retain(|&e| e != id);
        }
        if let Some(v) = self.vertices.get_mut(to.handle()) {
            v.incoming.retain(|&e| e != id);
        }
        Some((from, to, value))
    }

    /// The edge emanating from `from` that ends at `to`, if any.
    ///
    /// Edges in the opposite direction are not considered.
    pub fn find_edge(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        let slot = self.vertices.get(from.handle())?;
        slot.outgoing
            .iter()
            .copied()
            .find(|&e| self.edges.get(e.handle()).is_some_and(|edge| edge.to == to))
    }

    /// True if an edge runs from `from` to `to`.
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.find_edge(from, to).is_some()
    }

    /// Edges leaving `id`, oldest first. Empty for unknown vertices.
    pub fn outgoing(&self, id: VertexId) -> &[EdgeId] {
        self.vertices
            .get(id.handle())
            .map_or(&[], |v| v.outgoing.as_slice())
    }

    /// Edges arriving at `id`, oldest first. Empty for unknown vertices.
    pub fn incoming(&self, id: VertexId) -> &[EdgeId] {
        self.vertices
            .get(id.handle())
            .map_or(&[], |v| v.incoming.as_slice())
    }

    /// Vertices reachable from `id` over one edge.
    pub fn successors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.outgoing(id)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(_, to)| to))
    }

    /// Vertices with an edge into `id`.
    pub fn predecessors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incoming(id)
            .iter()
            .filter_map(|&e| self.endpoints(e).map(|(from, _)| from))
    }

    /// `(from, to)` of a live edge.
    pub fn endpoints(&self, id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges.get(id.handle()).map(|e| (e.from, e.to))
    }

    /// Payload of a live vertex.
    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id.handle()).map(|v| &v.value)
    }

    /// Mutable payload of a live vertex.
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut V> {
        self.vertices.get_mut(id.handle()).map(|v| &mut v.value)
    }

    /// Payload of a live edge.
    pub fn edge(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(id.handle()).map(|e| &e.value)
    }

    /// Mutable payload of a live edge.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut E> {
        self.edges.get_mut(id.handle()).map(|e| &mut e.value)
    }

    /// Live vertex ids in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.handles().map(VertexId::from_handle)
    }

    /// Live edge ids in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.handles().map(EdgeId::from_handle)
    }

    /// The `i`-th live vertex in insertion order.
    pub fn vertex_at(&self, i: usize) -> Option<VertexId> {
        self.vertices.at(i).map(VertexId::from_handle)
    }

    /// The `i`-th live edge in insertion order.
    pub fn edge_at(&self, i: usize) -> Option<EdgeId> {
        self.edges.at(i).map(EdgeId::from_handle)
    }

    /// Position of `id` in insertion order. Linear in the vertex count.
    pub fn index_of_vertex(&self, id: VertexId) -> Option<usize> {
        self.vertices.position(id.handle())
    }

    /// Position of `id` in insertion order. Linear in the edge count.
    pub fn index_of_edge(&self, id: EdgeId) -> Option<usize> {
        self.edges.position(id.handle())
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if `id` refers to a live vertex.
    pub fn is_vertex_alive(&self, id: VertexId) -> bool {
        self.vertices.is_alive(id.handle())
    }

    /// True if `id` refers to a live edge.
    pub fn is_edge_alive(&self, id: EdgeId) -> bool {
        self.edges.is_alive(id.handle())
    }
}
