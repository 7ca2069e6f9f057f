// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles, errors, and removal records for the graph.

use alloc::vec::Vec;

/// Identifier for a vertex.
///
/// A slot index plus a generation counter. Removing a vertex frees its slot; reusing
/// the slot bumps the generation, so a stale `VertexId` never aliases a newer vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexId(pub(crate) u32, pub(crate) u32);

impl VertexId {
    pub(crate) const fn from_handle((idx, generation): (u32, u32)) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn handle(self) -> (u32, u32) {
        (self.0, self.1)
    }
}

/// Identifier for a directed edge. Same generational semantics as [`VertexId`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EdgeId(pub(crate) u32, pub(crate) u32);

impl EdgeId {
    pub(crate) const fn from_handle((idx, generation): (u32, u32)) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn handle(self) -> (u32, u32) {
        (self.0, self.1)
    }
}

/// Why an edge could not be added.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An endpoint is not a live vertex of this graph.
    #[error("vertex {0:?} is not part of the graph")]
    UnknownVertex(VertexId),
    /// Both endpoints are the same vertex.
    #[error("edges may not start and end at the same vertex {0:?}")]
    SelfLoop(VertexId),
    /// An edge with the same direction already connects the endpoints.
    #[error("an edge between these vertices already exists: {0:?}")]
    DuplicateEdge(EdgeId),
}

/// A vertex taken out of the graph together with the edges that went with it.
#[derive(Clone, Debug)]
pub struct RemovedVertex<V, E> {
    /// The id the vertex had.
    pub id: VertexId,
    /// The vertex payload.
    pub value: V,
    /// Every incident edge, outgoing and incoming, as `(id, from, to, payload)`.
    pub edges: Vec<(EdgeId, VertexId, VertexId, E)>,
}

/// Result of [`Graph::cut_vertex`](crate::Graph::cut_vertex).
#[derive(Clone, Debug)]
pub struct Cut<V, E> {
    /// The removed vertex and its former edges.
    pub removed: RemovedVertex<V, E>,
    /// Bridging edges added between former predecessors and successors.
    pub added: Vec<EdgeId>,
}
