// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Removing a vertex without breaking the routes that passed through it.

use alloc::vec::Vec;

use crate::graph::Graph;
use crate::types::{Cut, VertexId};

impl<V, E> Graph<V, E> {
    /// Remove `id`, first bridging every route that went through it.
    ///
    /// For each predecessor `p` (edge `p -> id`) and successor `s` (edge `id -> s`)
    /// with `p != s`, an edge `p -> s` built by `make_edge(p, s)` is added unless one
    /// already exists. Directed reachability among the remaining vertices is therefore
    /// unchanged, and no redundant edge is created.
    ///
    /// Returns `None` if `id` is not a live vertex.
    pub fn cut_vertex(
        &mut self,
        id: VertexId,
        mut make_edge: impl FnMut(VertexId, VertexId) -> E,
    ) -> Option<Cut<V, E>> {
        if !self.is_vertex_alive(id) {
            return None;
        }
        let predecessors: Vec<VertexId> = self.predecessors(id).collect();
        let successors: Vec<VertexId> = self.successors(id).collect();

        let mut added = Vec::new();
        for &p in &predecessors {
            for &s in &successors {
                if p == s || self.has_edge(p, s) {
                    continue;
                }
                if let Ok(edge) = self.add_edge(p, s, make_edge(p, s)) {
                    added.push(edge);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            vertex = ?id,
            predecessors = predecessors.len(),
            successors = successors.len(),
            bridged = added.len(),
            "graph: vertex cut"
        );

        let removed = self.remove_vertex(id)?;
        Some(Cut { removed, added })
    }
}
