// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shortest paths over caller-supplied edge weights.

use alloc::collections::{BTreeMap, BinaryHeap};
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::graph::Graph;
use crate::types::{EdgeId, VertexId};

/// Frontier entry; ordered so the `BinaryHeap` pops the cheapest first.
#[derive(Copy, Clone, Debug)]
struct Frontier {
    cost: f64,
    vertex: VertexId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl<V, E> Graph<V, E> {
    /// Cheapest directed path from `from` to `to` (Dijkstra).
    ///
    /// `weight` prices each edge. Negative or NaN weights make the edge impassable.
    /// Returns the vertices along the path, both ends included, and its total cost;
    /// `None` if either end is unknown or `to` is unreachable.
    pub fn shortest_path(
        &self,
        from: VertexId,
        to: VertexId,
        mut weight: impl FnMut(EdgeId, &E) -> f64,
    ) -> Option<(Vec<VertexId>, f64)> {
        if !self.is_vertex_alive(from) || !self.is_vertex_alive(to) {
            return None;
        }
        let mut best: BTreeMap<VertexId, f64> = BTreeMap::new();
        let mut came_from: BTreeMap<VertexId, VertexId> = BTreeMap::new();
        let mut heap = BinaryHeap::new();
        best.insert(from, 0.0);
        heap.push(Frontier {
            cost: 0.0,
            vertex: from,
        });

        while let Some(Frontier { cost, vertex }) = heap.pop() {
            if vertex == to {
                let mut path = Vec::from([to]);
                let mut at = to;
                while let Some(&prev) = came_from.get(&at) {
                    path.push(prev);
                    at = prev;
                }
                path.reverse();
                return Some((path, cost));
            }
            if best.get(&vertex).is_some_and(|&b| cost > b) {
                continue;
            }
            for &edge in self.outgoing(vertex) {
                let (Some(value), Some((_, next))) = (self.edge(edge), self.endpoints(edge)) else {
                    continue;
                };
                let w = weight(edge, value);
                if w.is_nan() || w < 0.0 {
                    continue;
                }
                let candidate = cost + w;
                if best.get(&next).is_none_or(|&b| candidate < b) {
                    best.insert(next, candidate);
                    came_from.insert(next, vertex);
                    heap.push(Frontier {
                        cost: candidate,
                        vertex: next,
                    });
                }
            }
        }
        None
    }
}
