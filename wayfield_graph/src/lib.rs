// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayfield Graph: a small directed graph for navigation overlays.
//!
//! - Vertices and edges carry arbitrary payloads and are addressed by generational
//!   [`VertexId`]/[`EdgeId`] handles, so stale handles never alias newer elements.
//! - Edges are directed; lookups such as [`Graph::find_edge`] only follow edges that
//!   leave the first vertex. Add two edges for a two-way link.
//! - [`Graph::remove_vertex`] cascades to incident edges and hands back everything it
//!   removed, which is how owners learn what to clean up.
//! - [`Graph::cut_vertex`] removes a vertex while bridging its predecessors to its
//!   successors so routes through it survive.
//! - [`Graph::shortest_path`] runs Dijkstra with caller-priced edges.
//!
//! # Example
//!
//! ```rust
//! use wayfield_graph::Graph;
//!
//! let mut g: Graph<&str, f64> = Graph::new();
//! let a = g.add_vertex("a");
//! let x = g.add_vertex("x");
//! let b = g.add_vertex("b");
//! g.add_edge(a, x, 1.0).unwrap();
//! g.add_edge(x, b, 1.0).unwrap();
//!
//! let cut = g.cut_vertex(x, |_, _| 2.0).unwrap();
//! assert_eq!(cut.removed.value, "x");
//! assert!(g.has_edge(a, b));
//!
//! let (path, cost) = g.shortest_path(a, b, |_, w| *w).unwrap();
//! assert_eq!(path, [a, b]);
//! assert_eq!(cost, 2.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cut;
mod graph;
mod path;
mod slots;
mod types;

pub use graph::Graph;
pub use types::{Cut, EdgeId, GraphError, RemovedVertex, VertexId};
