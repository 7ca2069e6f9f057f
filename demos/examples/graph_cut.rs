// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph cut basics.
//!
//! Build a small hub-and-spoke network, price a route through it, then cut the hub
//! and watch the spokes get bridged so every route survives.
//!
//! Run:
//! - `cargo run -p wayfield_demos --example graph_cut`

use wayfield_graph::Graph;

fn main() {
    let mut g: Graph<&str, f64> = Graph::new();
    let hub = g.add_vertex("hub");
    let north = g.add_vertex("north");
    let south = g.add_vertex("south");
    let east = g.add_vertex("east");
    for spoke in [north, south, east] {
        g.add_edge(spoke, hub, 1.0).unwrap();
        g.add_edge(hub, spoke, 1.0).unwrap();
    }
    // A slow direct road.
    g.add_edge(north, east, 10.0).unwrap();

    let (path, cost) = g.shortest_path(north, east, |_, w| *w).unwrap();
    let names: Vec<_> = path.iter().filter_map(|&v| g.vertex(v)).collect();
    println!("north -> east via {names:?} costs {cost}");
    assert_eq!(path, [north, hub, east]);

    // Cutting the hub bridges every spoke pair except the road that already exists.
    let cut = g.cut_vertex(hub, |_, _| 2.5).unwrap();
    println!(
        "cut {:?}: {} edges dropped, {} bridges added",
        cut.removed.value,
        cut.removed.edges.len(),
        cut.added.len()
    );
    assert_eq!(cut.removed.edges.len(), 6);
    assert_eq!(cut.added.len(), 5);
    assert_eq!(g.edge(g.find_edge(north, east).unwrap()), Some(&10.0));

    let (path, cost) = g.shortest_path(north, east, |_, w| *w).unwrap();
    let names: Vec<_> = path.iter().filter_map(|&v| g.vertex(v)).collect();
    println!("after the cut: {names:?} costs {cost}");
    assert_eq!(path, [north, south, east]);
    assert_eq!(cost, 5.0);
}
