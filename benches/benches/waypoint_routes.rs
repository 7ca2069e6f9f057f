// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use wayfield_waypoints::{WaypointId, WaypointMap};

const SPACING: f64 = 40.0;

/// A `side x side` lattice of waypoints linked both ways to their right and lower neighbours.
fn lattice(side: usize) -> (WaypointMap, Vec<WaypointId>) {
    let extent = side as f64 * SPACING + SPACING;
    let mut map = WaypointMap::new();
    let _ = map.initialize(Size::new(extent, extent), 5);
    let mut ids = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let p = Point::new(x as f64 * SPACING + 8.0, y as f64 * SPACING + 8.0);
            ids.push(map.add_waypoint(p).expect("lattice fits the map"));
        }
    }
    for y in 0..side {
        for x in 0..side {
            let here = ids[y * side + x];
            if x + 1 < side {
                let right = ids[y * side + x + 1];
                let _ = map.add_path_segment(here, right);
                let _ = map.add_path_segment(right, here);
            }
            if y + 1 < side {
                let below = ids[(y + 1) * side + x];
                let _ = map.add_path_segment(here, below);
                let _ = map.add_path_segment(below, here);
            }
        }
    }
    let _ = map.drain_events();
    (map, ids)
}

fn bench_routes(c: &mut Criterion) {
    let mut group = c.benchmark_group("waypoint_route");
    for &side in &[16usize, 48] {
        let (map, ids) = lattice(side);
        let (start, goal) = (ids[0], ids[ids.len() - 1]);
        group.bench_function(format!("corner_to_corner_{side}x{side}"), |b| {
            b.iter(|| black_box(map.find_route(black_box(start), black_box(goal))));
        });
    }
    group.finish();
}

fn bench_spatial(c: &mut Criterion) {
    let mut group = c.benchmark_group("waypoint_spatial");
    let (map, _) = lattice(48);
    group.bench_function("waypoints_in_viewport", |b| {
        b.iter(|| black_box(map.waypoints_in(black_box(Rect::new(300.0, 300.0, 700.0, 600.0)))));
    });
    group.bench_function("nearest_waypoint", |b| {
        b.iter(|| black_box(map.nearest_waypoint(black_box(Point::new(955.0, 431.0)), 60.0)));
    });
    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("waypoint_edit");
    group.bench_function("cut_every_other_waypoint_16x16", |b| {
        b.iter_batched(
            || lattice(16),
            |(mut map, ids)| {
                for id in ids.into_iter().step_by(2) {
                    black_box(map.remove_waypoint(id, true));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("move_all_16x16", |b| {
        b.iter_batched(
            || lattice(16),
            |(mut map, ids)| {
                for (i, id) in ids.into_iter().enumerate() {
                    let offset = if i % 2 == 0 { 5.0 } else { 90.0 };
                    let p = map.waypoint(id).map(|w| w.position()).unwrap_or_default();
                    black_box(map.set_waypoint_position(id, p + Vec2::new(offset, offset * 0.5)));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_routes, bench_spatial, bench_edits);
criterion_main!(benches);
