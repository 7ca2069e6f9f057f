// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use wayfield_quadtree::{ItemKey, LooseQuadTree, QuadTreeConfig, SpatialItem};

const WORLD: f64 = 2048.0;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_items(count: usize, side: f64) -> Vec<Rect> {
    let mut rng = Rng::new(0x5EED_0F7A_7E00_0001);
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * (WORLD - side);
            let y = rng.next_f64() * (WORLD - side);
            Rect::new(x, y, x + side, y + side)
        })
        .collect()
}

fn build(levels: u32, rects: &[Rect]) -> (LooseQuadTree<u32>, Vec<ItemKey>) {
    let mut tree = LooseQuadTree::with_config(QuadTreeConfig {
        width: WORLD,
        height: WORLD,
        extra_loose_width: 32.0,
        extra_loose_height: 32.0,
        subdivision_count: levels,
        item_count_hint: rects.len(),
        ..Default::default()
    });
    let keys = rects
        .iter()
        .enumerate()
        .filter_map(|(i, &r)| tree.insert(SpatialItem::new(r, i as u32)))
        .collect();
    (tree, keys)
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");
    let viewport = Rect::new(600.0, 600.0, 1000.0, 900.0);
    for &count in &[1_000usize, 10_000] {
        let rects = gen_items(count, 12.0);
        let (mut tree, _) = build(5, &rects);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_function(format!("find_visible_loose_n{count}"), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                tree.find_visible(&mut out, black_box(viewport));
                black_box(out.len());
            });
        });

        group.bench_function(format!("find_intersecting_n{count}"), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                tree.find_intersecting(&mut out, black_box(viewport));
                black_box(out.len());
            });
        });

        tree.set_use_brute_force(true);
        group.bench_function(format!("brute_force_n{count}"), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                tree.find_visible(&mut out, black_box(viewport));
                black_box(out.len());
            });
        });
    }
    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_depth");
    let rects = gen_items(10_000, 12.0);
    let viewport = Rect::new(100.0, 100.0, 356.0, 356.0);
    for levels in [2_u32, 4, 6, 8] {
        let (tree, _) = build(levels, &rects);
        group.bench_function(format!("find_intersecting_levels{levels}"), |b| {
            let mut out = Vec::new();
            b.iter(|| {
                out.clear();
                tree.find_intersecting(&mut out, black_box(viewport));
                black_box(out.len());
            });
        });
    }
    group.finish();
}

fn bench_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_update");
    let rects = gen_items(4_096, 12.0);
    group.throughput(Throughput::Elements(rects.len() as u64));

    group.bench_function("insert_n4096", |b| {
        b.iter_batched(
            || {
                LooseQuadTree::<u32>::with_config(QuadTreeConfig {
                    width: WORLD,
                    height: WORLD,
                    extra_loose_width: 32.0,
                    extra_loose_height: 32.0,
                    subdivision_count: 5,
                    ..Default::default()
                })
            },
            |mut tree| {
                for (i, &r) in rects.iter().enumerate() {
                    black_box(tree.insert(SpatialItem::new(r, i as u32)));
                }
            },
            BatchSize::SmallInput,
        );
    });

    // Small steps mostly stay inside the loose area; large ones relocate.
    for (name, step) in [("nudge", 2.0), ("jump", 150.0)] {
        group.bench_function(format!("move_{name}_n4096"), |b| {
            b.iter_batched(
                || build(5, &rects),
                |(mut tree, keys)| {
                    for (i, key) in keys.into_iter().enumerate() {
                        let Some(item) = tree.item(key) else {
                            continue;
                        };
                        let dir = if i % 2 == 0 { step } else { -step };
                        let moved = item.bounds + Vec2::new(dir, dir * 0.5);
                        black_box(tree.set_bounds(key, moved));
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queries, bench_depth, bench_updates);
criterion_main!(benches);
