// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{Aabb2D, RTree};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

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

fn gen_random_rects(count: usize, extent: f64, max_size: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * extent;
            let y0 = rng.next_f64() * extent;
            let w = rng.next_f64() * max_size;
            let h = rng.next_f64() * max_size;
            Aabb2D::<f64>::from_xywh(x0, y0, w, h)
        })
        .collect()
}

fn gen_queries(count: usize, extent: f64, size: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            let x0 = rng.next_f64() * (extent - size);
            let y0 = rng.next_f64() * (extent - size);
            Aabb2D::<f64>::from_xywh(x0, y0, size, size)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_build_f64");
    for &count in &[1_000usize, 10_000, 100_000] {
        let rects = gen_random_rects(count, 10_000.0, 20.0);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_function(format!("insert_n{}", count), |b| {
            b.iter_batched(
                RTree::<Aabb2D<f64>>::new,
                |mut tree| {
                    for r in rects.iter().copied() {
                        tree.insert(r);
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("bulk_load_n{}", count), |b| {
            b.iter_batched(
                || rects.clone(),
                |batch| {
                    let mut tree = RTree::<Aabb2D<f64>>::new();
                    tree.bulk_load(batch);
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("bulk_load_in_chunks_n{}", count), |b| {
            b.iter_batched(
                || rects.clone(),
                |batch| {
                    let mut tree = RTree::<Aabb2D<f64>>::new();
                    for chunk in batch.chunks(count / 10) {
                        tree.bulk_load(chunk.iter().copied());
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_query_f64");
    for &n in &[64usize, 256] {
        let rects = gen_grid_rects(n, 10.0);
        let extent = n as f64 * 10.0;
        let queries = gen_queries(1_000, extent, 50.0);
        group.throughput(Throughput::Elements(queries.len() as u64));

        let mut incremental = RTree::<Aabb2D<f64>>::new();
        for r in rects.iter().copied() {
            incremental.insert(r);
        }
        let mut packed = RTree::<Aabb2D<f64>>::new();
        packed.bulk_load(rects.iter().copied());

        for (label, tree) in [("incremental", &incremental), ("packed", &packed)] {
            group.bench_function(format!("search_{}_n{}", label, n), |b| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for q in &queries {
                        hits += tree.search(q).len();
                    }
                    black_box(hits);
                })
            });

            group.bench_function(format!("search_with_{}_n{}", label, n), |b| {
                b.iter(|| {
                    let mut hits = 0usize;
                    for q in &queries {
                        tree.search_with(q, |_| hits += 1);
                    }
                    black_box(hits);
                })
            });

            group.bench_function(format!("collides_{}_n{}", label, n), |b| {
                b.iter(|| {
                    let hits = queries.iter().filter(|q| tree.collides(q)).count();
                    black_box(hits);
                })
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_remove_f64");
    let count = 10_000usize;
    let rects = gen_random_rects(count, 10_000.0, 20.0);
    group.throughput(Throughput::Elements((count / 2) as u64));
    group.bench_function(format!("remove_half_n{}", count), |b| {
        b.iter_batched(
            || {
                let mut tree = RTree::<Aabb2D<f64>>::new();
                tree.bulk_load(rects.iter().copied());
                tree
            },
            |mut tree| {
                for r in rects.iter().step_by(2) {
                    tree.remove(r);
                }
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query, bench_remove);
criterion_main!(benches);
