//! Criterion micro-benchmarks for object-grid growth.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use umag_grid::{resolve_new_shape, ObjectGrid};
use umag_scene::SceneRecord;
use umag_sweep::SweepAxis;

fn record() -> SceneRecord {
    let mut r = SceneRecord::default();
    for i in 0..8 {
        r.add_cube([i as f64 * 50.0, 0.0, 0.0], [40.0, 200.0, 50.0]);
    }
    r.add_observation_position([0.0, 0.0, -80.0]);
    r
}

/// Benchmark: grow a single record into a 10x10x100 grid one axis at a time.
fn bench_grow_10k(c: &mut Criterion) {
    let base = ObjectGrid::new(record());
    c.bench_function("grow_axis_10k", |b| {
        b.iter(|| {
            let mut grid = base.clone();
            grid.grow_axis(0, 100).unwrap();
            grid.grow_axis(1, 10).unwrap();
            grid.grow_axis(2, 10).unwrap();
            black_box(grid.len());
        });
    });
}

/// Benchmark: broadcast a 100-cell grid to 10x100.
fn bench_expand_to(c: &mut Criterion) {
    let mut base = ObjectGrid::new(record());
    base.grow_axis(0, 100).unwrap();
    c.bench_function("expand_to_1k", |b| {
        b.iter(|| {
            let mut grid = base.clone();
            grid.expand_to(&[10, 100]).unwrap();
            black_box(grid.len());
        });
    });
}

/// Benchmark: shape resolution alone, auto and explicit axes.
fn bench_resolve(c: &mut Criterion) {
    let shape = [4usize, 1, 1, 3];
    c.bench_function("resolve_new_shape", |b| {
        b.iter(|| {
            black_box(resolve_new_shape(black_box(&shape), SweepAxis::Auto, 5).unwrap());
            black_box(resolve_new_shape(black_box(&shape), SweepAxis::Index(2), 7).unwrap());
            black_box(resolve_new_shape(black_box(&shape), SweepAxis::Index(6), 2).unwrap());
        });
    });
}

criterion_group!(benches, bench_grow_10k, bench_expand_to, bench_resolve);
criterion_main!(benches);
