//! Benchmarks for Progressive tree operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use progressive_core::ProgressiveTree;

/// Spread keys over the whole 64-bit space with a fixed multiplier
fn key(i: u64) -> u64 {
    i.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn populated(size: u64) -> ProgressiveTree<u64> {
    let mut tree = ProgressiveTree::new();
    for i in 0..size {
        tree.insert(key(i), i);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("progressive_insert");

    for size in [10u64, 1_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(populated(size)));
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let tree = populated(100_000);

    let mut group = c.benchmark_group("progressive_find");

    group.bench_function("existing_key", |b| {
        b.iter(|| black_box(tree.find(key(50_000))));
    });

    group.bench_function("missing_key", |b| {
        b.iter(|| black_box(tree.find(key(200_000))));
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let tree = populated(10_000);

    c.bench_function("progressive_remove_reinsert", |b| {
        let mut tree = tree.clone();
        b.iter(|| {
            let removed = tree.remove(key(5_000));
            if let Some(payload) = removed {
                tree.insert(key(5_000), payload);
            }
        });
    });
}

criterion_group!(benches, bench_insert, bench_find, bench_remove);
criterion_main!(benches);
