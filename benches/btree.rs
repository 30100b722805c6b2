//! B-tree benchmarks for memtree
//!
//! These benchmarks measure the core container operations:
//!
//! - insert: sequential and shuffled key orders
//! - get: existing and missing keys
//! - iter: full in-order scan throughput
//! - delete_min: drain throughput

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memtree::BTree;
use std::hint::black_box;

/// Deterministic shuffle so runs are comparable without a randomness
/// dependency.
fn scrambled(count: usize) -> Vec<usize> {
    let mut keys: Vec<usize> = (0..count).collect();
    let mut state: u64 = 0x9E37_79B9;
    for i in (1..keys.len()).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        keys.swap(i, j);
    }
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_insert");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), count, |b, &count| {
            b.iter(|| {
                let mut tree = BTree::with_min_degree(8);
                for i in 0..count {
                    tree.insert(i, i);
                }
                black_box(tree.len())
            });
        });

        group.bench_with_input(BenchmarkId::new("shuffled", count), count, |b, &count| {
            let keys = scrambled(count);
            b.iter(|| {
                let mut tree = BTree::with_min_degree(8);
                for &i in &keys {
                    tree.insert(i, i);
                }
                black_box(tree.len())
            });
        });
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_get");

    for count in [1_000, 10_000].iter() {
        let mut tree = BTree::with_min_degree(8);
        for i in scrambled(*count) {
            tree.insert(i, i);
        }

        group.bench_with_input(
            BenchmarkId::new("existing_key", count),
            count,
            |b, &count| {
                b.iter(|| black_box(tree.get(black_box(&(count / 2)))));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("missing_key", count),
            count,
            |b, &count| {
                b.iter(|| black_box(tree.get(black_box(&(count + 1)))));
            },
        );
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_scan");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        let mut tree = BTree::with_min_degree(8);
        for i in scrambled(*count) {
            tree.insert(i, i);
        }

        group.bench_with_input(BenchmarkId::new("in_order", count), count, |b, _| {
            b.iter(|| {
                let mut sum = 0usize;
                for (k, _) in &tree {
                    sum = sum.wrapping_add(*k);
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree_drain");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("delete_min", count), count, |b, &count| {
            b.iter_with_setup(
                || {
                    let mut tree = BTree::with_min_degree(8);
                    for i in scrambled(count) {
                        tree.insert(i, i);
                    }
                    tree
                },
                |mut tree| {
                    while tree.delete_min().is_some() {}
                    black_box(tree.is_empty())
                },
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_scan, bench_drain);
criterion_main!(benches);
