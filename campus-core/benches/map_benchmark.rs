//! Benchmark comparing the Map implementations:
//! - SepChainHashTable, AvlSortedMap vs std HashMap / BTreeMap
//!
//! Run with: cargo bench --package campus-core --bench map_benchmark

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use mimalloc::MiMalloc;
use std::collections::{BTreeMap, HashMap};
use std::hint::black_box;

use campus_core::{AvlSortedMap, Map, SepChainHashTable};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const SIZES: [usize; 3] = [100, 1_000, 10_000];

// ============================================================================
// Generic benchmark helpers for Map
// ============================================================================

/// Insert `count` keys, then look every one of them up
fn bench_insert_lookup<M>(mut map: M, count: usize)
where
    M: Map<u64, u64>,
{
    for i in 0..count as u64 {
        map.put(i.wrapping_mul(0x9E37_79B9), i);
    }
    for i in 0..count as u64 {
        black_box(map.get(&i.wrapping_mul(0x9E37_79B9)));
    }
}

/// Insert, remove half, then walk the remaining entries
fn bench_churn_and_walk<M>(mut map: M, count: usize)
where
    M: Map<u64, u64>,
{
    for i in 0..count as u64 {
        map.put(i, i);
    }
    for i in (0..count as u64).step_by(2) {
        map.remove(&i);
    }
    black_box(map.entries().count());
}

// ============================================================================
// Criterion benchmark groups
// ============================================================================

fn insert_lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_lookup");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("sep_chain_hash_table", size), &size, |b, &size| {
            b.iter(|| bench_insert_lookup(SepChainHashTable::new(), black_box(size)))
        });
        group.bench_with_input(BenchmarkId::new("avl_sorted_map", size), &size, |b, &size| {
            b.iter(|| bench_insert_lookup(AvlSortedMap::new(), black_box(size)))
        });
        group.bench_with_input(BenchmarkId::new("std_hash_map", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = HashMap::new();
                for i in 0..size as u64 {
                    map.insert(i.wrapping_mul(0x9E37_79B9), i);
                }
                for i in 0..size as u64 {
                    black_box(map.get(&i.wrapping_mul(0x9E37_79B9)));
                }
            })
        });
    }

    group.finish();
}

fn churn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_churn_and_walk");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("sep_chain_hash_table", size), &size, |b, &size| {
            b.iter(|| bench_churn_and_walk(SepChainHashTable::new(), black_box(size)))
        });
        group.bench_with_input(BenchmarkId::new("avl_sorted_map", size), &size, |b, &size| {
            b.iter(|| bench_churn_and_walk(AvlSortedMap::new(), black_box(size)))
        });
        group.bench_with_input(BenchmarkId::new("std_btree_map", size), &size, |b, &size| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for i in 0..size as u64 {
                    map.insert(i, i);
                }
                for i in (0..size as u64).step_by(2) {
                    map.remove(&i);
                }
                black_box(map.iter().count());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, insert_lookup_benchmark, churn_benchmark);
criterion_main!(benches);
