//! Benchmarks for the AVL index tree.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tessera::avl::AvlTree;

fn random_keys(count: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(0..count * 4)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = random_keys(size, 1);
        group.bench_with_input(BenchmarkId::new("avl", size), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = AvlTree::new();
                for &k in keys {
                    tree.insert(k, k);
                }
                tree
            });
        });
        group.bench_with_input(BenchmarkId::new("btreemap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in keys {
                    map.insert(k, k);
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_lookup_and_iterate(c: &mut Criterion) {
    let keys = random_keys(100_000, 2);
    let tree: AvlTree<usize> = keys.iter().map(|&k| (k, k)).collect();

    c.bench_function("avl_get", |b| {
        b.iter(|| keys.iter().filter(|&&k| tree.get(black_box(k)).is_some()).count());
    });

    c.bench_function("avl_iter", |b| {
        b.iter(|| tree.iter().map(|(k, _)| k).sum::<usize>());
    });

    c.bench_function("avl_from_sorted", |b| {
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        b.iter(|| AvlTree::from_sorted(sorted.iter().map(|&k| (k, k)).collect()));
    });
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(50_000, 3);
    let tree: AvlTree<usize> = keys.iter().map(|&k| (k, k)).collect();

    c.bench_function("avl_remove_half", |b| {
        b.iter(|| {
            let mut t = tree.clone();
            for &k in keys.iter().step_by(2) {
                t.remove(black_box(k));
            }
            t
        });
    });
}

criterion_group!(benches, bench_insert, bench_lookup_and_iterate, bench_remove);
criterion_main!(benches);
