//! Benchmarks for sparse matrix construction, access and products.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tessera::prelude::*;
use tessera::sparse::ParallelConfig;

/// Generates a random `n x n` matrix with about `per_row` entries per row.
fn random_matrix<S: tessera::sparse::Symmetry>(n: usize, per_row: usize, seed: u64) -> SparseMatrix<i64, S> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut m = SparseMatrix::new(n, n);
    for _ in 0..n * per_row {
        let (i, j) = (rng.gen_range(0..n), rng.gen_range(0..n));
        if i != j {
            m.set(i, j, rng.gen_range(1..100));
        }
    }
    m
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");

    for n in [100, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::new("nonsymmetric", n), &n, |b, &n| {
            b.iter(|| random_matrix::<NonSymmetric>(black_box(n), 8, 1));
        });
        group.bench_with_input(BenchmarkId::new("skew_symmetric", n), &n, |b, &n| {
            b.iter(|| random_matrix::<SkewSymmetric>(black_box(n), 8, 1));
        });
    }

    group.finish();
}

fn bench_row_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_builder");

    for n in [1_000, 5_000] {
        let rows: Vec<SparseVector<i64>> = {
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            (0..n)
                .map(|_| {
                    SparseVector::from_pairs(n, (0..8).map(|_| (rng.gen_range(0..n), rng.gen_range(1..100i64))))
                })
                .collect()
        };
        group.bench_with_input(BenchmarkId::new("restricted", n), &rows, |b, rows| {
            b.iter(|| {
                let mut builder = RestrictedSparseMatrix::<i64, OnlyRows>::new();
                for row in rows {
                    builder /= row;
                }
                builder.into_matrix()
            });
        });
        group.bench_with_input(BenchmarkId::new("full", n), &rows, |b, rows| {
            b.iter(|| {
                let mut m = SparseMatrix::<i64>::new(0, n);
                for row in rows {
                    m.append_row(row).unwrap();
                }
                m
            });
        });
    }

    group.finish();
}

fn bench_mul_vector(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul_vector");
    let config = ParallelConfig { parallel_threshold: 1 };

    for n in [1_000, 10_000] {
        let m = random_matrix::<Symmetric>(n, 16, 3);
        let v: Vec<i64> = (0..n as i64).map(|k| k % 7 - 3).collect();
        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |b, _| {
            b.iter(|| m.mul_vector(black_box(&v)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &n, |b, _| {
            b.iter(|| m.mul_vector_parallel(black_box(&v), &config).unwrap());
        });
    }

    group.finish();
}

fn bench_copy_on_write(c: &mut Criterion) {
    let m = random_matrix::<NonSymmetric>(2_000, 16, 4);

    c.bench_function("clone_then_write", |b| {
        b.iter(|| {
            let mut copy = m.clone();
            copy.set(5, 5, 99);
            copy
        });
    });

    c.bench_function("permute_rows", |b| {
        let perm: Vec<usize> = (0..2_000).rev().collect();
        b.iter(|| m.permuted_rows(black_box(&perm)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_fill,
    bench_row_builder,
    bench_mul_vector,
    bench_copy_on_write,
);
criterion_main!(benches);
