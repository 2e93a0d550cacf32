//! Parallel matrix kernels.
//!
//! Rows of a matrix can be read concurrently: lines borrow the table
//! immutably and the table is `Sync` whenever the element type is. The
//! kernels here split work by rows with rayon and fall back to the
//! sequential version below a size threshold.

use rayon::prelude::*;
use tessera_rings::Ring;

use crate::error::{check_dim, Result};
use crate::generic::GenericVector;
use crate::kinds::Symmetry;
use crate::matrix::SparseMatrix;
use crate::vector::SparseVector;

/// Configuration for the parallel kernels.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Minimum number of rows to enable parallelism.
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 256,
        }
    }
}

impl<E: Ring + Send + Sync, S: Symmetry> SparseMatrix<E, S> {
    /// Computes `self * v` with rows distributed over the rayon pool.
    ///
    /// # Errors
    ///
    /// Fails if `v.dim() != self.num_cols()`.
    pub fn mul_vector_parallel<V>(&self, v: &V, config: &ParallelConfig) -> Result<SparseVector<E>>
    where
        V: GenericVector<E> + Sync + ?Sized,
    {
        check_dim("mul_vector", self.num_cols(), v.dim())?;
        if self.num_rows() < config.parallel_threshold {
            return self.mul_vector(v);
        }
        let entries: Vec<(usize, E)> = (0..self.num_rows())
            .into_par_iter()
            .filter_map(|i| {
                let x = self.row(i).dot(v);
                (!x.is_zero()).then_some((i, x))
            })
            .collect();
        Ok(SparseVector::from_sorted_entries(self.num_rows(), entries))
    }

    /// Returns the number of stored entries of every row, counted in
    /// parallel.
    #[must_use]
    pub fn row_sizes_parallel(&self, config: &ParallelConfig) -> Vec<usize> {
        if self.num_rows() < config.parallel_threshold {
            return self.rows().map(|row| row.nnz()).collect();
        }
        (0..self.num_rows())
            .into_par_iter()
            .map(|i| self.row(i).nnz())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{NonSymmetric, SkewSymmetric};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rows: usize, cols: usize, seed: u64) -> SparseMatrix<i64, NonSymmetric> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut m = SparseMatrix::new(rows, cols);
        for _ in 0..rows * 3 {
            let (i, j) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
            m.set(i, j, rng.gen_range(-9..=9));
        }
        m
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let m = random_matrix(120, 80, 7);
        let v: Vec<i64> = (0..80).map(|k| k % 5 - 2).collect();
        let config = ParallelConfig {
            parallel_threshold: 1,
        };
        assert_eq!(
            m.mul_vector_parallel(&v, &config).unwrap(),
            m.mul_vector(&v).unwrap()
        );
        assert_eq!(
            m.row_sizes_parallel(&config),
            m.rows().map(|row| row.nnz()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parallel_skew_rows() {
        let mut m = SparseMatrix::<i64, SkewSymmetric>::new(4, 4);
        m.set(3, 0, 2);
        m.set(2, 1, -1);
        let v = vec![1i64, 1, 1, 1];
        let config = ParallelConfig {
            parallel_threshold: 1,
        };
        let y = m.mul_vector_parallel(&v, &config).unwrap();
        assert_eq!(y.to_dense(), vec![-2, 1, -1, 2]);
    }

    #[test]
    fn test_dimension_checked_before_fallback() {
        let m = random_matrix(3, 3, 1);
        assert!(m
            .mul_vector_parallel(&vec![1i64; 4], &ParallelConfig::default())
            .is_err());
    }
}
