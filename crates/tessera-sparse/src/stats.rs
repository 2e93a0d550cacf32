//! Size and magnitude statistics over a family of matrices.

use std::fmt;
use std::ops::AddAssign;

use tessera_rings::OrderedRing;

use crate::kinds::Symmetry;
use crate::matrix::SparseMatrix;

/// Running maxima collected by [`gather`](Self::gather).
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixStatistics<E> {
    /// Largest number of nonzeros seen in one matrix.
    pub max_nnz: usize,
    /// Largest row length.
    pub max_row_size: usize,
    /// Largest column length.
    pub max_col_size: usize,
    /// Largest absolute value of an entry.
    pub max_abs: E,
}

impl<E: OrderedRing> MatrixStatistics<E> {
    /// Creates all-zero statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_nnz: 0,
            max_row_size: 0,
            max_col_size: 0,
            max_abs: E::zero(),
        }
    }

    /// Folds one matrix into the maxima.
    ///
    /// Nonzeros are counted as the sum of the row lengths, so a symmetric
    /// off-diagonal pair counts twice.
    pub fn gather<S: Symmetry>(&mut self, matrix: &SparseMatrix<E, S>) {
        let mut nnz = 0;
        for row in matrix.rows() {
            for (_, value) in row.iter() {
                let abs = value.abs();
                if abs > self.max_abs {
                    self.max_abs = abs;
                }
            }
            let size = row.nnz();
            self.max_row_size = self.max_row_size.max(size);
            nnz += size;
        }
        self.max_nnz = self.max_nnz.max(nnz);
        for col in matrix.cols() {
            self.max_col_size = self.max_col_size.max(col.nnz());
        }
    }
}

impl<E: OrderedRing> Default for MatrixStatistics<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: OrderedRing> AddAssign<&Self> for MatrixStatistics<E> {
    fn add_assign(&mut self, rhs: &Self) {
        self.max_nnz = self.max_nnz.max(rhs.max_nnz);
        self.max_row_size = self.max_row_size.max(rhs.max_row_size);
        self.max_col_size = self.max_col_size.max(rhs.max_col_size);
        if rhs.max_abs > self.max_abs {
            self.max_abs = rhs.max_abs.clone();
        }
    }
}

impl<E: fmt::Display> fmt::Display for MatrixStatistics<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            ">>> {} nonzeroes,  max abs(element)={}",
            self.max_nnz, self.max_abs
        )?;
        write!(
            f,
            ">>> max row size={},  max col size={}",
            self.max_row_size, self.max_col_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::SkewSymmetric;
    use tessera_rings::Q;

    #[test]
    fn test_gather() {
        let m = SparseMatrix::<i64>::from_dense(&[vec![1, -7, 0], vec![0, 0, 0], vec![2, 3, 4]]);
        let stats = m.statistics();
        assert_eq!(stats.max_nnz, 5);
        assert_eq!(stats.max_row_size, 3);
        assert_eq!(stats.max_col_size, 2);
        assert_eq!(stats.max_abs, 7);
    }

    #[test]
    fn test_skew_pairs_count_twice() {
        let mut m = SparseMatrix::<i64, SkewSymmetric>::new(3, 3);
        m.set(2, 0, -9);
        let stats = m.statistics();
        assert_eq!(stats.max_nnz, 2);
        assert_eq!(stats.max_abs, 9);
    }

    #[test]
    fn test_accumulate_and_display() {
        let mut total = MatrixStatistics::<Q>::new();
        total.gather(&SparseMatrix::<Q>::from_dense(&[vec![Q::new(1, 2), Q::from_integer(0)]]));
        let mut other = MatrixStatistics::new();
        other.gather(&SparseMatrix::<Q>::from_dense(&[vec![Q::new(-3, 4)], vec![Q::new(1, 5)]]));
        total += &other;
        assert_eq!(total.max_abs, Q::new(3, 4));
        assert_eq!(total.max_col_size, 2);
        assert_eq!(
            total.to_string(),
            ">>> 2 nonzeroes,  max abs(element)=3/4\n>>> max row size=1,  max col size=2"
        );
    }
}
