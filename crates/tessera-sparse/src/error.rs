//! Errors of the sparse layer.
//!
//! Bounds violations are programming errors: they are checked only in
//! debug builds and reported by panicking with a [`SparseError`] message.
//! Dimension and permutation mismatches are always checked and returned.

use thiserror::Error;

/// Everything that can go wrong in a sparse container operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SparseError {
    /// A vector or line index outside `0..dim`.
    #[error("index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The dimension it was checked against.
        dim: usize,
    },
    /// A matrix position outside `0..rows` x `0..cols`.
    #[error("element ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    ElementOutOfRange {
        /// Row of the position.
        row: usize,
        /// Column of the position.
        col: usize,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// Operands of incompatible dimensions.
    #[error("{op}: dimension mismatch, expected {expected}, got {got}")]
    DimensionMismatch {
        /// Operation that was attempted.
        op: &'static str,
        /// Dimension the operation required.
        expected: usize,
        /// Dimension that was supplied.
        got: usize,
    },
    /// An index array that is not a permutation of `0..len`.
    #[error("not a permutation of 0..{len}")]
    InvalidPermutation {
        /// Required length.
        len: usize,
    },
    /// An operation across the direction a restricted table does not store.
    #[error("{op} needs lines the restricted table does not store")]
    Restricted {
        /// Operation that was attempted.
        op: &'static str,
    },
    /// A nonzero write to the diagonal of a skew-symmetric matrix.
    #[error("diagonal entry ({index}, {index}) of a skew-symmetric matrix must stay zero")]
    SkewDiagonal {
        /// Row and column of the diagonal entry.
        index: usize,
    },
}

/// Result alias for sparse operations.
pub type Result<T> = std::result::Result<T, SparseError>;

/// Panics if `index >= dim`, in debug builds only.
#[inline]
#[track_caller]
pub(crate) fn check_index(index: usize, dim: usize) {
    if cfg!(debug_assertions) && index >= dim {
        panic!("{}", SparseError::IndexOutOfRange { index, dim });
    }
}

/// Panics if `(row, col)` lies outside the matrix, in debug builds only.
#[inline]
#[track_caller]
pub(crate) fn check_element(row: usize, col: usize, rows: usize, cols: usize) {
    if cfg!(debug_assertions) && (row >= rows || col >= cols) {
        panic!(
            "{}",
            SparseError::ElementOutOfRange {
                row,
                col,
                rows,
                cols
            }
        );
    }
}

pub(crate) fn check_dim(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(SparseError::DimensionMismatch { op, expected, got })
    }
}

/// Checks that `perm` lists every index of `0..len` exactly once.
pub(crate) fn check_permutation(perm: &[usize], len: usize) -> Result<()> {
    check_dim("permutation", len, perm.len())?;
    let mut seen = vec![false; len];
    for &p in perm {
        if p >= len || std::mem::replace(&mut seen[p], true) {
            return Err(SparseError::InvalidPermutation { len });
        }
    }
    Ok(())
}

/// Returns `inv` with `inv[perm[i]] == i`.
pub(crate) fn invert_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}
