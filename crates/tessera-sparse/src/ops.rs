//! Matrix arithmetic.
//!
//! In-place operators mutate through copy-on-write; binary operators on
//! references clone the left operand first. Operators panic on dimension
//! mismatch, the `try_` methods return the error instead.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use tessera_avl::AvlTree;
use tessera_rings::Ring;

use crate::error::{check_dim, Result};
use crate::generic::GenericVector;
use crate::kinds::{NonSymmetric, Symmetry};
use crate::matrix::SparseMatrix;
use crate::table::Table;
use crate::vector::SparseVector;

impl<E: Ring, S: Symmetry> SparseMatrix<E, S> {
    fn accumulate(&mut self, other: &Self, op: &'static str, negate: bool) -> Result<()> {
        check_dim(op, self.num_rows(), other.num_rows())?;
        check_dim(op, self.num_cols(), other.num_cols())?;
        if other.nnz() == 0 {
            return Ok(());
        }
        let table = self.table_mut();
        // Both tables share the layout, so stored coordinates are canonical
        // on either side.
        for (row, col, value) in other.table().cells() {
            let delta = if negate { -value.clone() } else { value.clone() };
            table.add_to(row, col, delta)?;
        }
        Ok(())
    }

    /// Adds `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the shapes differ.
    pub fn try_add_assign(&mut self, other: &Self) -> Result<()> {
        self.accumulate(other, "add", false)
    }

    /// Subtracts `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the shapes differ.
    pub fn try_sub_assign(&mut self, other: &Self) -> Result<()> {
        self.accumulate(other, "sub", true)
    }

    /// Computes the product `self * other`.
    ///
    /// # Errors
    ///
    /// Fails if `self.num_cols() != other.num_rows()`.
    pub fn product<S2: Symmetry>(&self, other: &SparseMatrix<E, S2>) -> Result<SparseMatrix<E>> {
        check_dim("mul", self.num_cols(), other.num_rows())?;
        let mut table = Table::new(NonSymmetric::LAYOUT, self.num_rows(), other.num_cols());
        for (i, row) in self.rows().enumerate() {
            let mut sums: AvlTree<E> = AvlTree::new();
            for (k, a) in row {
                let a = a.into_owned();
                for (j, b) in other.row(k) {
                    let term = a.clone() * b.into_owned();
                    match sums.get_mut(j) {
                        Some(sum) => *sum = sum.clone() + term,
                        None => {
                            sums.insert(j, term);
                        }
                    }
                }
            }
            for (j, sum) in sums {
                if !sum.is_zero() {
                    table.create(i, j, sum);
                }
            }
        }
        Ok(SparseMatrix::from_table(table))
    }

    /// Computes the matrix-vector product `self * v`.
    ///
    /// # Errors
    ///
    /// Fails if `v.dim() != self.num_cols()`.
    pub fn mul_vector<V>(&self, v: &V) -> Result<SparseVector<E>>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("mul_vector", self.num_cols(), v.dim())?;
        let entries = self
            .rows()
            .enumerate()
            .filter_map(|(i, row)| {
                let x = row.dot(v);
                (!x.is_zero()).then_some((i, x))
            })
            .collect();
        Ok(SparseVector::from_sorted_entries(self.num_rows(), entries))
    }
}

/// # Panics
///
/// Panics if the shapes differ.
impl<E: Ring, S: Symmetry> AddAssign<&Self> for SparseMatrix<E, S> {
    fn add_assign(&mut self, rhs: &Self) {
        if let Err(e) = self.try_add_assign(rhs) {
            panic!("{e}");
        }
    }
}

/// # Panics
///
/// Panics if the shapes differ.
impl<E: Ring, S: Symmetry> SubAssign<&Self> for SparseMatrix<E, S> {
    fn sub_assign(&mut self, rhs: &Self) {
        if let Err(e) = self.try_sub_assign(rhs) {
            panic!("{e}");
        }
    }
}

impl<E: Ring, S: Symmetry> MulAssign<E> for SparseMatrix<E, S> {
    fn mul_assign(&mut self, rhs: E) {
        if rhs.is_zero() {
            *self = Self::new(self.num_rows(), self.num_cols());
        } else if self.nnz() > 0 {
            self.table_mut().update_values(|x| x.clone() * rhs.clone());
        }
    }
}

impl<E: Ring + Div<Output = E>, S: Symmetry> DivAssign<E> for SparseMatrix<E, S> {
    fn div_assign(&mut self, rhs: E) {
        if self.nnz() > 0 {
            self.table_mut().update_values(|x| x.clone() / rhs.clone());
        }
    }
}

impl<E: Ring, S: Symmetry> Add for &SparseMatrix<E, S> {
    type Output = SparseMatrix<E, S>;

    fn add(self, rhs: Self) -> SparseMatrix<E, S> {
        let mut sum = self.clone();
        sum += rhs;
        sum
    }
}

impl<E: Ring, S: Symmetry> Sub for &SparseMatrix<E, S> {
    type Output = SparseMatrix<E, S>;

    fn sub(self, rhs: Self) -> SparseMatrix<E, S> {
        let mut difference = self.clone();
        difference -= rhs;
        difference
    }
}

impl<E: Ring, S: Symmetry> Neg for &SparseMatrix<E, S> {
    type Output = SparseMatrix<E, S>;

    fn neg(self) -> SparseMatrix<E, S> {
        self.map_nonzero(|x| -x.clone())
    }
}

/// # Panics
///
/// Panics if the inner dimensions differ.
impl<E: Ring, S: Symmetry, S2: Symmetry> Mul<&SparseMatrix<E, S2>> for &SparseMatrix<E, S> {
    type Output = SparseMatrix<E>;

    fn mul(self, rhs: &SparseMatrix<E, S2>) -> SparseMatrix<E> {
        match self.product(rhs) {
            Ok(product) => product,
            Err(e) => panic!("{e}"),
        }
    }
}

/// # Panics
///
/// Panics if the dimensions differ.
impl<E: Ring, S: Symmetry> Mul<&SparseVector<E>> for &SparseMatrix<E, S> {
    type Output = SparseVector<E>;

    fn mul(self, rhs: &SparseVector<E>) -> SparseVector<E> {
        match self.mul_vector(rhs) {
            Ok(product) => product,
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SparseError;
    use crate::kinds::{SkewSymmetric, Symmetric};

    fn a() -> SparseMatrix<i64> {
        SparseMatrix::from_dense(&[vec![1, 0, 2], vec![0, 3, 0]])
    }

    #[test]
    fn test_add_cancels_to_nothing() {
        let m = a();
        let diff = &m - &m;
        assert_eq!(diff.nnz(), 0);
        assert_eq!((diff.num_rows(), diff.num_cols()), (2, 3));
        let sum = &m + &m;
        assert_eq!(sum.get(0, 2), 4);
        assert_eq!(&-&m + &m, SparseMatrix::<i64>::new(2, 3));
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let mut m = a();
        assert!(matches!(
            m.try_add_assign(&SparseMatrix::new(3, 2)),
            Err(SparseError::DimensionMismatch { op: "add", .. })
        ));
    }

    #[test]
    fn test_self_add_through_shared_handle() {
        let mut m = a();
        let same = m.clone();
        m += &same;
        assert_eq!(m.get(1, 1), 6);
        assert_eq!(same.get(1, 1), 3);
    }

    #[test]
    fn test_scalar_ops() {
        let mut m = a();
        m *= 3;
        assert_eq!(m.get(0, 2), 6);
        m /= 3;
        assert_eq!(m, a());
        m *= 0;
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.num_cols(), 3);
    }

    #[test]
    fn test_symmetric_add_keeps_mirror() {
        let mut s = SparseMatrix::<i64, SkewSymmetric>::new(3, 3);
        s.set(0, 2, 1);
        let mut t = SparseMatrix::<i64, SkewSymmetric>::new(3, 3);
        t.set(2, 0, 4);
        s += &t;
        assert_eq!(s.get(2, 0), 3);
        assert_eq!(s.get(0, 2), -3);
    }

    #[test]
    fn test_product() {
        let m = a();
        let sym = SparseMatrix::<i64, Symmetric>::from_dense(&[
            vec![1, 0, 0],
            vec![5, 2, 0],
            vec![0, 0, 1],
        ]);
        let p = &m * &sym;
        assert_eq!(p.to_dense(), vec![vec![1, 5, 2], vec![15, 6, 0]]);
        let id = SparseMatrix::<i64>::identity(3);
        assert_eq!(&m * &id, m);
        assert!(m.product(&m).is_err());
    }

    #[test]
    fn test_mul_vector() {
        let m = a();
        let v = SparseVector::from_dense(&[1i64, 1, -1]);
        let y = &m * &v;
        assert_eq!(y.dim(), 2);
        assert_eq!(y.get(0), -1);
        assert_eq!(y.get(1), 3);
        assert!(m.mul_vector(&vec![1i64, 2]).is_err());
    }
}
