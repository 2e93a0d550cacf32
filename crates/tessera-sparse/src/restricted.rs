//! Builder matrices that keep lines in one direction only.
//!
//! A [`RestrictedSparseMatrix`] is filled line by line and then moved into a
//! [`SparseMatrix`], which builds the missing direction in a single pass.
//! Only the stored direction can be read: an `OnlyRows` matrix has `row`
//! but no `col`.

use std::marker::PhantomData;
use std::ops::{BitOrAssign, DivAssign};

use tessera_rings::Ring;

use crate::error::{check_dim, check_element, check_index, Result};
use crate::generic::GenericVector;
use crate::kinds::{Layout, NonSymmetric, OnlyCols, OnlyRows, Restriction};
use crate::line::{Line, LineMut};
use crate::matrix::SparseMatrix;
use crate::table::{Dir, Table};

/// A sparse matrix under construction, storing only rows or only columns.
///
/// # Example
///
/// ```
/// use tessera_sparse::{OnlyCols, RestrictedSparseMatrix, SparseMatrix};
///
/// let mut builder = RestrictedSparseMatrix::<i64, OnlyCols>::new();
/// builder |= &vec![1, 0, 2];
/// builder |= &vec![0, 0, 5];
/// let m: SparseMatrix<i64> = builder.into_matrix();
/// assert_eq!((m.num_rows(), m.num_cols()), (3, 2));
/// assert_eq!(m.row(2).nnz(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct RestrictedSparseMatrix<E, R = OnlyRows> {
    table: Table<E>,
    restriction: PhantomData<R>,
}

const fn stored(layout: Layout) -> Dir {
    match layout {
        Layout::OnlyCols => Dir::Col,
        _ => Dir::Row,
    }
}

impl<E: Ring, R: Restriction> RestrictedSparseMatrix<E, R> {
    /// Creates an empty `0 x 0` builder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dims(0, 0)
    }

    /// Creates an all-zero builder of the given shape.
    #[must_use]
    pub fn with_dims(rows: usize, cols: usize) -> Self {
        Self {
            table: Table::new(R::LAYOUT, rows, cols),
            restriction: PhantomData,
        }
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.table.num_cols()
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.table.nnz()
    }

    /// Returns the entry at `(i, j)`, zero if absent.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> E {
        check_element(i, j, self.num_rows(), self.num_cols());
        self.table.get(i, j).map_or_else(E::zero, |v| v.into_owned())
    }

    /// Writes `value` at `(i, j)`; writing zero erases the entry.
    pub fn set(&mut self, i: usize, j: usize, value: E) {
        check_element(i, j, self.num_rows(), self.num_cols());
        let written = self.table.set(i, j, value);
        debug_assert!(written.is_ok());
    }

    fn append_line<V>(&mut self, dir: Dir, line: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        let cross = dir.cross();
        let mut dims = [self.num_rows(), self.num_cols()];
        let cross_slot = usize::from(cross == Dir::Col);
        if dir == stored(R::LAYOUT) {
            dims[cross_slot] = dims[cross_slot].max(line.dim());
        } else if self.table.dim(dir) == 0 && self.table.dim(cross) == 0 {
            dims[cross_slot] = line.dim();
        } else {
            let op = match dir {
                Dir::Row => "append_row",
                Dir::Col => "append_col",
            };
            check_dim(op, self.table.dim(cross), line.dim())?;
        }
        self.table.resize(dims[0], dims[1]);
        let index = self.table.push_line(dir);
        for (key, value) in line.entries() {
            let (row, col) = dir.position(index, key);
            self.table.create(row, col, value.into_owned());
        }
        Ok(())
    }

    /// Appends a row.
    ///
    /// A row-only builder widens to fit `row`; a column-only builder needs
    /// `row.dim()` to equal its column count.
    ///
    /// # Errors
    ///
    /// Fails on a column-only builder when the dimensions differ.
    pub fn append_row<V>(&mut self, row: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        self.append_line(Dir::Row, row)
    }

    /// Appends a column.
    ///
    /// A column-only builder grows to fit `col`; a row-only builder needs
    /// `col.dim()` to equal its row count.
    ///
    /// # Errors
    ///
    /// Fails on a row-only builder when the dimensions differ.
    pub fn append_col<V>(&mut self, col: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        self.append_line(Dir::Col, col)
    }

    /// Removes empty stored lines and renumbers the rest.
    pub fn squeeze(&mut self) {
        self.squeeze_with(|_, _| {});
    }

    /// Removes empty stored lines, reporting each old index with its new
    /// index (or `None` if it was removed).
    pub fn squeeze_with<F>(&mut self, renumbered: F)
    where
        F: FnMut(usize, Option<usize>),
    {
        self.table.squeeze_stored(stored(R::LAYOUT), renumbered);
    }

    /// Moves the contents into a full matrix.
    #[must_use]
    pub fn into_matrix(self) -> SparseMatrix<E> {
        SparseMatrix::from_table(self.table.into_full())
    }
}

impl<E: Ring> RestrictedSparseMatrix<E, OnlyRows> {
    /// Returns row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> Line<'_, E> {
        check_index(i, self.num_rows());
        Line::new(&self.table, Dir::Row, i)
    }

    /// Returns row `i` for writing.
    pub fn row_mut(&mut self, i: usize) -> LineMut<'_, E> {
        check_index(i, self.num_rows());
        LineMut::new(&mut self.table, Dir::Row, i)
    }

    /// Returns all rows in order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = Line<'_, E>> + ExactSizeIterator + '_ {
        (0..self.num_rows()).map(move |i| Line::new(&self.table, Dir::Row, i))
    }

    /// Reorders rows so that new row `i` is old row `perm[i]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_rows()`.
    pub fn permute_rows(&mut self, perm: &[usize]) -> Result<()> {
        self.table.permute(Dir::Row, perm, false)
    }

    /// Reorders rows so that old row `i` becomes row `perm[i]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_rows()`.
    pub fn permute_inv_rows(&mut self, perm: &[usize]) -> Result<()> {
        self.table.permute(Dir::Row, perm, true)
    }
}

impl<E: Ring> RestrictedSparseMatrix<E, OnlyCols> {
    /// Returns column `j`.
    #[must_use]
    pub fn col(&self, j: usize) -> Line<'_, E> {
        check_index(j, self.num_cols());
        Line::new(&self.table, Dir::Col, j)
    }

    /// Returns column `j` for writing.
    pub fn col_mut(&mut self, j: usize) -> LineMut<'_, E> {
        check_index(j, self.num_cols());
        LineMut::new(&mut self.table, Dir::Col, j)
    }

    /// Returns all columns in order.
    pub fn cols(&self) -> impl DoubleEndedIterator<Item = Line<'_, E>> + ExactSizeIterator + '_ {
        (0..self.num_cols()).map(move |j| Line::new(&self.table, Dir::Col, j))
    }

    /// Reorders columns so that new column `j` is old column `perm[j]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_cols()`.
    pub fn permute_cols(&mut self, perm: &[usize]) -> Result<()> {
        self.table.permute(Dir::Col, perm, false)
    }

    /// Reorders columns so that old column `j` becomes column `perm[j]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_cols()`.
    pub fn permute_inv_cols(&mut self, perm: &[usize]) -> Result<()> {
        self.table.permute(Dir::Col, perm, true)
    }
}

impl<E: Ring, R: Restriction> Default for RestrictedSparseMatrix<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends a row.
///
/// # Panics
///
/// Panics if the row does not fit a column-only builder.
impl<E: Ring, R: Restriction, V: GenericVector<E> + ?Sized> DivAssign<&V>
    for RestrictedSparseMatrix<E, R>
{
    fn div_assign(&mut self, rhs: &V) {
        if let Err(e) = self.append_row(rhs) {
            panic!("{e}");
        }
    }
}

/// Appends a column.
///
/// # Panics
///
/// Panics if the column does not fit a row-only builder.
impl<E: Ring, R: Restriction, V: GenericVector<E> + ?Sized> BitOrAssign<&V>
    for RestrictedSparseMatrix<E, R>
{
    fn bitor_assign(&mut self, rhs: &V) {
        if let Err(e) = self.append_col(rhs) {
            panic!("{e}");
        }
    }
}

impl<E: Ring, R: Restriction> From<RestrictedSparseMatrix<E, R>> for SparseMatrix<E, NonSymmetric> {
    fn from(builder: RestrictedSparseMatrix<E, R>) -> Self {
        builder.into_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SparseError;
    use crate::vector::SparseVector;

    #[test]
    fn test_row_builder_widens() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyRows>::new();
        b /= &vec![1, 0];
        b /= &SparseVector::from_pairs(4, [(3, 7)]);
        assert_eq!((b.num_rows(), b.num_cols()), (2, 4));
        assert_eq!(b.row(1).get(3), 7);
        assert_eq!(b.rows().map(|r| r.nnz()).collect::<Vec<_>>(), vec![1, 1]);
        let m = b.into_matrix();
        assert_eq!(m.col(3).nnz(), 1);
        assert_eq!(m.col(0).get(0), 1);
    }

    #[test]
    fn test_cross_append_checks_dimension() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyRows>::new();
        b.append_row(&vec![1, 2]).unwrap();
        b.append_row(&vec![3, 4]).unwrap();
        b.append_col(&vec![5, 0]).unwrap();
        assert_eq!(b.get(0, 2), 5);
        assert_eq!(
            b.append_col(&vec![1, 2, 3]),
            Err(SparseError::DimensionMismatch {
                op: "append_col",
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_column_builder() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyCols>::with_dims(0, 0);
        b.append_col(&vec![0, 2]).unwrap();
        b.append_col(&vec![0, 0, 0, 9]).unwrap();
        b.col_mut(0).set(0, 4);
        assert_eq!(b.num_rows(), 4);
        assert_eq!(b.col(1).get(3), 9);
        b.permute_cols(&[1, 0]).unwrap();
        assert_eq!(b.col(0).get(3), 9);
        let m: SparseMatrix<i64> = SparseMatrix::from(b);
        assert_eq!(m.to_dense(), vec![vec![0, 4], vec![0, 2], vec![0, 0], vec![9, 0]]);
    }

    #[test]
    fn test_squeeze_stored_lines() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyRows>::new();
        b /= &vec![0, 0];
        b /= &vec![0, 3];
        b /= &vec![0, 0];
        let mut removed = Vec::new();
        b.squeeze_with(|old, new| {
            if new.is_none() {
                removed.push(old);
            }
        });
        assert_eq!(removed, vec![0, 2]);
        assert_eq!((b.num_rows(), b.num_cols()), (1, 2));
        b.permute_inv_rows(&[0]).unwrap();
        assert_eq!(b.row(0).get(1), 3);
    }

    #[test]
    fn test_set_writes_and_erases() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyRows>::with_dims(2, 2);
        b.set(1, 1, 6);
        b.set(0, 1, -2);
        assert_eq!((b.get(1, 1), b.get(0, 1)), (6, -2));
        b.set(1, 1, 0);
        assert_eq!(b.nnz(), 1);
        assert_eq!(b.row(1).nnz(), 0);
    }

    #[test]
    #[should_panic(expected = "append_row: dimension mismatch")]
    fn test_row_into_column_builder_panics() {
        let mut b = RestrictedSparseMatrix::<i64, OnlyCols>::new();
        b |= &vec![1, 2];
        b /= &vec![1, 2, 3];
    }
}
