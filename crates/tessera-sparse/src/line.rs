//! Row and column views.
//!
//! A line is a `(table, direction, index)` triple. It holds no tree
//! reference of its own: every access looks the tree up again through the
//! table, and the borrow of the parent keeps the parent from being resized
//! or permuted while the line is alive.

use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{AddAssign, Div, DivAssign, MulAssign, SubAssign};

use tessera_avl::Iter;
use tessera_rings::Ring;

use crate::error::{check_dim, check_index, Result, SparseError};
use crate::generic::GenericVector;
use crate::table::{CellId, Dir, Table};

/// A read-only row or column of a matrix.
pub struct Line<'a, E> {
    table: &'a Table<E>,
    dir: Dir,
    index: usize,
}

impl<E> Clone for Line<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Line<'_, E> {}

impl<'a, E: Ring> Line<'a, E> {
    pub(crate) fn new(table: &'a Table<E>, dir: Dir, index: usize) -> Self {
        Self { table, dir, index }
    }

    /// Returns the direction of this line.
    #[must_use]
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Returns the row (or column) index of this line.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the line length: the column count for a row, the row count
    /// for a column.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.table.dim(self.dir.cross())
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.table.line_len(self.dir, self.index)
    }

    /// Returns the entry at position `key`, zero if absent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `key >= dim()`.
    #[must_use]
    pub fn get(&self, key: usize) -> E {
        check_index(key, self.dim());
        let (row, col) = self.dir.position(self.index, key);
        self.table.get(row, col).map_or_else(E::zero, Cow::into_owned)
    }

    /// Iterates the stored entries in ascending position order.
    ///
    /// The iterator borrows the matrix, not the line.
    #[must_use]
    pub fn iter(&self) -> LineEntries<'a, E> {
        LineEntries::new(self.table, self.dir, self.index)
    }
}

impl<E: Ring> GenericVector<E> for Line<'_, E> {
    type Entries<'b> = LineEntries<'b, E> where Self: 'b, E: 'b;

    fn dim(&self) -> usize {
        Line::dim(self)
    }

    fn entries(&self) -> LineEntries<'_, E> {
        LineEntries::new(self.table, self.dir, self.index)
    }

    fn nnz(&self) -> usize {
        Line::nnz(self)
    }

    fn at(&self, index: usize) -> E {
        self.get(index)
    }
}

impl<'a, E: Ring> IntoIterator for Line<'a, E> {
    type Item = (usize, Cow<'a, E>);
    type IntoIter = LineEntries<'a, E>;

    fn into_iter(self) -> LineEntries<'a, E> {
        self.iter()
    }
}

/// Sparse text form: `(dim) (k v) (k v) ...`.
impl<E: Ring + fmt::Display> fmt::Display for Line<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.dim())?;
        for (k, x) in self.iter() {
            write!(f, " ({k} {x})")?;
        }
        Ok(())
    }
}

/// Entries of a line, with the symmetry transform applied.
pub struct LineEntries<'a, E> {
    table: &'a Table<E>,
    dir: Dir,
    index: usize,
    inner: Option<Iter<'a, CellId>>,
}

impl<'a, E: Ring> LineEntries<'a, E> {
    fn new(table: &'a Table<E>, dir: Dir, index: usize) -> Self {
        Self {
            table,
            dir,
            index,
            inner: table.tree(dir, index).map(|tree| tree.iter()),
        }
    }

    fn resolve(&self, key: usize, id: CellId) -> (usize, Cow<'a, E>) {
        let (row, _) = self.dir.position(self.index, key);
        (key, self.table.oriented(id, row))
    }
}

impl<'a, E: Ring> Iterator for LineEntries<'a, E> {
    type Item = (usize, Cow<'a, E>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, &id) = self.inner.as_mut()?.next()?;
        Some(self.resolve(key, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.as_ref().map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<E: Ring> DoubleEndedIterator for LineEntries<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (key, &id) = self.inner.as_mut()?.next_back()?;
        Some(self.resolve(key, id))
    }
}

impl<E: Ring> ExactSizeIterator for LineEntries<'_, E> {}

impl<E: Ring> FusedIterator for LineEntries<'_, E> {}

/// A mutable row or column of a matrix.
///
/// Writes honor the matrix symmetry: on a skew-symmetric matrix, writing
/// `x` at column `j > i` of row `i` stores `-x` in the lower triangle.
pub struct LineMut<'a, E> {
    table: &'a mut Table<E>,
    dir: Dir,
    index: usize,
}

impl<'a, E: Ring> LineMut<'a, E> {
    pub(crate) fn new(table: &'a mut Table<E>, dir: Dir, index: usize) -> Self {
        Self { table, dir, index }
    }

    /// Reborrows as a read-only line.
    #[must_use]
    pub fn as_line(&self) -> Line<'_, E> {
        Line::new(&*self.table, self.dir, self.index)
    }

    /// Returns the line length.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.table.dim(self.dir.cross())
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.table.line_len(self.dir, self.index)
    }

    /// Returns the entry at position `key`, zero if absent.
    #[must_use]
    pub fn get(&self, key: usize) -> E {
        self.as_line().get(key)
    }

    /// Iterates the stored entries in ascending position order.
    pub fn iter(&self) -> LineEntries<'_, E> {
        LineEntries::new(&*self.table, self.dir, self.index)
    }

    /// Writes `value` at position `key`; writing zero erases the entry.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric matrix.
    pub fn try_set(&mut self, key: usize, value: E) -> Result<()> {
        check_index(key, self.dim());
        let (row, col) = self.dir.position(self.index, key);
        self.table.set(row, col, value)
    }

    /// Writes `value` at position `key`; writing zero erases the entry.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric matrix,
    /// and in debug builds if `key >= dim()`.
    pub fn set(&mut self, key: usize, value: E) {
        if let Err(e) = self.try_set(key, value) {
            panic!("{e}");
        }
    }

    /// Adds `delta` to the entry at position `key`.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric matrix,
    /// and in debug builds if `key >= dim()`.
    pub fn add_to(&mut self, key: usize, delta: E) {
        check_index(key, self.dim());
        let (row, col) = self.dir.position(self.index, key);
        if let Err(e) = self.table.add_to(row, col, delta) {
            panic!("{e}");
        }
    }

    /// Removes the entry at position `key`, returning it.
    pub fn erase(&mut self, key: usize) -> Option<E> {
        check_index(key, self.dim());
        let (row, col) = self.dir.position(self.index, key);
        self.table.remove(row, col)
    }

    /// Rejects a source with a nonzero at this line's own index when the
    /// table is skew-symmetric.
    fn check_skew_diagonal<V>(&self, source: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        if self.table.layout().is_skew() && !source.at(self.index).is_zero() {
            return Err(SparseError::SkewDiagonal { index: self.index });
        }
        Ok(())
    }

    fn stored_keys(&self) -> Vec<usize> {
        self.table
            .tree(self.dir, self.index)
            .map_or_else(Vec::new, |tree| tree.keys().collect())
    }

    /// Erases every entry of the line.
    pub fn clear(&mut self) {
        for key in self.stored_keys() {
            self.erase(key);
        }
    }

    /// Replaces the contents of the line with `source`.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ, or if `source` puts a nonzero on the
    /// diagonal of a skew-symmetric matrix.
    pub fn assign<V>(&mut self, source: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("assign", self.dim(), source.dim())?;
        self.check_skew_diagonal(source)?;
        self.clear();
        for (key, value) in source.entries() {
            self.try_set(key, value.into_owned())?;
        }
        Ok(())
    }

    /// Adds `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ, or if `other` has a nonzero at the
    /// diagonal position of a skew-symmetric line. The line is left
    /// unchanged on failure.
    pub fn try_add_assign<V>(&mut self, other: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("add", self.dim(), other.dim())?;
        self.check_skew_diagonal(other)?;
        for (key, value) in other.entries() {
            let (row, col) = self.dir.position(self.index, key);
            self.table.add_to(row, col, value.into_owned())?;
        }
        Ok(())
    }

    /// Subtracts `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ, or if `other` has a nonzero at the
    /// diagonal position of a skew-symmetric line. The line is left
    /// unchanged on failure.
    pub fn try_sub_assign<V>(&mut self, other: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("sub", self.dim(), other.dim())?;
        self.check_skew_diagonal(other)?;
        for (key, value) in other.entries() {
            let (row, col) = self.dir.position(self.index, key);
            self.table.add_to(row, col, -value.into_owned())?;
        }
        Ok(())
    }

    fn rescale<F>(&mut self, mut op: F)
    where
        F: FnMut(E) -> E,
    {
        let updates: Vec<(usize, E)> = self
            .iter()
            .map(|(key, value)| (key, op(value.into_owned())))
            .collect();
        for (key, value) in updates {
            let (row, col) = self.dir.position(self.index, key);
            let written = self.table.set(row, col, value);
            debug_assert!(written.is_ok());
        }
    }
}

impl<E: Ring> GenericVector<E> for LineMut<'_, E> {
    type Entries<'b> = LineEntries<'b, E> where Self: 'b, E: 'b;

    fn dim(&self) -> usize {
        LineMut::dim(self)
    }

    fn entries(&self) -> LineEntries<'_, E> {
        self.iter()
    }

    fn nnz(&self) -> usize {
        LineMut::nnz(self)
    }

    fn at(&self, index: usize) -> E {
        self.get(index)
    }
}

/// # Panics
///
/// Panics if the dimensions differ, or on a nonzero at the diagonal
/// position of a skew-symmetric line.
impl<E: Ring, V: GenericVector<E> + ?Sized> AddAssign<&V> for LineMut<'_, E> {
    fn add_assign(&mut self, rhs: &V) {
        if let Err(e) = self.try_add_assign(rhs) {
            panic!("{e}");
        }
    }
}

/// # Panics
///
/// Panics if the dimensions differ, or on a nonzero at the diagonal
/// position of a skew-symmetric line.
impl<E: Ring, V: GenericVector<E> + ?Sized> SubAssign<&V> for LineMut<'_, E> {
    fn sub_assign(&mut self, rhs: &V) {
        if let Err(e) = self.try_sub_assign(rhs) {
            panic!("{e}");
        }
    }
}

impl<E: Ring> MulAssign<E> for LineMut<'_, E> {
    fn mul_assign(&mut self, rhs: E) {
        if rhs.is_zero() {
            self.clear();
        } else {
            self.rescale(|x| x * rhs.clone());
        }
    }
}

impl<E: Ring + Div<Output = E>> DivAssign<E> for LineMut<'_, E> {
    fn div_assign(&mut self, rhs: E) {
        self.rescale(|x| x / rhs.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Layout;

    fn table() -> Table<i64> {
        let mut table = Table::new(Layout::Full, 3, 3);
        table.set(0, 0, 1).unwrap();
        table.set(0, 2, 2).unwrap();
        table.set(2, 2, 3).unwrap();
        table
    }

    #[test]
    fn test_row_and_col_views() {
        let table = table();
        let row = Line::new(&table, Dir::Row, 0);
        let col = Line::new(&table, Dir::Col, 2);
        assert_eq!(row.dim(), 3);
        assert_eq!(row.nnz(), 2);
        assert_eq!(row.get(2), 2);
        assert_eq!(row.get(1), 0);
        assert_eq!(
            col.iter().map(|(k, v)| (k, *v)).collect::<Vec<_>>(),
            vec![(0, 2), (2, 3)]
        );
        assert_eq!(row.dot(&col), 2 * 3);
    }

    #[test]
    fn test_skew_line_signs() {
        let mut table = Table::new(Layout::SkewSymmetric, 3, 3);
        {
            let mut row = LineMut::new(&mut table, Dir::Row, 0);
            row.set(2, 5);
            assert_eq!(row.get(2), 5);
        }
        let row2 = Line::new(&table, Dir::Row, 2);
        assert_eq!(row2.get(0), -5);
        let col0 = Line::new(&table, Dir::Col, 0);
        assert_eq!(col0.iter().map(|(k, v)| (k, *v)).collect::<Vec<_>>(), vec![(2, -5)]);
    }

    #[test]
    fn test_line_arithmetic() {
        let mut table = table();
        let mut row = LineMut::new(&mut table, Dir::Row, 0);
        row += &vec![0i64, 4, -2];
        assert_eq!(row.to_dense(), vec![1, 4, 0]);
        row *= 3;
        assert_eq!(row.to_dense(), vec![3, 12, 0]);
        row /= 3;
        row -= &vec![1i64, 0, 0];
        assert_eq!(row.to_dense(), vec![0, 4, 0]);
        row.assign(&vec![7i64, 0, 7]).unwrap();
        assert_eq!(row.nnz(), 2);
        assert!(row.assign(&vec![1i64]).is_err());
        drop(row);
        assert!(table.is_consistent());
        assert_eq!(Line::new(&table, Dir::Col, 2).nnz(), 2);
    }

    #[test]
    fn test_skew_assign_rejects_diagonal() {
        let mut table: Table<i64> = Table::new(Layout::SkewSymmetric, 2, 2);
        let mut row = LineMut::new(&mut table, Dir::Row, 1);
        assert_eq!(
            row.assign(&vec![3i64, 1]),
            Err(SparseError::SkewDiagonal { index: 1 })
        );
        assert!(row.assign(&vec![3i64, 0]).is_ok());
        assert_eq!(row.get(0), 3);
    }

    #[test]
    fn test_skew_add_assign_rejects_diagonal_before_writing() {
        let mut table: Table<i64> = Table::new(Layout::SkewSymmetric, 3, 3);
        table.set(2, 1, 4).unwrap();
        {
            let mut row = LineMut::new(&mut table, Dir::Row, 1);
            assert_eq!(
                row.try_add_assign(&vec![5i64, 7, 0]),
                Err(SparseError::SkewDiagonal { index: 1 })
            );
            assert_eq!(
                row.try_sub_assign(&vec![5i64, 7, 0]),
                Err(SparseError::SkewDiagonal { index: 1 })
            );
            assert_eq!(row.to_dense(), vec![0, 0, -4]);
        }
        assert_eq!(table.nnz(), 1);
        assert!(table.get(1, 0).is_none());
        assert!(table.get(0, 1).is_none());
        assert!(table.is_consistent());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "index 3 out of range for dimension 3")]
    fn test_erase_bounds_checked_in_debug() {
        let mut table = table();
        LineMut::new(&mut table, Dir::Row, 0).erase(3);
    }
}
