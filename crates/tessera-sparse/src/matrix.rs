//! The sparse matrix.
//!
//! [`SparseMatrix`] owns a copy-on-write handle to a [`Table`]. Cloning a
//! matrix is O(1); the first mutation through a handle whose table is shared
//! copies the table. Operations that turn out not to change anything (zero
//! writes to absent entries, `remove0s` on a clean matrix) do not copy.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use log::{trace, warn};
use tessera_rings::{OrderedRing, Ring};

use crate::error::{check_dim, check_element, check_index, check_permutation, Result};
use crate::generic::GenericVector;
use crate::kinds::{Layout, NonSymmetric, Symmetry};
use crate::line::{Line, LineMut};
use crate::minor::{Minor, MinorMut};
use crate::stats::MatrixStatistics;
use crate::table::{Dir, Table};

/// Divorcing a shared table with more cells than this is reported.
const LARGE_TABLE: usize = 1 << 20;

/// A sparse matrix over `E` with symmetry discipline `S`.
///
/// # Example
///
/// ```
/// use tessera_sparse::{SkewSymmetric, SparseMatrix};
///
/// let mut m = SparseMatrix::<i64, SkewSymmetric>::new(3, 3);
/// m.set(0, 1, 5);
/// assert_eq!(m.get(1, 0), -5);
/// assert_eq!(m.get(0, 0), 0);
/// assert_eq!(m.nnz(), 1);
/// ```
pub struct SparseMatrix<E, S = NonSymmetric> {
    table: Arc<Table<E>>,
    symmetry: PhantomData<S>,
}

impl<E, S> Clone for SparseMatrix<E, S> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            symmetry: PhantomData,
        }
    }
}

impl<E: Ring, S: Symmetry> SparseMatrix<E, S> {
    /// Creates an all-zero matrix.
    ///
    /// # Panics
    ///
    /// Panics if `S` is symmetric and `rows != cols`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_table(Table::new(S::LAYOUT, rows, cols))
    }

    pub(crate) fn from_table(table: Table<E>) -> Self {
        debug_assert!(table.layout() == S::LAYOUT);
        Self {
            table: Arc::new(table),
            symmetry: PhantomData,
        }
    }

    /// Creates a matrix from dense rows.
    ///
    /// Symmetric kinds read the lower triangle only (the strict lower
    /// triangle for skew-symmetric ones).
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths, or if `S` is symmetric and
    /// the input is not square.
    #[must_use]
    pub fn from_dense(rows: &[Vec<E>]) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == num_cols),
            "dense rows differ in length"
        );
        Self::from_row_major(num_rows, num_cols, rows.iter().flatten().cloned())
    }

    /// Creates a matrix from values listed row by row.
    ///
    /// Zeros are skipped; values beyond `rows * cols` are ignored. Symmetric
    /// kinds read the lower triangle only.
    ///
    /// # Panics
    ///
    /// Panics if `S` is symmetric and `rows != cols`.
    #[must_use]
    pub fn from_row_major<I>(rows: usize, cols: usize, values: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        let mut table = Table::new(S::LAYOUT, rows, cols);
        if cols > 0 {
            for (k, value) in values.into_iter().take(rows * cols).enumerate() {
                let (i, j) = (k / cols, k % cols);
                if keeps(S::LAYOUT, i, j) && !value.is_zero() {
                    table.create(i, j, value);
                }
            }
        }
        Self::from_table(table)
    }

    /// Creates a matrix from row vectors of dimension `cols`.
    ///
    /// Symmetric kinds read the lower triangle only.
    ///
    /// # Errors
    ///
    /// Fails if a row has the wrong dimension, or if `S` is symmetric and
    /// the number of rows differs from `cols`.
    pub fn from_rows<'v, V, I>(cols: usize, rows: I) -> Result<Self>
    where
        V: GenericVector<E> + ?Sized + 'v,
        I: IntoIterator<Item = &'v V>,
        E: 'v,
    {
        let rows: Vec<&V> = rows.into_iter().collect();
        if S::LAYOUT.is_symmetric() {
            check_dim("from_rows", cols, rows.len())?;
        }
        let mut table = Table::new(S::LAYOUT, rows.len(), cols);
        for (i, row) in rows.into_iter().enumerate() {
            check_dim("from_rows", cols, row.dim())?;
            for (j, value) in row.entries() {
                if !keeps(S::LAYOUT, i, j) {
                    break;
                }
                table.create(i, j, value.into_owned());
            }
        }
        Ok(Self::from_table(table))
    }

    /// Creates a matrix by adding up `(row, col, value)` triplets.
    ///
    /// On symmetric kinds `(i, j)` and `(j, i)` name the same entry.
    ///
    /// # Errors
    ///
    /// Fails if the triplets put a nonzero on the diagonal of a
    /// skew-symmetric matrix.
    ///
    /// # Panics
    ///
    /// In debug builds, panics on a position outside the matrix.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, E)]) -> Result<Self> {
        let mut table = Table::new(S::LAYOUT, rows, cols);
        for (i, j, value) in triplets {
            check_element(*i, *j, rows, cols);
            table.add_to(*i, *j, value.clone())?;
        }
        Ok(Self::from_table(table))
    }

    /// Creates the `n x n` identity matrix.
    ///
    /// # Panics
    ///
    /// Panics if `S` is skew-symmetric.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        assert!(
            !S::LAYOUT.is_skew(),
            "a skew-symmetric matrix has no identity"
        );
        let mut table = Table::new(S::LAYOUT, n, n);
        for i in 0..n {
            table.create(i, i, E::one());
        }
        Self::from_table(table)
    }

    /// Copies a matrix of another symmetry kind.
    ///
    /// Symmetric targets read the lower triangle of `other`.
    ///
    /// # Errors
    ///
    /// Fails if the target is symmetric and `other` is not square.
    pub fn from_matrix<S2: Symmetry>(other: &SparseMatrix<E, S2>) -> Result<Self> {
        if S::LAYOUT.is_symmetric() {
            check_dim("from_matrix", other.num_rows(), other.num_cols())?;
        }
        let mut table = Table::new(S::LAYOUT, other.num_rows(), other.num_cols());
        for (i, line) in other.rows().enumerate() {
            for (j, value) in line {
                if !keeps(S::LAYOUT, i, j) {
                    break;
                }
                table.create(i, j, value.into_owned());
            }
        }
        Ok(Self::from_table(table))
    }

    /// Converts the element type.
    #[must_use]
    pub fn convert<F>(&self) -> SparseMatrix<F, S>
    where
        F: Ring + From<E>,
    {
        self.map_nonzero(|x| F::from(x.clone()))
    }

    /// Maps every stored value through `f`, dropping zero results.
    ///
    /// On skew-symmetric matrices `f` sees the lower-triangle values and
    /// should commute with negation.
    #[must_use]
    pub fn map_nonzero<F, M>(&self, mut f: M) -> SparseMatrix<F, S>
    where
        F: Ring,
        M: FnMut(&E) -> F,
    {
        let mut table = Table::new(S::LAYOUT, self.num_rows(), self.num_cols());
        for (row, col, value) in self.table.cells() {
            let mapped = f(value);
            if !mapped.is_zero() {
                table.create(row, col, mapped);
            }
        }
        SparseMatrix::from_table(table)
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
    ///
    /// A symmetric pair `(i, j)`, `(j, i)` is stored once.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.table.nnz()
    }

    /// Returns true if another handle shares this matrix's table.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.table) > 1
    }

    pub(crate) fn table(&self) -> &Table<E> {
        &self.table
    }

    /// Returns the table for mutation, copying it first if it is shared.
    pub(crate) fn table_mut(&mut self) -> &mut Table<E> {
        if Arc::strong_count(&self.table) > 1 {
            let cells = self.table.nnz();
            trace!(
                target: "tessera_sparse",
                "copy-on-write: {}x{} table with {cells} cells",
                self.table.num_rows(),
                self.table.num_cols()
            );
            if cells > LARGE_TABLE {
                warn!(
                    target: "tessera_perf",
                    "copying a shared table with {cells} cells before mutation"
                );
            }
        }
        Arc::make_mut(&mut self.table)
    }

    /// Returns the entry at `(i, j)`, zero if absent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the position is outside the matrix.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> E {
        self.entry(i, j).map_or_else(E::zero, Cow::into_owned)
    }

    /// Returns the stored entry at `(i, j)`.
    ///
    /// The value is borrowed unless it had to be negated.
    #[must_use]
    pub fn entry(&self, i: usize, j: usize) -> Option<Cow<'_, E>> {
        check_element(i, j, self.num_rows(), self.num_cols());
        self.table.get(i, j)
    }

    /// Returns true if a nonzero is stored at `(i, j)`.
    #[must_use]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.entry(i, j).is_some()
    }

    /// Writes `value` at `(i, j)`; writing zero erases the entry.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric matrix.
    pub fn try_set(&mut self, i: usize, j: usize, value: E) -> Result<()> {
        check_element(i, j, self.num_rows(), self.num_cols());
        if value.is_zero() && self.table.get(i, j).is_none() {
            return Ok(());
        }
        self.table_mut().set(i, j, value)
    }

    /// Writes `value` at `(i, j)`; writing zero erases the entry.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric matrix,
    /// and in debug builds if the position is outside the matrix.
    pub fn set(&mut self, i: usize, j: usize, value: E) {
        if let Err(e) = self.try_set(i, j, value) {
            panic!("{e}");
        }
    }

    /// Adds `delta` to the entry at `(i, j)`.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric matrix.
    pub fn try_add_to(&mut self, i: usize, j: usize, delta: E) -> Result<()> {
        check_element(i, j, self.num_rows(), self.num_cols());
        if delta.is_zero() {
            return Ok(());
        }
        self.table_mut().add_to(i, j, delta)
    }

    /// Adds `delta` to the entry at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric matrix,
    /// and in debug builds if the position is outside the matrix.
    pub fn add_to(&mut self, i: usize, j: usize, delta: E) {
        if let Err(e) = self.try_add_to(i, j, delta) {
            panic!("{e}");
        }
    }

    /// Erases the entry at `(i, j)`, returning it.
    pub fn erase(&mut self, i: usize, j: usize) -> Option<E> {
        if self.contains(i, j) {
            self.table_mut().remove(i, j)
        } else {
            None
        }
    }

    /// Returns row `i`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `i >= num_rows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> Line<'_, E> {
        check_index(i, self.num_rows());
        Line::new(&self.table, Dir::Row, i)
    }

    /// Returns column `j`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `j >= num_cols()`.
    #[must_use]
    pub fn col(&self, j: usize) -> Line<'_, E> {
        check_index(j, self.num_cols());
        Line::new(&self.table, Dir::Col, j)
    }

    /// Returns row `i` for writing.
    pub fn row_mut(&mut self, i: usize) -> LineMut<'_, E> {
        check_index(i, self.num_rows());
        LineMut::new(self.table_mut(), Dir::Row, i)
    }

    /// Returns column `j` for writing.
    pub fn col_mut(&mut self, j: usize) -> LineMut<'_, E> {
        check_index(j, self.num_cols());
        LineMut::new(self.table_mut(), Dir::Col, j)
    }

    /// Returns all rows in order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = Line<'_, E>> + ExactSizeIterator + '_ {
        let table: &Table<E> = &self.table;
        (0..self.num_rows()).map(move |i| Line::new(table, Dir::Row, i))
    }

    /// Returns all columns in order.
    pub fn cols(&self) -> impl DoubleEndedIterator<Item = Line<'_, E>> + ExactSizeIterator + '_ {
        let table: &Table<E> = &self.table;
        (0..self.num_cols()).map(move |j| Line::new(table, Dir::Col, j))
    }

    /// Iterates every nonzero as `(i, j, value)` in row-major order.
    ///
    /// On symmetric kinds both `(i, j)` and `(j, i)` are reported.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, Cow<'_, E>)> + '_ {
        self.rows()
            .enumerate()
            .flat_map(|(i, line)| line.iter().map(move |(j, v)| (i, j, v)))
    }

    /// Expands into dense rows.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<E>> {
        self.rows().map(|line| line.to_dense()).collect()
    }

    /// Changes the dimensions, dropping entries that fall outside.
    ///
    /// # Panics
    ///
    /// Panics if `S` is symmetric and `rows != cols`.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if (rows, cols) != (self.num_rows(), self.num_cols()) {
            self.table_mut().resize(rows, cols);
        }
    }

    /// Drops all entries and the dimensions.
    pub fn clear(&mut self) {
        *self = Self::new(0, 0);
    }

    /// Removes stored zeros; returns how many were found.
    ///
    /// Zeros cannot enter through the regular write paths, only through
    /// [`for_each_stored_mut`](Self::for_each_stored_mut).
    pub fn remove0s(&mut self) -> usize {
        if self.table.cells().any(|(_, _, value)| value.is_zero()) {
            self.table_mut().remove_zeros()
        } else {
            0
        }
    }

    /// Visits every stored value as `(row, col, &mut value)`, bypassing zero
    /// suppression. Symmetric kinds visit the lower triangle only.
    ///
    /// Call [`remove0s`](Self::remove0s) afterwards if a value may have
    /// become zero.
    pub fn for_each_stored_mut<F>(&mut self, visit: F)
    where
        F: FnMut(usize, usize, &mut E),
    {
        self.table_mut().for_each_cell_mut(visit);
    }

    /// Removes empty rows and columns and renumbers the rest.
    pub fn squeeze(&mut self) {
        self.squeeze_with(|_, _| {}, |_, _| {});
    }

    /// Removes empty rows and renumbers the rest. Symmetric kinds squeeze
    /// rows and columns together.
    pub fn squeeze_rows(&mut self) {
        self.squeeze_rows_with(|_, _| {});
    }

    /// Removes empty columns and renumbers the rest. Symmetric kinds
    /// squeeze rows and columns together.
    pub fn squeeze_cols(&mut self) {
        self.squeeze_cols_with(|_, _| {});
    }

    /// Squeezes rows, then columns, reporting each old index with its new
    /// index (or `None` if it was removed).
    pub fn squeeze_with<R, C>(&mut self, mut rows: R, mut cols: C)
    where
        R: FnMut(usize, Option<usize>),
        C: FnMut(usize, Option<usize>),
    {
        if S::LAYOUT.is_symmetric() {
            self.table_mut().squeeze_stored(Dir::Row, |old, new| {
                rows(old, new);
                cols(old, new);
            });
        } else {
            self.squeeze_rows_with(rows);
            self.squeeze_cols_with(cols);
        }
    }

    /// Squeezes rows, reporting each old index with its new index.
    pub fn squeeze_rows_with<F>(&mut self, renumbered: F)
    where
        F: FnMut(usize, Option<usize>),
    {
        self.table_mut().squeeze_stored(Dir::Row, renumbered);
    }

    /// Squeezes columns, reporting each old index with its new index.
    pub fn squeeze_cols_with<F>(&mut self, renumbered: F)
    where
        F: FnMut(usize, Option<usize>),
    {
        self.table_mut().squeeze_stored(Dir::Col, renumbered);
    }

    fn permute(&mut self, dir: Dir, perm: &[usize], inverse: bool) -> Result<()> {
        check_permutation(perm, self.table.dim(dir))?;
        self.table_mut().permute(dir, perm, inverse)
    }

    /// Reorders rows so that new row `i` is old row `perm[i]`.
    ///
    /// Symmetric kinds permute rows and columns together.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_rows()`.
    pub fn permute_rows(&mut self, perm: &[usize]) -> Result<()> {
        self.permute(Dir::Row, perm, false)
    }

    /// Reorders columns so that new column `j` is old column `perm[j]`.
    ///
    /// Symmetric kinds permute rows and columns together.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_cols()`.
    pub fn permute_cols(&mut self, perm: &[usize]) -> Result<()> {
        self.permute(Dir::Col, perm, false)
    }

    /// Reorders rows so that old row `i` becomes row `perm[i]`; undoes
    /// [`permute_rows`](Self::permute_rows).
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_rows()`.
    pub fn permute_inv_rows(&mut self, perm: &[usize]) -> Result<()> {
        self.permute(Dir::Row, perm, true)
    }

    /// Reorders columns so that old column `j` becomes column `perm[j]`;
    /// undoes [`permute_cols`](Self::permute_cols).
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_cols()`.
    pub fn permute_inv_cols(&mut self, perm: &[usize]) -> Result<()> {
        self.permute(Dir::Col, perm, true)
    }

    /// Returns a copy with rows reordered as by
    /// [`permute_rows`](Self::permute_rows).
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_rows()`.
    pub fn permuted_rows(&self, perm: &[usize]) -> Result<Self> {
        let mut copy = self.clone();
        copy.permute_rows(perm)?;
        Ok(copy)
    }

    /// Returns a copy with columns reordered as by
    /// [`permute_cols`](Self::permute_cols).
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..num_cols()`.
    pub fn permuted_cols(&self, perm: &[usize]) -> Result<Self> {
        let mut copy = self.clone();
        copy.permute_cols(perm)?;
        Ok(copy)
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        if S::LAYOUT == Layout::Symmetric {
            return self.clone();
        }
        let mut table = Table::clone(&self.table);
        table.transpose();
        Self::from_table(table)
    }

    /// Returns a read-only view of the rows and columns selected.
    ///
    /// Selections are sets: order and repetitions are ignored.
    ///
    /// # Errors
    ///
    /// Fails if a selected index is out of range.
    pub fn minor<R, C>(&self, rows: R, cols: C) -> Result<Minor<'_, E, S>>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        Minor::new(self, rows, cols)
    }

    /// Returns a writable view of the rows and columns selected; writes
    /// land in `self`.
    ///
    /// # Errors
    ///
    /// Fails if a selected index is out of range.
    pub fn minor_mut<R, C>(&mut self, rows: R, cols: C) -> Result<MinorMut<'_, E, S>>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        MinorMut::new(self, rows, cols)
    }

    /// Collects size and magnitude statistics.
    #[must_use]
    pub fn statistics(&self) -> MatrixStatistics<E>
    where
        E: OrderedRing,
    {
        let mut stats = MatrixStatistics::new();
        stats.gather(self);
        stats
    }
}

impl<E: Ring> SparseMatrix<E, NonSymmetric> {
    fn append_line<V>(&mut self, dir: Dir, line: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        let cross = dir.cross();
        if self.table.dim(dir) == 0 {
            let mut dims = [self.num_rows(), self.num_cols()];
            dims[usize::from(cross == Dir::Col)] = line.dim();
            self.table_mut().resize(dims[0], dims[1]);
        } else {
            let op = match dir {
                Dir::Row => "append_row",
                Dir::Col => "append_col",
            };
            check_dim(op, self.table.dim(cross), line.dim())?;
        }
        let table = self.table_mut();
        let index = table.push_line(dir);
        for (key, value) in line.entries() {
            let (row, col) = dir.position(index, key);
            table.create(row, col, value.into_owned());
        }
        Ok(())
    }

    /// Appends a row below the last one.
    ///
    /// An empty matrix takes its column count from `row`.
    ///
    /// # Errors
    ///
    /// Fails if `row.dim()` differs from the column count.
    pub fn append_row<V>(&mut self, row: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        self.append_line(Dir::Row, row)
    }

    /// Appends a column right of the last one.
    ///
    /// An empty matrix takes its row count from `col`.
    ///
    /// # Errors
    ///
    /// Fails if `col.dim()` differs from the row count.
    pub fn append_col<V>(&mut self, col: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        self.append_line(Dir::Col, col)
    }

    /// Appends all rows of `other`.
    ///
    /// # Errors
    ///
    /// Fails if the column counts differ; nothing is appended then.
    pub fn append_rows<S2: Symmetry>(&mut self, other: &SparseMatrix<E, S2>) -> Result<()> {
        if self.num_rows() > 0 {
            check_dim("append_rows", self.num_cols(), other.num_cols())?;
        }
        for line in other.rows() {
            self.append_row(&line)?;
        }
        Ok(())
    }

    /// Appends all columns of `other`.
    ///
    /// # Errors
    ///
    /// Fails if the row counts differ; nothing is appended then.
    pub fn append_cols<S2: Symmetry>(&mut self, other: &SparseMatrix<E, S2>) -> Result<()> {
        if self.num_cols() > 0 {
            check_dim("append_cols", self.num_rows(), other.num_rows())?;
        }
        for line in other.cols() {
            self.append_col(&line)?;
        }
        Ok(())
    }
}

/// Whether position `(i, j)` is read from a source by a matrix of `layout`.
const fn keeps(layout: Layout, i: usize, j: usize) -> bool {
    match layout {
        Layout::Symmetric => j <= i,
        Layout::SkewSymmetric => j < i,
        _ => true,
    }
}

impl<E: Ring, S: Symmetry> Default for SparseMatrix<E, S> {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl<E: Ring, S: Symmetry> PartialEq for SparseMatrix<E, S> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.table, &other.table) {
            return true;
        }
        self.num_rows() == other.num_rows()
            && self.num_cols() == other.num_cols()
            && self.nnz() == other.nnz()
            && self
                .rows()
                .zip(other.rows())
                .all(|(a, b)| a.iter().eq(b.iter()))
    }
}

impl<E: Ring + Eq, S: Symmetry> Eq for SparseMatrix<E, S> {}

impl<E: Ring, S: Symmetry> fmt::Debug for SparseMatrix<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<_> = self
            .entries()
            .map(|(i, j, v)| ((i, j), v.into_owned()))
            .collect();
        f.debug_struct("SparseMatrix")
            .field("symmetry", &S::default())
            .field("rows", &self.num_rows())
            .field("cols", &self.num_cols())
            .field("entries", &entries)
            .finish()
    }
}

/// One row per line, each in the sparse form `(cols) (j v) ...`.
impl<E: Ring + fmt::Display, S: Symmetry> fmt::Display for SparseMatrix<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.rows() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
