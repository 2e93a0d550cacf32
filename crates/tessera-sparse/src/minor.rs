//! Submatrix views.
//!
//! A minor selects a set of rows and a set of columns of a matrix and
//! renumbers them `0..k` in ascending order. Reads go straight to the
//! parent; [`MinorMut`] writes land in the parent too.

use std::borrow::Cow;
use std::ops::MulAssign;

use tessera_rings::Ring;

use crate::error::{check_dim, check_element, Result, SparseError};
use crate::kinds::{NonSymmetric, Symmetry};
use crate::matrix::SparseMatrix;
use crate::table::Table;

/// Sorted, deduplicated selection checked against `dim`.
fn selection<I>(indices: I, dim: usize) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = usize>,
{
    let mut picked: Vec<usize> = indices.into_iter().collect();
    picked.sort_unstable();
    picked.dedup();
    match picked.last() {
        Some(&index) if index >= dim => Err(SparseError::IndexOutOfRange { index, dim }),
        _ => Ok(picked),
    }
}

/// Rows and columns picked out of a matrix.
#[derive(Clone, Debug)]
struct Selection {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl Selection {
    fn new<E: Ring, S: Symmetry, R, C>(matrix: &SparseMatrix<E, S>, rows: R, cols: C) -> Result<Self>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        Ok(Self {
            rows: selection(rows, matrix.num_rows())?,
            cols: selection(cols, matrix.num_cols())?,
        })
    }

    fn parent(&self, i: usize, j: usize) -> (usize, usize) {
        check_element(i, j, self.rows.len(), self.cols.len());
        (self.rows[i], self.cols[j])
    }

    /// Entries of minor row `i`, renumbered into minor columns.
    fn row<'a, E: Ring, S: Symmetry>(
        &'a self,
        matrix: &'a SparseMatrix<E, S>,
        i: usize,
    ) -> impl Iterator<Item = (usize, Cow<'a, E>)> + 'a {
        matrix
            .row(self.rows[i])
            .iter()
            .filter_map(move |(col, value)| self.cols.binary_search(&col).ok().map(|j| (j, value)))
    }

    fn to_matrix<E: Ring, S: Symmetry>(&self, matrix: &SparseMatrix<E, S>) -> SparseMatrix<E> {
        let mut table = Table::new(NonSymmetric::LAYOUT, self.rows.len(), self.cols.len());
        for i in 0..self.rows.len() {
            for (j, value) in self.row(matrix, i) {
                table.create(i, j, value.into_owned());
            }
        }
        SparseMatrix::from_table(table)
    }
}

/// A read-only submatrix view.
pub struct Minor<'a, E, S> {
    matrix: &'a SparseMatrix<E, S>,
    selection: Selection,
}

impl<'a, E: Ring, S: Symmetry> Minor<'a, E, S> {
    pub(crate) fn new<R, C>(matrix: &'a SparseMatrix<E, S>, rows: R, cols: C) -> Result<Self>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        let selection = Selection::new(matrix, rows, cols)?;
        Ok(Self { matrix, selection })
    }

    /// Returns the number of selected rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.selection.rows.len()
    }

    /// Returns the number of selected columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.selection.cols.len()
    }

    /// Returns the entry at minor position `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> E {
        let (row, col) = self.selection.parent(i, j);
        self.matrix.get(row, col)
    }

    /// Iterates the entries of minor row `i` in ascending column order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, Cow<'_, E>)> + '_ {
        self.selection.row(self.matrix, i)
    }

    /// Returns the number of nonzeros inside the minor.
    #[must_use]
    pub fn nnz(&self) -> usize {
        (0..self.num_rows()).map(|i| self.row(i).count()).sum()
    }

    /// Copies the minor into a new unsymmetric matrix.
    #[must_use]
    pub fn to_matrix(&self) -> SparseMatrix<E> {
        self.selection.to_matrix(self.matrix)
    }
}

/// A writable submatrix view.
///
/// On symmetric matrices a write at `(i, j)` is also visible at `(j, i)`,
/// including where both positions lie inside the minor.
pub struct MinorMut<'a, E, S> {
    matrix: &'a mut SparseMatrix<E, S>,
    selection: Selection,
}

impl<'a, E: Ring, S: Symmetry> MinorMut<'a, E, S> {
    pub(crate) fn new<R, C>(matrix: &'a mut SparseMatrix<E, S>, rows: R, cols: C) -> Result<Self>
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        let selection = Selection::new(&*matrix, rows, cols)?;
        Ok(Self { matrix, selection })
    }

    /// Returns the number of selected rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.selection.rows.len()
    }

    /// Returns the number of selected columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.selection.cols.len()
    }

    /// Returns the entry at minor position `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> E {
        let (row, col) = self.selection.parent(i, j);
        self.matrix.get(row, col)
    }

    /// Writes the entry at minor position `(i, j)`.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric parent.
    pub fn try_set(&mut self, i: usize, j: usize, value: E) -> Result<()> {
        let (row, col) = self.selection.parent(i, j);
        self.matrix.try_set(row, col, value)
    }

    /// Writes the entry at minor position `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric parent.
    pub fn set(&mut self, i: usize, j: usize, value: E) {
        let (row, col) = self.selection.parent(i, j);
        self.matrix.set(row, col, value);
    }

    /// Adds `delta` to the entry at minor position `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics on a nonzero write to the diagonal of a skew-symmetric parent.
    pub fn add_to(&mut self, i: usize, j: usize, delta: E) {
        let (row, col) = self.selection.parent(i, j);
        self.matrix.add_to(row, col, delta);
    }

    /// Returns a read-only view of the same selection.
    #[must_use]
    pub fn as_minor(&self) -> Minor<'_, E, S> {
        Minor {
            matrix: &*self.matrix,
            selection: self.selection.clone(),
        }
    }

    /// Copies the minor into a new unsymmetric matrix.
    #[must_use]
    pub fn to_matrix(&self) -> SparseMatrix<E> {
        self.selection.to_matrix(&*self.matrix)
    }

    fn stored(&self) -> Vec<(usize, usize, E)> {
        (0..self.num_rows())
            .flat_map(|i| {
                self.selection
                    .row(&*self.matrix, i)
                    .map(move |(j, value)| (i, j, value.into_owned()))
            })
            .collect()
    }

    /// Zeroes every entry inside the minor.
    pub fn clear(&mut self) {
        for (i, j, _) in self.stored() {
            self.set(i, j, E::zero());
        }
    }

    /// Replaces the contents of the minor with `source`.
    ///
    /// # Errors
    ///
    /// Fails if the shapes differ, or on a nonzero write to the diagonal of
    /// a skew-symmetric parent.
    pub fn assign<S2: Symmetry>(&mut self, source: &SparseMatrix<E, S2>) -> Result<()> {
        check_dim("assign", self.num_rows(), source.num_rows())?;
        check_dim("assign", self.num_cols(), source.num_cols())?;
        self.clear();
        for (i, j, value) in source.entries() {
            self.try_set(i, j, value.into_owned())?;
        }
        Ok(())
    }
}

impl<E: Ring, S: Symmetry> MulAssign<E> for MinorMut<'_, E, S> {
    fn mul_assign(&mut self, rhs: E) {
        // Values are read before any write so that a cell reachable from two
        // minor positions is scaled once.
        let scaled: Vec<_> = self
            .stored()
            .into_iter()
            .map(|(i, j, value)| (i, j, value * rhs.clone()))
            .collect();
        for (i, j, value) in scaled {
            self.set(i, j, value);
        }
    }
}
