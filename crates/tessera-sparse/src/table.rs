//! Two-dimensional sparse storage.
//!
//! A [`Table`] stores every nonzero entry once, as a cell in a flat arena.
//! Each line (row or column) is an [`AvlTree`] mapping the cross index to a
//! cell handle, so a cell is reachable from both of its lines without being
//! duplicated.
//!
//! ## Layouts
//!
//! - `Full`: cell `(r, c)` sits in row tree `r` under key `c` and in column
//!   tree `c` under key `r`
//! - `OnlyRows` / `OnlyCols`: only one of the two links exists
//! - `Symmetric` / `SkewSymmetric`: one tree per index; the canonical cell
//!   has `row >= col` and sits in tree `row` under `col` and in tree `col`
//!   under `row` (once, on the diagonal)
//!
//! The table is where the symmetry sign rule lives: reads across the
//! diagonal of a skew-symmetric table are negated, and writes are
//! canonicalized into the stored triangle with the matching sign.

use std::borrow::Cow;
use std::mem;

use log::{debug, warn};
use smallvec::SmallVec;
use tessera_avl::AvlTree;
use tessera_rings::Ring;

use crate::error::{check_permutation, invert_permutation, Result, SparseError};
use crate::kinds::Layout;

/// A line direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    /// Rows; a row line is indexed by column.
    Row,
    /// Columns; a column line is indexed by row.
    Col,
}

impl Dir {
    /// Returns the other direction.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Row => Self::Col,
            Self::Col => Self::Row,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Row => 0,
            Self::Col => 1,
        }
    }

    /// Maps (line index, position in line) to (row, col).
    #[inline]
    pub(crate) const fn position(self, line: usize, key: usize) -> (usize, usize) {
        match self {
            Self::Row => (line, key),
            Self::Col => (key, line),
        }
    }
}

/// Handle of a cell in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CellId(u32);

impl CellId {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn new(index: usize) -> Self {
        assert!(index < u32::MAX as usize, "cell arena capacity exceeded");
        Self(index as u32)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Cell<E> {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) value: E,
}

impl<E> Cell<E> {
    const fn index(&self, dir: Dir) -> usize {
        match dir {
            Dir::Row => self.row,
            Dir::Col => self.col,
        }
    }

    fn index_mut(&mut self, dir: Dir) -> &mut usize {
        match dir {
            Dir::Row => &mut self.row,
            Dir::Col => &mut self.col,
        }
    }
}

/// Tree links of a cell as `(slot, line, key)`.
type Links = SmallVec<[(usize, usize, usize); 2]>;

fn links(layout: Layout, row: usize, col: usize) -> Links {
    let mut out = Links::new();
    match layout {
        Layout::Full => {
            out.push((0, row, col));
            out.push((1, col, row));
        }
        Layout::OnlyRows => out.push((0, row, col)),
        Layout::OnlyCols => out.push((1, col, row)),
        Layout::Symmetric | Layout::SkewSymmetric => {
            out.push((0, row, col));
            if row != col {
                out.push((0, col, row));
            }
        }
    }
    out
}

/// Number of trees kept in `slot` for a table of the given shape.
const fn tree_count(layout: Layout, slot: usize, dims: [usize; 2]) -> usize {
    match (layout, slot) {
        (Layout::Full, s) => dims[s],
        (Layout::OnlyRows | Layout::Symmetric | Layout::SkewSymmetric, 0) => dims[0],
        (Layout::OnlyCols, 1) => dims[1],
        _ => 0,
    }
}

/// Cell storage shared by all matrix kinds.
#[derive(Clone, Debug)]
pub struct Table<E> {
    layout: Layout,
    dims: [usize; 2],
    pub(crate) cells: Vec<Cell<E>>,
    trees: [Vec<AvlTree<CellId>>; 2],
}

impl<E: Ring> Table<E> {
    /// Creates an all-zero table.
    ///
    /// # Panics
    ///
    /// Panics if a symmetric layout is requested with `rows != cols`.
    #[must_use]
    pub fn new(layout: Layout, rows: usize, cols: usize) -> Self {
        assert!(
            !layout.is_symmetric() || rows == cols,
            "symmetric table must be square, got {rows}x{cols}"
        );
        let dims = [rows, cols];
        Self {
            layout,
            dims,
            cells: Vec::new(),
            trees: [0, 1].map(|slot| {
                (0..tree_count(layout, slot, dims))
                    .map(|_| AvlTree::new())
                    .collect()
            }),
        }
    }

    /// Returns the storage layout.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.dims[0]
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.dims[1]
    }

    /// Returns the number of lines in `dir`.
    #[must_use]
    pub fn dim(&self, dir: Dir) -> usize {
        self.dims[dir.slot()]
    }

    /// Returns the number of stored cells.
    ///
    /// A symmetric pair of entries is one cell.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if lines in `dir` can be enumerated.
    #[must_use]
    pub fn stores(&self, dir: Dir) -> bool {
        match self.layout {
            Layout::OnlyRows => dir == Dir::Row,
            Layout::OnlyCols => dir == Dir::Col,
            _ => true,
        }
    }

    #[inline]
    fn tree_slot(&self, dir: Dir) -> usize {
        if self.layout.is_symmetric() {
            0
        } else {
            dir.slot()
        }
    }

    /// The tree of line `index` in `dir`, if that direction is stored.
    #[inline]
    pub(crate) fn tree(&self, dir: Dir, index: usize) -> Option<&AvlTree<CellId>> {
        self.trees[self.tree_slot(dir)].get(index)
    }

    /// Returns the number of stored entries of a line.
    #[must_use]
    pub fn line_len(&self, dir: Dir, index: usize) -> usize {
        self.tree(dir, index).map_or(0, AvlTree::len)
    }

    /// Maps a position to its stored orientation; the flag is true when the
    /// position lies in the mirrored triangle.
    #[inline]
    fn canonical(&self, row: usize, col: usize) -> (usize, usize, bool) {
        if self.layout.is_symmetric() && row < col {
            (col, row, true)
        } else {
            (row, col, false)
        }
    }

    fn locate(&self, row: usize, col: usize) -> Option<CellId> {
        match self.layout {
            Layout::OnlyCols => self.trees[1][col].get(row).copied(),
            _ => self.trees[0][row].get(col).copied(),
        }
    }

    /// The value of a cell as seen from position `(row, _)`.
    #[inline]
    pub(crate) fn oriented(&self, id: CellId, row: usize) -> Cow<'_, E> {
        let cell = &self.cells[id.index()];
        if self.layout.is_skew() && cell.row != row {
            Cow::Owned(-cell.value.clone())
        } else {
            Cow::Borrowed(&cell.value)
        }
    }

    /// Returns the entry at `(row, col)`, or `None` if it is zero.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Cow<'_, E>> {
        let id = self.locate(row, col)?;
        Some(self.oriented(id, row))
    }

    /// Writes `value` at `(row, col)`; a zero value erases the entry.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric table.
    pub fn set(&mut self, row: usize, col: usize, value: E) -> Result<()> {
        if value.is_zero() {
            self.remove(row, col);
            return Ok(());
        }
        if self.layout.is_skew() && row == col {
            return Err(SparseError::SkewDiagonal { index: row });
        }
        let (r, c, flipped) = self.canonical(row, col);
        let value = if flipped && self.layout.is_skew() {
            -value
        } else {
            value
        };
        match self.locate(r, c) {
            Some(id) => self.cells[id.index()].value = value,
            None => {
                self.create(r, c, value);
            }
        }
        Ok(())
    }

    /// Adds `delta` to the entry at `(row, col)`, erasing it if the sum is
    /// zero.
    ///
    /// # Errors
    ///
    /// Fails on a nonzero write to the diagonal of a skew-symmetric table.
    pub fn add_to(&mut self, row: usize, col: usize, delta: E) -> Result<()> {
        if delta.is_zero() {
            return Ok(());
        }
        let (r, c, flipped) = self.canonical(row, col);
        let delta = if flipped && self.layout.is_skew() {
            -delta
        } else {
            delta
        };
        match self.locate(r, c) {
            Some(id) => {
                let cell = &mut self.cells[id.index()];
                let sum = mem::replace(&mut cell.value, E::zero()) + delta;
                if sum.is_zero() {
                    self.destroy(id);
                } else {
                    cell.value = sum;
                }
            }
            None => {
                if self.layout.is_skew() && r == c {
                    return Err(SparseError::SkewDiagonal { index: r });
                }
                self.create(r, c, delta);
            }
        }
        Ok(())
    }

    /// Erases the entry at `(row, col)`, returning it as seen from there.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<E> {
        let id = self.locate(row, col)?;
        let flipped = self.cells[id.index()].row != row;
        let value = self.destroy(id);
        Some(if flipped && self.layout.is_skew() {
            -value
        } else {
            value
        })
    }

    /// Appends a cell that is known to be absent, linking it into its trees.
    pub(crate) fn create(&mut self, row: usize, col: usize, value: E) -> CellId {
        let id = CellId::new(self.cells.len());
        self.cells.push(Cell { row, col, value });
        for (slot, line, key) in links(self.layout, row, col) {
            self.trees[slot][line].insert(key, id);
        }
        id
    }

    /// Unlinks and frees a cell. The last cell of the arena moves into the
    /// freed slot.
    fn destroy(&mut self, id: CellId) -> E {
        let cell = &self.cells[id.index()];
        for (slot, line, key) in links(self.layout, cell.row, cell.col) {
            self.trees[slot][line].remove(key);
        }
        let last = self.cells.len() - 1;
        if id.index() != last {
            let moved = &self.cells[last];
            for (slot, line, key) in links(self.layout, moved.row, moved.col) {
                if let Some(handle) = self.trees[slot][line].get_mut(key) {
                    *handle = id;
                }
            }
        }
        self.cells.swap_remove(id.index()).value
    }

    /// Frees every cell matching `doomed`; returns how many went.
    fn drop_cells_where<F>(&mut self, mut doomed: F) -> usize
    where
        F: FnMut(&Cell<E>) -> bool,
    {
        let ids: Vec<CellId> = (0..self.cells.len())
            .filter(|&i| doomed(&self.cells[i]))
            .map(CellId::new)
            .collect();
        // Descending order: a moved-in cell is never one still pending.
        for &id in ids.iter().rev() {
            self.destroy(id);
        }
        ids.len()
    }

    /// Changes the dimensions, dropping cells that fall outside.
    ///
    /// # Panics
    ///
    /// Panics if a symmetric table is resized to a non-square shape.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        assert!(
            !self.layout.is_symmetric() || rows == cols,
            "symmetric table must be square, got {rows}x{cols}"
        );
        if rows < self.dims[0] || cols < self.dims[1] {
            self.drop_cells_where(|cell| cell.row >= rows || cell.col >= cols);
        }
        self.dims = [rows, cols];
        for slot in 0..2 {
            let count = tree_count(self.layout, slot, self.dims);
            self.trees[slot].resize_with(count, AvlTree::new);
        }
    }

    /// Removes every cell and sets new dimensions.
    pub fn clear(&mut self, rows: usize, cols: usize) {
        self.cells.clear();
        for trees in &mut self.trees {
            trees.clear();
        }
        self.resize(rows, cols);
    }

    /// Removes cells holding zero; returns how many were removed.
    pub fn remove_zeros(&mut self) -> usize {
        let removed = self.drop_cells_where(|cell| cell.value.is_zero());
        if removed > 0 {
            debug!(target: "tessera_sparse", "removed {removed} stored zeros");
        }
        removed
    }

    /// Rewrites every stored value in place, then drops the zeros.
    ///
    /// Symmetric tables are handed the canonical (lower triangle) values.
    pub fn update_values<F>(&mut self, mut update: F)
    where
        F: FnMut(&E) -> E,
    {
        for cell in &mut self.cells {
            cell.value = update(&cell.value);
        }
        self.remove_zeros();
    }

    /// Visits every stored cell as `(row, col, &mut value)` in storage
    /// order. Values are not filtered for zero afterwards.
    pub fn for_each_cell_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(usize, usize, &mut E),
    {
        for cell in &mut self.cells {
            visit(cell.row, cell.col, &mut cell.value);
        }
    }

    /// Iterates the stored cells as `(row, col, &value)` in storage order.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = (usize, usize, &E)> + '_ {
        self.cells.iter().map(|cell| (cell.row, cell.col, &cell.value))
    }

    /// Removes the empty lines of `dir` and renumbers the rest.
    ///
    /// `renumbered(old, new)` is called for every old index, in ascending
    /// order, with `None` for removed lines. Returns the new line count.
    ///
    /// # Errors
    ///
    /// Fails if `dir` is a direction this table does not store.
    pub fn squeeze<F>(&mut self, dir: Dir, renumbered: F) -> Result<usize>
    where
        F: FnMut(usize, Option<usize>),
    {
        if !self.stores(dir) {
            warn!(
                target: "tessera_perf",
                "refusing to squeeze {dir:?} lines of a {:?} table",
                self.layout
            );
            return Err(SparseError::Restricted { op: "squeeze" });
        }
        Ok(self.squeeze_stored(dir, renumbered))
    }

    pub(crate) fn squeeze_stored<F>(&mut self, dir: Dir, mut renumbered: F) -> usize
    where
        F: FnMut(usize, Option<usize>),
    {
        let slot = self.tree_slot(dir);
        let count = self.trees[slot].len();
        let mut renumber = vec![usize::MAX; count];
        let mut kept = 0;
        for (old, tree) in self.trees[slot].iter().enumerate() {
            if tree.is_empty() {
                renumbered(old, None);
            } else {
                renumber[old] = kept;
                renumbered(old, Some(kept));
                kept += 1;
            }
        }
        if kept == count {
            return kept;
        }
        self.trees[slot].retain(|tree| !tree.is_empty());
        if self.layout.is_symmetric() {
            for tree in &mut self.trees[0] {
                tree.relabel_keys(|k| renumber[k]);
            }
            for cell in &mut self.cells {
                cell.row = renumber[cell.row];
                cell.col = renumber[cell.col];
            }
            self.dims = [kept, kept];
        } else {
            for tree in &mut self.trees[1 - slot] {
                tree.relabel_keys(|k| renumber[k]);
            }
            for cell in &mut self.cells {
                let old = cell.index(dir);
                *cell.index_mut(dir) = renumber[old];
            }
            self.dims[dir.slot()] = kept;
        }
        debug!(
            target: "tessera_sparse",
            "squeezed {dir:?} lines from {count} to {kept}"
        );
        kept
    }

    /// Reorders the lines of `dir`.
    ///
    /// With `inverse == false`, new line `i` is old line `perm[i]`; with
    /// `inverse == true`, old line `i` becomes new line `perm[i]`. On
    /// symmetric layouts rows and columns move together. Cell payloads are
    /// never copied.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of the lines, or if `dir` is a
    /// direction this table does not store.
    pub fn permute(&mut self, dir: Dir, perm: &[usize], inverse: bool) -> Result<()> {
        if !self.stores(dir) {
            warn!(
                target: "tessera_perf",
                "refusing to permute {dir:?} lines of a {:?} table",
                self.layout
            );
            return Err(SparseError::Restricted { op: "permute" });
        }
        check_permutation(perm, self.dim(dir))?;
        let new_of_old = if inverse {
            perm.to_vec()
        } else {
            invert_permutation(perm)
        };
        if self.layout.is_symmetric() {
            self.renumber_symmetric(&new_of_old);
        } else {
            self.renumber_lines(dir, &new_of_old);
        }
        Ok(())
    }

    fn renumber_lines(&mut self, dir: Dir, new_of_old: &[usize]) {
        let slot = dir.slot();
        let old = mem::take(&mut self.trees[slot]);
        let mut lines: Vec<AvlTree<CellId>> = (0..old.len()).map(|_| AvlTree::new()).collect();
        for (i, tree) in old.into_iter().enumerate() {
            lines[new_of_old[i]] = tree;
        }
        self.trees[slot] = lines;
        for cell in &mut self.cells {
            let old = cell.index(dir);
            *cell.index_mut(dir) = new_of_old[old];
        }
        if self.layout == Layout::Full {
            self.rebuild_cross(dir);
        }
    }

    /// Rebuilds the trees crossing `dir` from the trees of `dir`.
    fn rebuild_cross(&mut self, dir: Dir) {
        let cross_len = self.dim(dir.cross());
        let [rows, cols] = &mut self.trees;
        let (primary, cross) = match dir {
            Dir::Row => (&*rows, cols),
            Dir::Col => (&*cols, rows),
        };
        let mut buckets: Vec<Vec<(usize, CellId)>> = vec![Vec::new(); cross_len];
        for (line, tree) in primary.iter().enumerate() {
            for (key, &id) in tree {
                buckets[key].push((line, id));
            }
        }
        *cross = buckets.into_iter().map(AvlTree::from_sorted).collect();
    }

    fn renumber_symmetric(&mut self, new_of_old: &[usize]) {
        let skew = self.layout.is_skew();
        for cell in &mut self.cells {
            let (mut row, mut col) = (new_of_old[cell.row], new_of_old[cell.col]);
            if row < col {
                mem::swap(&mut row, &mut col);
                if skew {
                    let value = mem::replace(&mut cell.value, E::zero());
                    cell.value = -value;
                }
            }
            cell.row = row;
            cell.col = col;
        }
        let mut buckets: Vec<Vec<(usize, CellId)>> = vec![Vec::new(); self.dims[0]];
        for (i, cell) in self.cells.iter().enumerate() {
            let id = CellId::new(i);
            buckets[cell.row].push((cell.col, id));
            if cell.row != cell.col {
                buckets[cell.col].push((cell.row, id));
            }
        }
        self.trees[0] = buckets
            .into_iter()
            .map(|mut bucket| {
                bucket.sort_unstable_by_key(|&(key, _)| key);
                AvlTree::from_sorted(bucket)
            })
            .collect();
    }

    /// Transposes in place.
    ///
    /// A restricted table keeps its trees and changes its restriction.
    pub fn transpose(&mut self) {
        match self.layout {
            Layout::Symmetric => {}
            Layout::SkewSymmetric => {
                for cell in &mut self.cells {
                    let value = mem::replace(&mut cell.value, E::zero());
                    cell.value = -value;
                }
            }
            Layout::Full | Layout::OnlyRows | Layout::OnlyCols => {
                self.trees.swap(0, 1);
                self.dims.swap(0, 1);
                for cell in &mut self.cells {
                    mem::swap(&mut cell.row, &mut cell.col);
                }
                self.layout = match self.layout {
                    Layout::OnlyRows => Layout::OnlyCols,
                    Layout::OnlyCols => Layout::OnlyRows,
                    other => other,
                };
            }
        }
    }

    /// Converts a restricted table into a full one by building the missing
    /// direction in one pass. Other layouts are returned unchanged.
    #[must_use]
    pub fn into_full(mut self) -> Self {
        let stored = match self.layout {
            Layout::OnlyRows => Dir::Row,
            Layout::OnlyCols => Dir::Col,
            _ => return self,
        };
        self.layout = Layout::Full;
        self.rebuild_cross(stored);
        debug!(
            target: "tessera_sparse",
            "completed {}x{} restricted table with {} cells",
            self.dims[0],
            self.dims[1],
            self.cells.len()
        );
        self
    }

    /// Appends an empty line in `dir` and returns its index.
    pub(crate) fn push_line(&mut self, dir: Dir) -> usize {
        let index = self.dims[dir.slot()];
        let mut dims = self.dims;
        dims[dir.slot()] += 1;
        self.resize(dims[0], dims[1]);
        index
    }

    /// Verifies that every cell is linked exactly where it belongs and that
    /// no zero is stored.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut link_count = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.value.is_zero() || cell.row >= self.dims[0] || cell.col >= self.dims[1] {
                return false;
            }
            if self.layout.is_symmetric() && cell.row < cell.col {
                return false;
            }
            for (slot, line, key) in links(self.layout, cell.row, cell.col) {
                if self.trees[slot][line].get(key).map(|id| id.index()) != Some(i) {
                    return false;
                }
                link_count += 1;
            }
        }
        let tree_total: usize = self.trees.iter().flatten().map(AvlTree::len).sum();
        let balanced = self.trees.iter().flatten().all(|tree| tree.check().is_ok());
        balanced && tree_total == link_count
    }
}
