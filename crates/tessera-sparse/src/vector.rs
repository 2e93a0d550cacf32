//! Sparse vectors with copy-on-write storage.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ops::{Add, AddAssign, BitOrAssign, Div, DivAssign, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use log::trace;
use tessera_avl::{AvlTree, Iter};
use tessera_rings::Ring;

use crate::alias::VectorAlias;
use crate::error::{check_dim, check_index, check_permutation, invert_permutation, Result};
use crate::generic::GenericVector;

#[derive(Clone)]
struct VectorData<E> {
    tree: AvlTree<E>,
    dim: usize,
}

/// A vector of declared dimension `dim` storing only its nonzero entries.
///
/// Cloning is O(1): clones share storage until one of them is mutated, at
/// which point the mutated handle takes a private copy.
///
/// # Example
///
/// ```
/// use tessera_sparse::SparseVector;
///
/// let mut v = SparseVector::from_pairs(5, [(1, 10i64), (3, -2)]);
/// assert_eq!(v.dim(), 5);
/// assert_eq!(v.nnz(), 2);
/// assert_eq!(v.get(0), 0);
///
/// let snapshot = v.clone();
/// v.set(1, 0);
/// assert_eq!(v.nnz(), 1);
/// assert_eq!(snapshot.get(1), 10);
/// ```
#[derive(Clone)]
pub struct SparseVector<E> {
    data: Arc<VectorData<E>>,
}

impl<E: Ring> SparseVector<E> {
    /// Creates the zero vector of dimension `dim`.
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self::from_sorted_entries(dim, Vec::new())
    }

    /// Builds a vector from nonzero entries in strictly ascending order.
    pub(crate) fn from_sorted_entries(dim: usize, entries: Vec<(usize, E)>) -> Self {
        debug_assert!(entries.iter().all(|(i, v)| *i < dim && !v.is_zero()));
        Self {
            data: Arc::new(VectorData {
                tree: AvlTree::from_sorted(entries),
                dim,
            }),
        }
    }

    /// Creates a vector from `(index, value)` pairs in any order.
    ///
    /// Later pairs overwrite earlier ones; zero values are not stored.
    #[must_use]
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, E)>,
    {
        let mut v = Self::new(dim);
        for (i, x) in pairs {
            v.set(i, x);
        }
        v
    }

    /// Creates a vector from a dense slice, skipping zeros.
    #[must_use]
    pub fn from_dense(values: &[E]) -> Self {
        values.to_sparse()
    }

    /// Copies any vector-like source.
    #[must_use]
    pub fn from_generic<V>(source: &V) -> Self
    where
        V: GenericVector<E> + ?Sized,
    {
        source.to_sparse()
    }

    /// Converts the element type.
    #[must_use]
    pub fn convert<F>(&self) -> SparseVector<F>
    where
        F: Ring + From<E>,
    {
        self.map_nonzero(|x| F::from(x.clone()))
    }

    /// Maps every stored entry through `f`, dropping results that are zero.
    #[must_use]
    pub fn map_nonzero<F, M>(&self, mut f: M) -> SparseVector<F>
    where
        F: Ring,
        M: FnMut(&E) -> F,
    {
        let entries = self
            .iter()
            .map(|(i, x)| (i, f(x)))
            .filter(|(_, y)| !y.is_zero())
            .collect();
        SparseVector::from_sorted_entries(self.dim(), entries)
    }

    /// Returns the declared dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.dim
    }

    /// Returns the number of stored (nonzero) entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.tree.len()
    }

    /// Returns true if no entry is stored.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.tree.is_empty()
    }

    /// Returns true if another handle shares this vector's storage.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.data) > 1
    }

    /// Returns the entry at `index`, zero if absent.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index >= dim()`.
    #[must_use]
    pub fn get(&self, index: usize) -> E {
        check_index(index, self.dim());
        self.data.tree.get(index).cloned().unwrap_or_else(E::zero)
    }

    /// Returns a reference to the stored entry at `index`.
    #[must_use]
    pub fn get_ref(&self, index: usize) -> Option<&E> {
        check_index(index, self.dim());
        self.data.tree.get(index)
    }

    /// Returns true if an entry is stored at `index`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.data.tree.contains_key(index)
    }

    /// Writes `value` at `index`; writing zero erases the entry.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index >= dim()`.
    pub fn set(&mut self, index: usize, value: E) {
        check_index(index, self.dim());
        if value.is_zero() {
            self.erase(index);
        } else {
            self.data_mut().tree.insert(index, value);
        }
    }

    /// Adds `delta` to the entry at `index`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index >= dim()`.
    pub fn add_to(&mut self, index: usize, delta: E) {
        check_index(index, self.dim());
        if delta.is_zero() {
            return;
        }
        let tree = &mut self.data_mut().tree;
        match tree.get_mut(index) {
            Some(x) => {
                let sum = mem::replace(x, E::zero()) + delta;
                if sum.is_zero() {
                    tree.remove(index);
                } else {
                    *x = sum;
                }
            }
            None => {
                tree.insert(index, delta);
            }
        }
    }

    /// Removes the entry at `index`, returning it.
    pub fn erase(&mut self, index: usize) -> Option<E> {
        if self.contains(index) {
            self.data_mut().tree.remove(index)
        } else {
            None
        }
    }

    /// Stores `value` at an index beyond every stored index.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `index >= dim()` or if `index` does not
    /// exceed the last stored index.
    pub fn push_back(&mut self, index: usize, value: E) {
        check_index(index, self.dim());
        if !value.is_zero() {
            self.data_mut().tree.push_back(index, value);
        }
    }

    /// Appends one scalar, growing the dimension by one.
    pub fn push(&mut self, value: E) {
        let data = self.data_mut();
        let index = data.dim;
        data.dim += 1;
        if !value.is_zero() {
            data.tree.push_back(index, value);
        }
    }

    /// Appends a vector, shifting its indices by the current dimension.
    pub fn append<V>(&mut self, tail: &V)
    where
        V: GenericVector<E> + ?Sized,
    {
        let data = self.data_mut();
        let shift = data.dim;
        for (i, x) in tail.entries() {
            data.tree.push_back(shift + i, x.into_owned());
        }
        data.dim += tail.dim();
    }

    /// Changes the dimension, erasing entries at or beyond the new one.
    pub fn resize(&mut self, dim: usize) {
        if dim == self.dim() {
            return;
        }
        let data = self.data_mut();
        if dim < data.dim {
            data.tree.truncate(dim);
        }
        data.dim = dim;
    }

    /// Erases everything and sets the dimension to zero.
    pub fn clear(&mut self) {
        self.data = Arc::new(VectorData {
            tree: AvlTree::new(),
            dim: 0,
        });
    }

    /// Sets every entry to `value`.
    pub fn fill(&mut self, value: &E) {
        let dim = self.dim();
        let entries = if value.is_zero() {
            Vec::new()
        } else {
            (0..dim).map(|i| (i, value.clone())).collect()
        };
        *self = Self::from_sorted_entries(dim, entries);
    }

    /// Iterates the stored entries in ascending index order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, E> {
        self.data.tree.iter()
    }

    /// Iterates the stored indices in ascending order.
    pub fn indices(&self) -> impl DoubleEndedIterator<Item = usize> + ExactSizeIterator + '_ {
        self.data.tree.keys()
    }

    /// Returns the vector with entry `i` taken from `perm[i]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..dim()`.
    pub fn permuted(&self, perm: &[usize]) -> Result<Self> {
        check_permutation(perm, self.dim())?;
        Ok(self.renumbered(&invert_permutation(perm)))
    }

    /// Returns the vector with entry `i` moved to `perm[i]`.
    ///
    /// # Errors
    ///
    /// Fails if `perm` is not a permutation of `0..dim()`.
    pub fn permuted_inv(&self, perm: &[usize]) -> Result<Self> {
        check_permutation(perm, self.dim())?;
        Ok(self.renumbered(perm))
    }

    fn renumbered(&self, new_of_old: &[usize]) -> Self {
        let mut entries: Vec<_> = self
            .iter()
            .map(|(i, x)| (new_of_old[i], x.clone()))
            .collect();
        entries.sort_unstable_by_key(|&(i, _)| i);
        Self::from_sorted_entries(self.dim(), entries)
    }

    /// Returns the explicit mutable alias of this vector.
    ///
    /// Writes through the alias are writes to `self`.
    pub fn alias_mut(&mut self) -> VectorAlias<'_, E> {
        VectorAlias::new(self)
    }

    /// Adds `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ.
    pub fn try_add_assign<V>(&mut self, other: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("add", self.dim(), other.dim())?;
        for (i, x) in other.entries() {
            self.add_to(i, x.into_owned());
        }
        Ok(())
    }

    /// Subtracts `other` entry by entry.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions differ.
    pub fn try_sub_assign<V>(&mut self, other: &V) -> Result<()>
    where
        V: GenericVector<E> + ?Sized,
    {
        check_dim("sub", self.dim(), other.dim())?;
        for (i, x) in other.entries() {
            self.add_to(i, -x.into_owned());
        }
        Ok(())
    }

    /// Multiplies every stored entry in place, dropping zero products.
    fn scale_in_place<F>(&mut self, mut op: F)
    where
        F: FnMut(E) -> E,
    {
        self.data_mut().tree.retain(|_, x| {
            *x = op(mem::replace(x, E::zero()));
            !x.is_zero()
        });
    }

    fn data_mut(&mut self) -> &mut VectorData<E> {
        if Arc::strong_count(&self.data) > 1 {
            trace!(
                target: "tessera_sparse",
                "copy-on-write: vector of dim {} with {} entries",
                self.data.dim,
                self.data.tree.len()
            );
        }
        Arc::make_mut(&mut self.data)
    }

    fn merge<A, B, C>(&self, other: &Self, op: &'static str, mut both: C, left: A, right: B) -> Self
    where
        A: Fn(&E) -> E,
        B: Fn(&E) -> E,
        C: FnMut(&E, &E) -> E,
    {
        if let Err(e) = check_dim(op, self.dim(), other.dim()) {
            panic!("{e}");
        }
        let mut out = Vec::with_capacity(self.nnz().max(other.nnz()));
        let mut lhs = self.iter().peekable();
        let mut rhs = other.iter().peekable();
        loop {
            let order = match (lhs.peek(), rhs.peek()) {
                (Some((i, _)), Some((j, _))) => i.cmp(j),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            let entry = match order {
                Ordering::Less => lhs.next().map(|(i, a)| (i, left(a))),
                Ordering::Greater => rhs.next().map(|(j, b)| (j, right(b))),
                Ordering::Equal => match (lhs.next(), rhs.next()) {
                    (Some((i, a)), Some((_, b))) => Some((i, both(a, b))),
                    _ => None,
                },
            };
            if let Some((i, x)) = entry {
                if !x.is_zero() {
                    out.push((i, x));
                }
            }
        }
        Self::from_sorted_entries(self.dim(), out)
    }
}

impl<E: Ring> Default for SparseVector<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Entries of a [`SparseVector`] as seen through [`GenericVector`].
pub struct VectorEntries<'a, E> {
    inner: Iter<'a, E>,
}

impl<'a, E: Clone> Iterator for VectorEntries<'a, E> {
    type Item = (usize, Cow<'a, E>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, x)| (i, Cow::Borrowed(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E: Clone> DoubleEndedIterator for VectorEntries<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(i, x)| (i, Cow::Borrowed(x)))
    }
}

impl<E: Clone> ExactSizeIterator for VectorEntries<'_, E> {}

impl<E: Clone> FusedIterator for VectorEntries<'_, E> {}

impl<E: Ring> GenericVector<E> for SparseVector<E> {
    type Entries<'a> = VectorEntries<'a, E> where Self: 'a, E: 'a;

    fn dim(&self) -> usize {
        self.data.dim
    }

    fn entries(&self) -> VectorEntries<'_, E> {
        VectorEntries { inner: self.iter() }
    }

    fn nnz(&self) -> usize {
        self.data.tree.len()
    }

    fn at(&self, index: usize) -> E {
        self.get(index)
    }
}

impl<'a, E> IntoIterator for &'a SparseVector<E> {
    type Item = (usize, &'a E);
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.data.tree.iter()
    }
}

impl<E: Ring> FromIterator<E> for SparseVector<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut dim = 0;
        let entries = iter
            .into_iter()
            .inspect(|_| dim += 1)
            .enumerate()
            .filter(|(_, x)| !x.is_zero())
            .collect();
        Self::from_sorted_entries(dim, entries)
    }
}

/// Absent entries compare as zero, so the dimensions do not take part.
impl<E: Ring> PartialEq for SparseVector<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data.tree == other.data.tree
    }
}

impl<E: Ring + Eq> Eq for SparseVector<E> {}

impl<E: fmt::Debug> fmt::Debug for SparseVector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseVector")
            .field("dim", &self.data.dim)
            .field("entries", &self.data.tree)
            .finish()
    }
}

/// Sparse text form: `(dim) (i v) (i v) ...`.
impl<E: fmt::Display> fmt::Display for SparseVector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.data.dim)?;
        for (i, x) in &self.data.tree {
            write!(f, " ({i} {x})")?;
        }
        Ok(())
    }
}

/// # Panics
///
/// Panics if the dimensions differ.
impl<E: Ring, V: GenericVector<E> + ?Sized> AddAssign<&V> for SparseVector<E> {
    fn add_assign(&mut self, rhs: &V) {
        if let Err(e) = self.try_add_assign(rhs) {
            panic!("{e}");
        }
    }
}

/// # Panics
///
/// Panics if the dimensions differ.
impl<E: Ring, V: GenericVector<E> + ?Sized> SubAssign<&V> for SparseVector<E> {
    fn sub_assign(&mut self, rhs: &V) {
        if let Err(e) = self.try_sub_assign(rhs) {
            panic!("{e}");
        }
    }
}

/// Appends `rhs` behind the current last index.
impl<E: Ring, V: GenericVector<E> + ?Sized> BitOrAssign<&V> for SparseVector<E> {
    fn bitor_assign(&mut self, rhs: &V) {
        self.append(rhs);
    }
}

impl<E: Ring> MulAssign<E> for SparseVector<E> {
    fn mul_assign(&mut self, rhs: E) {
        if rhs.is_zero() {
            let dim = self.dim();
            *self = Self::new(dim);
        } else if !self.is_zero() {
            self.scale_in_place(|x| x * rhs.clone());
        }
    }
}

impl<E: Ring + Div<Output = E>> DivAssign<E> for SparseVector<E> {
    fn div_assign(&mut self, rhs: E) {
        if !self.is_zero() {
            self.scale_in_place(|x| x / rhs.clone());
        }
    }
}

impl<E: Ring> Add for &SparseVector<E> {
    type Output = SparseVector<E>;

    fn add(self, rhs: Self) -> SparseVector<E> {
        self.merge(rhs, "add", |a, b| a.clone() + b.clone(), E::clone, E::clone)
    }
}

impl<E: Ring> Sub for &SparseVector<E> {
    type Output = SparseVector<E>;

    fn sub(self, rhs: Self) -> SparseVector<E> {
        self.merge(
            rhs,
            "sub",
            |a, b| a.clone() - b.clone(),
            E::clone,
            |b| -b.clone(),
        )
    }
}

impl<E: Ring> Neg for &SparseVector<E> {
    type Output = SparseVector<E>;

    fn neg(self) -> SparseVector<E> {
        self.map_nonzero(|x| -x.clone())
    }
}
