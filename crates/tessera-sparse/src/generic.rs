//! The vector interface shared by every one-dimensional source.
//!
//! Anything that can list its nonzero entries in ascending index order is a
//! [`GenericVector`]: sparse vectors, matrix lines, aliases, and dense slices
//! (whose zeros are skipped). Construction, appending and arithmetic accept
//! any of them.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::iter::{Enumerate, FusedIterator};
use std::slice;

use tessera_rings::Ring;

use crate::vector::SparseVector;

/// A read-only vector with a declared dimension and ascending entries.
pub trait GenericVector<E: Ring> {
    /// Iterator over the nonzero entries.
    type Entries<'a>: Iterator<Item = (usize, Cow<'a, E>)>
    where
        Self: 'a,
        E: 'a;

    /// Returns the declared dimension.
    fn dim(&self) -> usize;

    /// Returns the nonzero entries in strictly ascending index order.
    fn entries(&self) -> Self::Entries<'_>;

    /// Returns the number of nonzero entries.
    fn nnz(&self) -> usize {
        self.entries().count()
    }

    /// Returns the entry at `index`, zero if absent.
    fn at(&self, index: usize) -> E {
        self.entries()
            .find(|(i, _)| *i >= index)
            .filter(|(i, _)| *i == index)
            .map_or_else(E::zero, |(_, v)| v.into_owned())
    }

    /// Computes the scalar product by walking both entry lists in lockstep.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    fn dot<V>(&self, other: &V) -> E
    where
        V: GenericVector<E> + ?Sized,
    {
        assert_eq!(self.dim(), other.dim(), "Vector dimension mismatch");
        let mut sum = E::zero();
        let mut lhs = self.entries().peekable();
        let mut rhs = other.entries().peekable();
        while let (Some((i, _)), Some((j, _))) = (lhs.peek(), rhs.peek()) {
            match i.cmp(j) {
                Ordering::Less => {
                    lhs.next();
                }
                Ordering::Greater => {
                    rhs.next();
                }
                Ordering::Equal => {
                    if let (Some((_, a)), Some((_, b))) = (lhs.next(), rhs.next()) {
                        sum = sum + a.into_owned() * b.into_owned();
                    }
                }
            }
        }
        sum
    }

    /// Copies the entries into a new sparse vector.
    fn to_sparse(&self) -> SparseVector<E> {
        SparseVector::from_sorted_entries(
            self.dim(),
            self.entries().map(|(i, v)| (i, v.into_owned())).collect(),
        )
    }

    /// Expands into a dense vector of length `dim()`.
    fn to_dense(&self) -> Vec<E> {
        let mut dense = vec![E::zero(); self.dim()];
        for (i, v) in self.entries() {
            dense[i] = v.into_owned();
        }
        dense
    }
}

/// Nonzero entries of a dense slice.
pub struct DenseEntries<'a, E> {
    inner: Enumerate<slice::Iter<'a, E>>,
}

impl<'a, E: Ring> Iterator for DenseEntries<'a, E> {
    type Item = (usize, Cow<'a, E>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|(_, v)| !v.is_zero())
            .map(|(i, v)| (i, Cow::Borrowed(v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<E: Ring> FusedIterator for DenseEntries<'_, E> {}

impl<E: Ring> GenericVector<E> for [E] {
    type Entries<'a> = DenseEntries<'a, E> where Self: 'a, E: 'a;

    fn dim(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> DenseEntries<'_, E> {
        DenseEntries {
            inner: self.iter().enumerate(),
        }
    }

    fn at(&self, index: usize) -> E {
        self[index].clone()
    }
}

impl<E: Ring> GenericVector<E> for Vec<E> {
    type Entries<'a> = DenseEntries<'a, E> where Self: 'a, E: 'a;

    fn dim(&self) -> usize {
        self.len()
    }

    fn entries(&self) -> DenseEntries<'_, E> {
        self.as_slice().entries()
    }

    fn at(&self, index: usize) -> E {
        self[index].clone()
    }
}
