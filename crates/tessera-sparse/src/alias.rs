//! The explicit mutable alias of a sparse vector.
//!
//! A [`VectorAlias`] does not own storage and is never cloned: it is the
//! owner, seen through another name. Every mutation made through it is a
//! mutation of the owner. Copy-on-write still separates the owner from any
//! independent copies taken earlier.

use std::ops::{Deref, DerefMut};

use tessera_rings::Ring;

use crate::generic::GenericVector;
use crate::vector::{SparseVector, VectorEntries};

/// A mutable view sharing the identity of its owning [`SparseVector`].
pub struct VectorAlias<'a, E: Ring> {
    owner: &'a mut SparseVector<E>,
}

impl<'a, E: Ring> VectorAlias<'a, E> {
    pub(crate) fn new(owner: &'a mut SparseVector<E>) -> Self {
        Self { owner }
    }

    /// Severs the alias, returning an independent (copy-on-write) vector
    /// with the owner's current contents.
    #[must_use]
    pub fn detach(self) -> SparseVector<E> {
        self.owner.clone()
    }
}

impl<E: Ring> Deref for VectorAlias<'_, E> {
    type Target = SparseVector<E>;

    fn deref(&self) -> &SparseVector<E> {
        self.owner
    }
}

impl<E: Ring> DerefMut for VectorAlias<'_, E> {
    fn deref_mut(&mut self) -> &mut SparseVector<E> {
        self.owner
    }
}

impl<E: Ring> GenericVector<E> for VectorAlias<'_, E> {
    type Entries<'b> = VectorEntries<'b, E> where Self: 'b, E: 'b;

    fn dim(&self) -> usize {
        self.owner.dim()
    }

    fn entries(&self) -> VectorEntries<'_, E> {
        GenericVector::entries(&*self.owner)
    }

    fn nnz(&self) -> usize {
        self.owner.nnz()
    }

    fn at(&self, index: usize) -> E {
        self.owner.get(index)
    }
}
