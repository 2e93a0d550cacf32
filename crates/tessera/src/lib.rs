//! # Tessera
//!
//! Sparse vectors and matrices for exact and floating-point computation.
//!
//! ## Features
//!
//! - **Zero suppression**: only nonzero entries are stored, in balanced
//!   index trees iterated in ascending order
//! - **Symmetric storage**: symmetric and skew-symmetric matrices store one
//!   triangle and mirror reads and writes across the diagonal
//! - **Copy-on-write**: copies are O(1) and divorce on first mutation
//! - **Incremental building**: row-only and column-only builders move into a
//!   full matrix in one pass
//! - **Exact scalars**: arbitrary precision integers and rationals
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let mut m = SparseMatrix::<Q, Symmetric>::new(4, 4);
//! m.set(2, 3, Q::new(7, 2));
//! assert_eq!(m.get(3, 2), Q::new(7, 2));
//!
//! let snapshot = m.clone();
//! m.row_mut(0).set(0, Q::from_integer(1));
//! assert_eq!(snapshot.nnz(), 1);
//! assert_eq!(m.nnz(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use tessera_avl as avl;
pub use tessera_rings as rings;
pub use tessera_sparse as sparse;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tessera_rings::{OrderedRing, Ring, Q, Z};
    pub use tessera_sparse::{
        GenericVector, NonSymmetric, OnlyCols, OnlyRows, RestrictedSparseMatrix, SkewSymmetric,
        SparseError, SparseMatrix, SparseVector, Symmetric,
    };
}
