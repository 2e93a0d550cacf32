//! # tessera-sparse
//!
//! Sparse vectors and matrices with copy-on-write value semantics.
//!
//! This crate provides:
//! - [`SparseVector`]: a vector storing only its nonzero entries
//! - [`SparseMatrix`]: a matrix over a shared cell table, with
//!   [`NonSymmetric`], [`Symmetric`] and [`SkewSymmetric`] storage
//! - [`RestrictedSparseMatrix`]: a row-only or column-only builder that
//!   moves into a full matrix
//! - Row and column views ([`Line`], [`LineMut`]), submatrix views
//!   ([`Minor`], [`MinorMut`]) and the explicit vector alias
//!   ([`VectorAlias`])
//! - Arithmetic, a row-parallel matrix-vector product and
//!   [`MatrixStatistics`]
//!
//! ## Invariants
//!
//! - No stored entry is ever zero; writing zero erases
//! - Entries of a vector or line are visited in strictly ascending index
//!   order
//! - A symmetric matrix stores each off-diagonal pair once; reading across
//!   the diagonal applies the identity (symmetric) or negation
//!   (skew-symmetric), and writes are folded back the same way
//! - Copies share storage until one of them is mutated
//!
//! Index bounds are checked in debug builds only. Dimension mismatches are
//! always checked.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod alias;
mod error;
mod generic;
mod kinds;
mod line;
mod matrix;
mod minor;
mod ops;
mod parallel;
mod restricted;
mod stats;
mod table;
mod vector;

pub use alias::VectorAlias;
pub use error::{Result, SparseError};
pub use generic::{DenseEntries, GenericVector};
pub use kinds::{Layout, NonSymmetric, OnlyCols, OnlyRows, Restriction, SkewSymmetric, Symmetric, Symmetry};
pub use line::{Line, LineEntries, LineMut};
pub use matrix::SparseMatrix;
pub use minor::{Minor, MinorMut};
pub use parallel::ParallelConfig;
pub use restricted::RestrictedSparseMatrix;
pub use stats::MatrixStatistics;
pub use table::{Dir, Table};
pub use vector::{SparseVector, VectorEntries};

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests;
