//! # tessera-avl
//!
//! Balanced index trees for the tessera sparse containers.
//!
//! An [`AvlTree`] is an ordered map from a non-negative index to a value.
//! It is the storage behind every sparse vector and every row or column of
//! a sparse matrix.
//!
//! ## Design Principles
//!
//! - **Arena storage**: nodes live contiguously in a `Vec`, linked by 32-bit
//!   handles instead of boxed pointers; cloning a tree is a flat copy
//! - **Dense arena**: erasing a node moves the last node into the hole, so
//!   `len()` is always the arena length
//! - **Ascending iteration**: every iterator yields keys in strictly
//!   increasing order, which merge-style consumers rely on
//!
//! The tree knows nothing about zeros; suppressing zero values is the job of
//! the sparse layer above it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod handle;
pub mod iter;
pub mod tree;

#[cfg(test)]
mod proptests;

pub use iter::{IntoIter, Iter, RangeFrom};
pub use tree::{AvlTree, TreeDefect};
