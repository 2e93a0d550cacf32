//! # tessera-rings
//!
//! Scalar types for the tessera sparse containers.
//!
//! This crate provides:
//! - The `Ring` contract every stored element satisfies
//! - `OrderedRing` for scalars with an absolute value
//! - Exact scalars: `Z` (arbitrary precision integers) and `Q` (rationals)
//! - `Ring` impls for the machine types `i32`, `i64`, `i128`, `f32`, `f64`
//!
//! ## Trait Hierarchy
//!
//! ```text
//! Ring
//!  └── OrderedRing
//! ```
//!
//! The containers never look inside a scalar: they only ask whether a value
//! is zero and combine values with `+`, `-`, `*` and negation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integers;
pub mod primitive;
pub mod rationals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use integers::Z;
pub use rationals::Q;
pub use traits::{OrderedRing, Ring};
