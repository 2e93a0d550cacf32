//! Scalar contracts.
//!
//! The sparse containers are generic over their element type. The only thing
//! they need from it is captured by [`Ring`]: a distinguished zero that is
//! never stored, and the ring operations used by the arithmetic layer.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A ring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
///
/// Floating point types only satisfy the laws approximately; they are
/// accepted because the containers rely on `is_zero` alone for storage.
pub trait Ring:
    Clone
    + PartialEq
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;
}

/// A ring with a compatible total (or partial, for floats) order.
pub trait OrderedRing: Ring + PartialOrd {
    /// Returns the absolute value.
    fn abs(&self) -> Self {
        if *self < Self::zero() {
            -self.clone()
        } else {
            self.clone()
        }
    }

    /// Returns the sign: -1, 0, or 1.
    fn signum(&self) -> i8 {
        let zero = Self::zero();
        if *self > zero {
            1
        } else if *self < zero {
            -1
        } else {
            0
        }
    }
}
