//! The field of rational numbers Q.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::integers::Z;
use crate::traits::{OrderedRing, Ring};

/// An arbitrary precision rational number.
///
/// Always kept in lowest terms with a positive denominator, so structural
/// equality is numeric equality.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Q(pub RBig);

impl Q {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        let q = RBig::from_parts(IBig::from(num), IBig::from(den).unsigned_abs());
        if den < 0 {
            Self(-q)
        } else {
            Self(q)
        }
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(RBig::from(IBig::from(n)))
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Z {
        Z(self.0.numerator().clone())
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> Z {
        Z(IBig::from(self.0.denominator().clone()))
    }

    /// Returns the reciprocal, or `None` for zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        if self.0.is_zero() {
            None
        } else {
            Some(Self(self.0.clone().inv()))
        }
    }

    /// Returns the nearest `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Returns the inner `RBig`.
    #[must_use]
    pub fn into_inner(self) -> RBig {
        self.0
    }
}

impl Ring for Q {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl OrderedRing for Q {
    fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }
}

impl num_traits::Zero for Q {
    fn zero() -> Self {
        <Self as Ring>::zero()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl num_traits::One for Q {
    fn one() -> Self {
        <Self as Ring>::one()
    }
}

impl Add for Q {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Q {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Q {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

/// # Panics
///
/// Panics on division by zero.
impl Div for Q {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        assert!(!rhs.0.is_zero(), "division by zero");
        Self(self.0 / rhs.0)
    }
}

impl Neg for Q {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Q {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<Z> for Q {
    fn from(value: Z) -> Self {
        Self(RBig::from(value.into_inner()))
    }
}

impl From<RBig> for Q {
    fn from(value: RBig) -> Self {
        Self(value)
    }
}

impl From<Q> for f64 {
    fn from(value: Q) -> Self {
        value.to_f64()
    }
}

/// Parses `"n"` or `"n/d"`.
impl FromStr for Q {
    type Err = dashu::base::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<RBig>().map(Self)
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_laws() {
        let a = Q::new(2, 3);
        let b = Q::new(3, 4);

        // 2/3 + 3/4 = 17/12
        let sum = a.clone() + b.clone();
        assert_eq!(sum.numerator(), Z::new(17));
        assert_eq!(sum.denominator(), Z::new(12));

        // 2/3 * 3/4 = 1/2
        assert_eq!(a * b, Q::new(1, 2));
    }

    #[test]
    fn test_negative_denominator() {
        assert_eq!(Q::new(1, -2), Q::new(-1, 2));
        assert_eq!(OrderedRing::signum(&Q::new(1, -2)), -1);
    }

    #[test]
    fn test_reciprocal() {
        let a = Q::new(3, 5);
        let inv = a.recip().unwrap();
        assert!((a * inv).is_one());
        assert!(Q::zero().recip().is_none());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Q::from(Z::new(4)), Q::from_integer(4));
        assert!((f64::from(Q::new(1, 4)) - 0.25).abs() < 1e-12);
        assert_eq!("3/4".parse::<Q>().unwrap(), Q::new(3, 4));
        assert_eq!("-5".parse::<Q>().unwrap(), Q::from_integer(-5));
    }
}
