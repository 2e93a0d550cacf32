//! `Ring` impls for machine scalars.
//!
//! Machine integers overflow and floats round, so these are only exact on
//! small inputs. They exist because most tests and many callers work with
//! `i64` or `f64` entries.

use crate::traits::{OrderedRing, Ring};

macro_rules! impl_ring_for_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Ring for $t {
                #[inline]
                fn zero() -> Self {
                    <$t as num_traits::Zero>::zero()
                }

                #[inline]
                fn one() -> Self {
                    <$t as num_traits::One>::one()
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    num_traits::Zero::is_zero(self)
                }

                #[inline]
                fn is_one(&self) -> bool {
                    *self == <$t as num_traits::One>::one()
                }
            }

            impl OrderedRing for $t {}
        )*
    };
}

impl_ring_for_primitive!(i32, i64, i128, f32, f64);
