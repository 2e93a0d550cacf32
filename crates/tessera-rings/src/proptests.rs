//! Property-based tests for the exact scalars.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{OrderedRing, Ring, Q, Z};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn z_is_zero_matches_value(a in small_int()) {
            prop_assert_eq!(Z::new(a).is_zero(), a == 0);
        }

        #[test]
        fn z_add_neg_is_zero(a in small_int()) {
            let a = Z::new(a);
            prop_assert!((a.clone() + (-a)).is_zero());
        }

        #[test]
        fn z_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let (a, b, c) = (Z::new(a), Z::new(b), Z::new(c));
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn q_normalized_equality(n in small_int(), d in non_zero_int(), k in non_zero_int()) {
            prop_assert_eq!(Q::new(n, d), Q::new(n * k, d * k));
        }

        #[test]
        fn q_div_mul_roundtrip(n in small_int(), d in non_zero_int(), m in non_zero_int()) {
            let a = Q::new(n, d);
            let b = Q::from_integer(m);
            prop_assert_eq!((a.clone() / b.clone()) * b, a);
        }

        #[test]
        fn q_abs_non_negative(n in small_int(), d in non_zero_int()) {
            let a = Q::new(n, d);
            prop_assert!(a.abs().signum() >= 0);
        }
    }
}
