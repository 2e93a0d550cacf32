//! Property-based tests checking the tree against `BTreeMap`.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use crate::AvlTree;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize, i32),
        Remove(usize),
        Truncate(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0usize..64, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            3 => (0usize..64).prop_map(Op::Remove),
            1 => (0usize..80).prop_map(Op::Truncate),
        ]
    }

    proptest! {
        #[test]
        fn matches_btreemap(ops in prop::collection::vec(op(), 0..200)) {
            let mut tree = AvlTree::new();
            let mut model = BTreeMap::new();
            for op in ops {
                match op {
                    Op::Insert(k, v) => {
                        prop_assert_eq!(tree.insert(k, v), model.insert(k, v));
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(tree.remove(k), model.remove(&k));
                    }
                    Op::Truncate(bound) => {
                        tree.truncate(bound);
                        let _ = model.split_off(&bound);
                    }
                }
                prop_assert!(tree.check().is_ok());
            }
            let got: Vec<_> = tree.iter().map(|(k, v)| (k, *v)).collect();
            let want: Vec<_> = model.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn iteration_strictly_ascending(keys in prop::collection::vec(0usize..1000, 0..100)) {
            let tree: AvlTree<()> = keys.into_iter().map(|k| (k, ())).collect();
            let seen: Vec<_> = tree.keys().collect();
            prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));
            let mut reversed: Vec<_> = tree.keys().rev().collect();
            reversed.reverse();
            prop_assert_eq!(seen, reversed);
        }

        #[test]
        fn range_from_matches_model(
            keys in prop::collection::btree_set(0usize..500, 0..80),
            bound in 0usize..520,
        ) {
            let tree: AvlTree<()> = keys.iter().map(|&k| (k, ())).collect();
            let got: Vec<_> = tree.range_from(bound).map(|(k, _)| k).collect();
            let want: Vec<_> = keys.range(bound..).copied().collect();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn from_sorted_is_balanced(n in 0usize..300) {
            let tree = AvlTree::from_sorted((0..n).map(|k| (k * 3, k)).collect());
            prop_assert!(tree.check().is_ok());
            prop_assert_eq!(tree.len(), n);
        }
    }
}
