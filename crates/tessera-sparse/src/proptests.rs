//! Property-based tests checking the containers against dense models.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    use crate::{
        GenericVector, Layout, NonSymmetric, SkewSymmetric, SparseMatrix, SparseVector, Symmetric,
        Symmetry,
    };

    const N: usize = 6;

    #[derive(Debug, Clone)]
    enum Op {
        Set(usize, usize, i64),
        AddTo(usize, usize, i64),
        RowSet(usize, usize, i64),
        ColSet(usize, usize, i64),
        Scale(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        let value = prop_oneof![1 => Just(0i64), 4 => -9i64..=9];
        prop_oneof![
            4 => (0..N, 0..N, value.clone()).prop_map(|(i, j, x)| Op::Set(i, j, x)),
            3 => (0..N, 0..N, value.clone()).prop_map(|(i, j, x)| Op::AddTo(i, j, x)),
            2 => (0..N, 0..N, value.clone()).prop_map(|(i, j, x)| Op::RowSet(i, j, x)),
            2 => (0..N, 0..N, value).prop_map(|(i, j, x)| Op::ColSet(i, j, x)),
            1 => prop_oneof![Just(-1i64), Just(0i64), Just(2i64)].prop_map(Op::Scale),
        ]
    }

    /// Dense model write honoring the symmetry discipline; false if the write
    /// must be refused.
    fn model_set(layout: Layout, model: &mut [Vec<i64>], i: usize, j: usize, x: i64) -> bool {
        match layout {
            Layout::SkewSymmetric if i == j => x == 0,
            Layout::SkewSymmetric => {
                model[i][j] = x;
                model[j][i] = -x;
                true
            }
            Layout::Symmetric => {
                model[i][j] = x;
                model[j][i] = x;
                true
            }
            _ => {
                model[i][j] = x;
                true
            }
        }
    }

    fn check_against_model<S: Symmetry>(ops: Vec<Op>) -> Result<(), TestCaseError> {
        let mut m = SparseMatrix::<i64, S>::new(N, N);
        let mut model = vec![vec![0i64; N]; N];
        let snapshot = m.clone();
        for op in ops {
            match op {
                Op::Set(i, j, x) => {
                    let accepted = model_set(S::LAYOUT, &mut model, i, j, x);
                    prop_assert_eq!(m.try_set(i, j, x).is_ok(), accepted);
                }
                Op::AddTo(i, j, x) => {
                    let sum = model[i][j] + x;
                    let accepted = model_set(S::LAYOUT, &mut model, i, j, sum);
                    prop_assert_eq!(m.try_add_to(i, j, x).is_ok(), accepted);
                }
                Op::RowSet(i, j, x) => {
                    let accepted = model_set(S::LAYOUT, &mut model, i, j, x);
                    prop_assert_eq!(m.row_mut(i).try_set(j, x).is_ok(), accepted);
                }
                Op::ColSet(j, i, x) => {
                    let accepted = model_set(S::LAYOUT, &mut model, i, j, x);
                    prop_assert_eq!(m.col_mut(j).try_set(i, x).is_ok(), accepted);
                }
                Op::Scale(x) => {
                    m *= x;
                    for row in &mut model {
                        for value in row.iter_mut() {
                            *value *= x;
                        }
                    }
                }
            }
            prop_assert!(m.table().is_consistent());
        }
        prop_assert_eq!(m.to_dense(), model.clone());
        for i in 0..N {
            let row: Vec<_> = m.row(i).iter().map(|(j, v)| (j, *v)).collect();
            prop_assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
            prop_assert!(row.iter().all(|(_, v)| *v != 0));
            let col: Vec<_> = m.col(i).iter().map(|(k, v)| (k, *v)).collect();
            let want: Vec<_> = (0..N)
                .filter(|&k| model[k][i] != 0)
                .map(|k| (k, model[k][i]))
                .collect();
            prop_assert_eq!(col, want);
        }
        prop_assert_eq!(snapshot.nnz(), 0);
        Ok(())
    }

    fn permutation(n: usize) -> impl Strategy<Value = Vec<usize>> {
        Just((0..n).collect::<Vec<_>>()).prop_shuffle()
    }

    fn dense(rows: usize, cols: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
        prop::collection::vec(
            prop::collection::vec(prop_oneof![2 => Just(0i64), 1 => -5i64..=5], cols),
            rows,
        )
    }

    proptest! {
        #[test]
        fn nonsymmetric_matches_model(ops in prop::collection::vec(op(), 0..80)) {
            check_against_model::<NonSymmetric>(ops)?;
        }

        #[test]
        fn symmetric_matches_model(ops in prop::collection::vec(op(), 0..80)) {
            check_against_model::<Symmetric>(ops)?;
        }

        #[test]
        fn skew_symmetric_matches_model(ops in prop::collection::vec(op(), 0..80)) {
            check_against_model::<SkewSymmetric>(ops)?;
        }

        #[test]
        fn dense_round_trip(values in dense(4, 7)) {
            let m = SparseMatrix::<i64>::from_dense(&values);
            prop_assert_eq!(m.to_dense(), values.clone());
            let nnz = values.iter().flatten().filter(|x| **x != 0).count();
            prop_assert_eq!(m.nnz(), nnz);
        }

        #[test]
        fn permutation_round_trip(values in dense(5, 4), rows in permutation(5), cols in permutation(4)) {
            let original = SparseMatrix::<i64>::from_dense(&values);
            let mut m = original.clone();
            m.permute_rows(&rows)?;
            m.permute_cols(&cols)?;
            for i in 0..5 {
                for j in 0..4 {
                    prop_assert_eq!(m.get(i, j), original.get(rows[i], cols[j]));
                }
            }
            m.permute_inv_cols(&cols)?;
            m.permute_inv_rows(&rows)?;
            prop_assert_eq!(&m, &original);
            prop_assert!(m.table().is_consistent());
        }

        #[test]
        fn symmetric_permutation_round_trip(values in dense(5, 5), perm in permutation(5)) {
            let original = SparseMatrix::<i64, SkewSymmetric>::from_dense(&values);
            let mut m = original.clone();
            m.permute_rows(&perm)?;
            for i in 0..5 {
                for j in 0..5 {
                    prop_assert_eq!(m.get(i, j), original.get(perm[i], perm[j]));
                }
            }
            m.permute_inv_rows(&perm)?;
            prop_assert_eq!(m, original);
        }

        #[test]
        fn copy_on_write_isolates(values in dense(4, 4), i in 0..4usize, j in 0..4usize, x in 1i64..9) {
            let a = SparseMatrix::<i64, Symmetric>::from_dense(&values);
            let before = a.to_dense();
            let mut b = a.clone();
            b.set(i, j, x);
            b.resize(3, 3);
            b *= 2;
            prop_assert_eq!(a.to_dense(), before);
        }

        #[test]
        fn permuting_a_copy_leaves_the_original(
            values in dense(5, 4),
            rows in permutation(5),
            cols in permutation(4),
        ) {
            let a = SparseMatrix::<i64>::from_dense(&values);
            let mut b = a.clone();
            b.permute_rows(&rows)?;
            prop_assert_eq!(a.to_dense(), values.clone());
            let mut c = a.clone();
            c.permute_cols(&cols)?;
            let mut d = a.clone();
            d.permute_inv_rows(&rows)?;
            d.permute_inv_cols(&cols)?;
            prop_assert_eq!(a.to_dense(), values.clone());
            prop_assert!(!a.is_shared());

            let s = SparseMatrix::<i64, SkewSymmetric>::from_dense(&[
                values[0].clone(),
                values[1].clone(),
                values[2].clone(),
                values[3].clone(),
            ]);
            let before = s.to_dense();
            let mut t = s.clone();
            t.permute_rows(&[3, 2, 1, 0])?;
            prop_assert_eq!(s.to_dense(), before);
        }

        #[test]
        fn permuted_vector_leaves_the_original(
            values in prop::collection::vec(-3i64..=3, 6),
            perm in permutation(6),
        ) {
            let v = SparseVector::from_dense(&values);
            let alias = v.clone();
            let p = alias.permuted(&perm)?;
            let q = alias.permuted_inv(&perm)?;
            prop_assert_eq!(v.to_dense(), values.clone());
            prop_assert_eq!(alias.to_dense(), values.clone());
            for (i, &k) in perm.iter().enumerate() {
                prop_assert_eq!(p.get(i), values[k]);
                prop_assert_eq!(q.get(k), values[i]);
            }
        }

        #[test]
        fn vector_matches_model(
            writes in prop::collection::vec((0..20usize, -3i64..=3), 0..60),
            new_dim in 0..25usize,
        ) {
            let mut v = SparseVector::new(20);
            let mut model = vec![0i64; 20];
            for (i, x) in writes {
                v.set(i, x);
                model[i] = x;
                prop_assert!(v.dim() >= v.nnz());
            }
            prop_assert_eq!(v.to_dense(), model.clone());
            let indices: Vec<_> = v.indices().collect();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            v.resize(new_dim);
            model.resize(new_dim, 0);
            prop_assert_eq!(v.dim(), new_dim);
            prop_assert_eq!(v.to_dense(), model);
        }

        #[test]
        fn vector_sum_never_stores_zero(
            a in prop::collection::vec(-2i64..=2, 12),
            b in prop::collection::vec(-2i64..=2, 12),
        ) {
            let mut x = SparseVector::from_dense(&a);
            x += &b;
            prop_assert!(x.iter().all(|(_, v)| *v != 0));
            let want: Vec<i64> = a.iter().zip(&b).map(|(p, q)| p + q).collect();
            prop_assert_eq!(x.to_dense(), want);
            prop_assert_eq!(x.dot(&b), a.iter().zip(&b).map(|(p, q)| (p + q) * q).sum::<i64>());
        }
    }
}
