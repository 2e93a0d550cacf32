//! Integration tests for tessera-sparse.

#[cfg(test)]
mod integration_tests {
    use crate::{
        GenericVector, OnlyCols, ParallelConfig, RestrictedSparseMatrix, SkewSymmetric,
        SparseMatrix, SparseVector, Symmetric,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use tessera_rings::Q;

    #[test]
    fn test_vector_reads_absent_as_zero() {
        let v = SparseVector::from_pairs(5, [(1, 10i64), (3, -2)]);
        assert_eq!(v.dim(), 5);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(0), 0);
        assert_eq!(v.get(1), 10);
        assert_eq!(v.get(3), -2);
        assert_eq!(v.get(4), 0);
    }

    #[test]
    fn test_vector_zero_write_erases() {
        let mut v = SparseVector::from_pairs(5, [(1, 10i64), (3, -2)]);
        v.set(1, 0);
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(1), 0);
        assert_eq!(v.dim(), 5);
    }

    #[test]
    fn test_skew_symmetric_mirror() {
        let mut m = SparseMatrix::<i64, SkewSymmetric>::new(3, 3);
        m.set(0, 1, 5);
        assert_eq!(m.get(1, 0), -5);
        assert_eq!(m.get(0, 0), 0);
    }

    #[test]
    fn test_symmetric_mirror() {
        let mut m = SparseMatrix::<i64, Symmetric>::new(4, 4);
        m.set(2, 3, 7);
        assert_eq!(m.get(3, 2), 7);
    }

    #[test]
    fn test_copy_is_isolated_from_mutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut a = SparseMatrix::<i64>::new(100, 100);
        for _ in 0..1_000 {
            let (i, j) = (rng.gen_range(0..100), rng.gen_range(0..100));
            a.set(i, j, rng.gen_range(1..1_000));
        }
        let before = a.get(5, 5);
        let mut b = a.clone();
        b.set(5, 5, 99);
        assert_eq!(a.get(5, 5), before);
        assert_eq!(b.get(5, 5), 99);
        assert!(!a.is_shared());
    }

    #[test]
    fn test_permute_rows_then_inverse() {
        let original = SparseMatrix::<i64>::from_dense(&[
            vec![1, 0, 0, 2],
            vec![0, 3, 0, 0],
            vec![4, 0, 5, 0],
            vec![0, 0, 0, 6],
        ]);
        let perm = [2, 0, 3, 1];
        let mut m = original.clone();
        m.permute_rows(&perm).unwrap();
        m.permute_inv_rows(&perm).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), original.get(i, j));
            }
        }
        assert_eq!(m, original);
    }

    #[test]
    fn test_permuting_a_copy_is_isolated() {
        let a = SparseMatrix::<i64>::from_dense(&[vec![0, 3], vec![5, 0]]);
        let mut b = a.clone();
        b.permute_rows(&[1, 0]).unwrap();
        b.permute_inv_cols(&[1, 0]).unwrap();
        assert_eq!(a.get(0, 1), 3);
        assert_eq!(a.get(1, 0), 5);
        assert_eq!(b.get(1, 0), 3);
        assert!(!a.is_shared());

        let v = SparseVector::from_pairs(3, [(0, 1i64), (2, 4)]);
        let w = v.clone().permuted(&[2, 1, 0]).unwrap();
        assert_eq!(v.to_dense(), vec![1, 0, 4]);
        assert_eq!(w.to_dense(), vec![4, 0, 1]);
    }

    #[test]
    fn test_column_builder_with_rationals() {
        let columns = ["1/2 0 -3", "0 0 0", "4 7/3 0"];
        let mut builder = RestrictedSparseMatrix::<Q, OnlyCols>::new();
        for column in columns {
            let values: Vec<Q> = column
                .split_whitespace()
                .map(|token| token.parse().unwrap())
                .collect();
            builder |= &values;
        }
        builder.squeeze();
        let m = builder.into_matrix();
        assert_eq!((m.num_rows(), m.num_cols()), (3, 2));
        assert_eq!(m.get(0, 0), Q::new(1, 2));
        assert_eq!(m.get(1, 1), Q::new(7, 3));
        assert_eq!(m.row(2).nnz(), 1);

        let floats: SparseMatrix<f64> = m.map_nonzero(Q::to_f64);
        assert!((floats.get(2, 0) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lines_feed_vector_arithmetic() {
        let m = SparseMatrix::<i64, Symmetric>::from_dense(&[
            vec![2, 0, 0],
            vec![1, 3, 0],
            vec![0, 4, 5],
        ]);
        let mut v = m.row(1).to_sparse();
        v += &m.col(2);
        assert_eq!(v.to_dense(), vec![1, 7, 9]);
        assert_eq!(m.row(0).dot(&m.col(1)), 5);
        let y = m
            .mul_vector_parallel(&v, &ParallelConfig { parallel_threshold: 1 })
            .unwrap();
        assert_eq!(y, m.mul_vector(&v).unwrap());
    }

    #[test]
    fn test_statistics_over_a_family() {
        let mut stats = SparseMatrix::<i64>::identity(3).statistics();
        stats += &SparseMatrix::<i64>::from_dense(&[vec![0, -4], vec![2, 2]]).statistics();
        assert_eq!(stats.max_nnz, 3);
        assert_eq!(stats.max_row_size, 2);
        assert_eq!(stats.max_abs, 4);
    }
}
