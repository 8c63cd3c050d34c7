//! Property-based tests for the tensor type.

#[cfg(test)]
mod tests {
    use crate::Tensor;
    use proptest::prelude::*;

    fn proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 32,
            ..ProptestConfig::default()
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn unfold_fold_roundtrip(
            dims in proptest::collection::vec(1usize..5, 2..5),
            mode_pick in 0usize..4,
            seed in 0u64..1000,
        ) {
            let mode = mode_pick % dims.len();
            let tensor = Tensor::<f64>::random_uniform(&dims, -1.0, 1.0, Some(seed));

            let unfolded = tensor.unfold(mode).unwrap();
            let rest: usize = dims.iter().enumerate()
                .filter(|(i, _)| *i != mode)
                .map(|(_, &d)| d)
                .product();
            prop_assert_eq!(unfolded.shape(), &[dims[mode], rest]);

            let folded = Tensor::fold(&unfolded, &dims, mode).unwrap();
            prop_assert_eq!(folded.shape(), tensor.shape());
            for (a, b) in tensor.view().iter().zip(folded.view().iter()) {
                prop_assert_eq!(a, b);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn frobenius_norm_is_unfold_invariant(
            dims in proptest::collection::vec(1usize..5, 2..4),
            seed in 0u64..1000,
        ) {
            let tensor = Tensor::<f64>::random_uniform(&dims, -1.0, 1.0, Some(seed));
            let norm = tensor.frobenius_norm();

            // Matricization reorders entries without changing them.
            for mode in 0..dims.len() {
                let unfolded = tensor.unfold(mode).unwrap();
                let unfolded_norm = unfolded.iter().map(|x| x * x).sum::<f64>().sqrt();
                prop_assert!((norm - unfolded_norm).abs() < 1e-12);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest_config())]
        #[test]
        fn from_vec_rejects_wrong_sizes(
            dims in proptest::collection::vec(1usize..5, 1..4),
            extra in 1usize..4,
        ) {
            let total: usize = dims.iter().product();
            prop_assert!(Tensor::from_vec(vec![0.0; total], &dims).is_ok());
            prop_assert!(Tensor::from_vec(vec![0.0; total + extra], &dims).is_err());
        }
    }
}
