//! Tensor-train decomposition via sequential SVD.
//!
//! The tensor-train (TT) form represents an N-way tensor as a chain of
//! 3-way cores linked by bond ranks:
//!
//! X(i₁, ..., iₙ) = G₁\[i₁\] · G₂\[i₂\] · ... · Gₙ\[iₙ\]
//!
//! Core Gₖ has shape (rₖ₋₁, Iₖ, rₖ) with boundary ranks r₀ = rₙ = 1.
//! [`TtSvd`] builds the chain with one truncated SVD per bond, carrying the
//! remainder `diag(σ)·Vᵀ` forward after each split.

use crate::error::{DecompError, DecompResult};
use multiway_core::Tensor;
use multiway_kernels::truncated_svd;
use scirs2_core::ndarray_ext::{Array2, Array3, ArrayD, Axis, IxDyn, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign};
use std::iter::Sum;

/// Sequential-SVD tensor-train engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtSvd;

/// Tensor-train result: the chain of 3-way cores.
#[derive(Debug, Clone)]
pub struct TensorTt<T> {
    /// TT-cores; `cores[k]` has shape (rₖ₋₁, Iₖ, rₖ), and adjacent cores
    /// agree on their shared rank.
    pub cores: Vec<Array3<T>>,
    /// Achieved bond ranks \[r₁, ..., rₙ₋₁\]; never above the requested
    /// ranks, but possibly below them where an earlier truncation shrank
    /// the remainder.
    pub ranks: Vec<usize>,
    /// Shape of the tensor this decomposition represents.
    pub shape: Vec<usize>,
}

impl<T> TensorTt<T>
where
    T: Float + 'static,
{
    /// Rebuild the full tensor by contracting the chain left to right.
    pub fn reconstruct(&self) -> DecompResult<Tensor<T>> {
        let n_cores = self.cores.len();

        let first = &self.cores[0];
        if first.shape()[0] != 1 {
            return Err(DecompError::ShapeMismatch(format!(
                "first core must have leading rank 1, got {}",
                first.shape()[0]
            )));
        }

        // Accumulator starts as (I₁, r₁) and grows one mode per core.
        let mut acc: ArrayD<T> = first.index_axis(Axis(0), 0).to_owned().into_dyn();

        for core in &self.cores[1..n_cores] {
            let (r_left, i_k, r_right) = core.dim();

            let acc_shape = acc.shape().to_vec();
            let lead: usize = acc_shape[..acc_shape.len() - 1].iter().product();

            let acc_2d = acc
                .into_shape_with_order((lead, r_left))
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;
            let core_2d = core
                .view()
                .into_shape_with_order((r_left, i_k * r_right))
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;

            let contracted = acc_2d.dot(&core_2d);

            let mut next_shape = acc_shape[..acc_shape.len() - 1].to_vec();
            next_shape.push(i_k);
            next_shape.push(r_right);
            acc = contracted
                .into_shape_with_order(IxDyn(&next_shape))
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;
        }

        let acc_shape = acc.shape().to_vec();
        if acc_shape[acc_shape.len() - 1] != 1 {
            return Err(DecompError::ShapeMismatch(format!(
                "last core must have trailing rank 1, got {}",
                acc_shape[acc_shape.len() - 1]
            )));
        }

        let squeezed = acc
            .into_shape_with_order(IxDyn(&acc_shape[..acc_shape.len() - 1]))
            .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;

        Ok(Tensor::from_array(squeezed))
    }

    /// Total number of stored core entries.
    pub fn num_parameters(&self) -> usize {
        self.cores.iter().map(|core| core.len()).sum()
    }

    /// Storage ratio of the full tensor over the TT form.
    pub fn compression_ratio(&self) -> f64 {
        let full: usize = self.shape.iter().product();
        full as f64 / self.num_parameters() as f64
    }
}

impl TtSvd {
    /// Compute a tensor-train decomposition at the given bond ranks.
    ///
    /// `ranks` lists the train ranks \[r₁, ..., rₙ₋₁\] between consecutive
    /// cores. Fails with [`DecompError::RankLengthMismatch`] when the list
    /// length is not order − 1, and [`DecompError::InvalidRank`] when any
    /// rank is zero or above its theoretical bound
    /// min(∏_{i≤k} Iᵢ, ∏_{i>k} Iᵢ), both before any numeric work.
    pub fn decompose<T>(&self, tensor: &Tensor<T>, ranks: &[usize]) -> DecompResult<TensorTt<T>>
    where
        T: Float
            + NumAssign
            + Sum
            + ScalarOperand
            + Send
            + Sync
            + std::fmt::Debug
            + 'static,
    {
        let shape = tensor.shape().to_vec();
        let order = shape.len();

        if order < 2 {
            return Err(DecompError::ShapeMismatch(format!(
                "tensor must have at least 2 modes, got {}",
                order
            )));
        }
        if ranks.len() != order - 1 {
            return Err(DecompError::RankLengthMismatch {
                expected: order - 1,
                actual: ranks.len(),
            });
        }

        for (k, &rank) in ranks.iter().enumerate() {
            let left: usize = shape[..=k].iter().product();
            let right: usize = shape[k + 1..].iter().product();
            let bound = left.min(right);
            if rank == 0 || rank > bound {
                return Err(DecompError::InvalidRank { rank, bound });
            }
        }

        let mut cores = Vec::with_capacity(order);
        let mut achieved = Vec::with_capacity(order - 1);

        // Remainder starts as the full tensor, flattened row-major.
        let mut remainder: Vec<T> = tensor.view().iter().cloned().collect();
        let mut r_left = 1;

        for (k, &requested) in ranks.iter().enumerate() {
            let i_k = shape[k];
            let rest: usize = shape[k + 1..].iter().product();
            let rows = r_left * i_k;

            let matrix = Array2::from_shape_vec((rows, rest), remainder)
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;

            // An earlier truncation can shrink this split below the
            // requested rank.
            let r_right = requested.min(rows).min(rest);
            let (u, s, vt) = truncated_svd(&matrix.view(), r_right)?;

            let core = Array3::from_shape_vec(
                (r_left, i_k, r_right),
                u.iter().cloned().collect(),
            )
            .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;
            cores.push(core);
            achieved.push(r_right);

            // Carry diag(σ)·Vᵀ forward as the next remainder.
            let mut carried = Array2::<T>::zeros((r_right, rest));
            for i in 0..r_right {
                for j in 0..rest {
                    carried[[i, j]] = s[i] * vt[[i, j]];
                }
            }

            remainder = carried.iter().cloned().collect();
            r_left = r_right;
        }

        let last_size = shape[order - 1];
        if remainder.len() != r_left * last_size {
            return Err(DecompError::ShapeMismatch(format!(
                "final core holds {} entries, expected {}",
                remainder.len(),
                r_left * last_size
            )));
        }

        let last_core = Array3::from_shape_vec((r_left, last_size, 1), remainder)
            .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;
        cores.push(last_core);

        Ok(TensorTt {
            cores,
            ranks: achieved,
            shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_svd_core_shapes() {
        let tensor = Tensor::<f64>::random_uniform(&[3, 4, 5], 0.0, 1.0, Some(12));
        let tt = TtSvd.decompose(&tensor, &[2, 2]).unwrap();

        assert_eq!(tt.cores.len(), 3);
        assert_eq!(tt.ranks, vec![2, 2]);
        assert_eq!(tt.cores[0].dim(), (1, 3, 2));
        assert_eq!(tt.cores[1].dim(), (2, 4, 2));
        assert_eq!(tt.cores[2].dim(), (2, 5, 1));
    }

    #[test]
    fn test_tt_svd_chain_ranks_agree() {
        let tensor = Tensor::<f64>::random_uniform(&[3, 4, 5, 6], 0.0, 1.0, Some(13));
        let tt = TtSvd.decompose(&tensor, &[2, 3, 4]).unwrap();

        assert_eq!(tt.cores.first().unwrap().dim().0, 1);
        assert_eq!(tt.cores.last().unwrap().dim().2, 1);
        for pair in tt.cores.windows(2) {
            assert_eq!(pair[0].dim().2, pair[1].dim().0);
        }
    }

    #[test]
    fn test_tt_svd_full_rank_is_exact() {
        let tensor = Tensor::<f64>::random_uniform(&[3, 4, 5], 0.0, 1.0, Some(14));
        // Theoretical maximum bond ranks for a 3×4×5 tensor.
        let tt = TtSvd.decompose(&tensor, &[3, 5]).unwrap();

        let reconstructed = tt.reconstruct().unwrap();
        assert_eq!(reconstructed.shape(), tensor.shape());

        let err = (&tensor - &reconstructed).frobenius_norm() / tensor.frobenius_norm();
        assert!(err < 1e-10, "full-rank TT should be exact, error {}", err);
    }

    #[test]
    fn test_tt_svd_rank_validation() {
        let tensor = Tensor::<f64>::ones(&[3, 4, 5]);

        let err = TtSvd.decompose(&tensor, &[2]).unwrap_err();
        assert!(matches!(
            err,
            DecompError::RankLengthMismatch {
                expected: 2,
                actual: 1
            }
        ));

        let err = TtSvd.decompose(&tensor, &[0, 2]).unwrap_err();
        assert!(matches!(err, DecompError::InvalidRank { rank: 0, .. }));

        // Bond 0 bound for 3×4×5 is min(3, 20) = 3.
        let err = TtSvd.decompose(&tensor, &[4, 2]).unwrap_err();
        assert!(matches!(err, DecompError::InvalidRank { rank: 4, bound: 3 }));
    }

    #[test]
    fn test_tt_svd_order_one_rejected() {
        let tensor = Tensor::<f64>::ones(&[7]);
        let err = TtSvd.decompose(&tensor, &[]).unwrap_err();
        assert!(matches!(err, DecompError::ShapeMismatch(_)));
    }

    #[test]
    fn test_tt_compression() {
        let tensor = Tensor::<f64>::random_uniform(&[6, 6, 6, 6], 0.0, 1.0, Some(15));
        let tt = TtSvd.decompose(&tensor, &[3, 3, 3]).unwrap();

        assert!(tt.num_parameters() < tensor.len());
        assert!(tt.compression_ratio() > 1.0);
    }

    #[test]
    fn test_tt_reconstruction_shape_higher_order() {
        let tensor = Tensor::<f64>::random_uniform(&[2, 3, 4, 3, 2], 0.0, 1.0, Some(16));
        let tt = TtSvd.decompose(&tensor, &[2, 3, 3, 2]).unwrap();

        let reconstructed = tt.reconstruct().unwrap();
        assert_eq!(reconstructed.shape(), tensor.shape());
    }
}
