//! Tucker decomposition: HOSVD and HOOI.
//!
//! The Tucker decomposition factorizes a tensor X into a small core G and
//! one orthonormal factor matrix per mode:
//!
//! X ≈ G ×₁ U₁ ×₂ U₂ ... ×ₙ Uₙ
//!
//! [`Hosvd`] computes the factors in one pass from the SVD of each mode
//! unfolding: deterministic, no iteration. [`Hooi`] starts from that and
//! refines the factors with alternating sweeps, which never increases the
//! reconstruction error.

use crate::error::{DecompError, DecompResult};
use multiway_core::Tensor;
use multiway_kernels::{mode_product, truncated_svd};
use scirs2_core::ndarray_ext::{Array2, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign, NumCast};
use std::iter::Sum;

/// One-shot higher-order SVD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hosvd;

/// Higher-order orthogonal iteration: HOSVD followed by alternating
/// refinement sweeps.
#[derive(Debug, Clone, Copy)]
pub struct Hooi {
    /// Cap on refinement sweeps. Hitting the cap is not an error.
    pub max_iterations: usize,
    /// Stop once the relative change in reconstruction error between
    /// sweeps falls below this.
    pub tolerance: f64,
}

impl Default for Hooi {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-6,
        }
    }
}

/// Tucker-form result: core tensor plus per-mode orthonormal factors.
#[derive(Debug, Clone)]
pub struct TensorTkd<T> {
    /// Core tensor of shape (R₁, ..., Rₙ).
    pub core: Tensor<T>,
    /// Factor matrices, one per mode, each of shape (Iₖ × Rₖ) with
    /// orthonormal columns.
    pub factors: Vec<Array2<T>>,
    /// Number of refinement sweeps performed (0 for plain HOSVD).
    pub iterations: usize,
}

impl<T> TensorTkd<T>
where
    T: Float + 'static,
{
    /// Multilinear rank: the core's shape.
    pub fn multilinear_rank(&self) -> Vec<usize> {
        self.core.shape().to_vec()
    }

    /// Shape of the tensor this decomposition represents.
    pub fn shape(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.nrows()).collect()
    }

    /// Rebuild the full tensor: G ×₁ U₁ ×₂ U₂ ... ×ₙ Uₙ.
    pub fn reconstruct(&self) -> DecompResult<Tensor<T>> {
        let mut result = self.core.clone();
        for (mode, factor) in self.factors.iter().enumerate() {
            result = mode_product(&result, &factor.view(), mode)?;
        }
        Ok(result)
    }

    /// Storage ratio of the full tensor over the Tucker form.
    pub fn compression_ratio(&self) -> f64 {
        let original: usize = self.shape().iter().product();
        let core: usize = self.core.len();
        let factors: usize = self.factors.iter().map(|f| f.len()).sum();
        original as f64 / (core + factors) as f64
    }
}

impl Hosvd {
    /// Compute a Tucker decomposition at the given multilinear rank.
    ///
    /// Fails with [`DecompError::RankLengthMismatch`] when `ranks` has a
    /// different length than the tensor order, and
    /// [`DecompError::InvalidRank`] when any rank is zero or exceeds its
    /// mode size, both before any numeric work. Each rank is additionally
    /// clamped to the unfolding's column bound, which the mode-k rank of
    /// any tensor cannot exceed.
    pub fn decompose<T>(&self, tensor: &Tensor<T>, ranks: &[usize]) -> DecompResult<TensorTkd<T>>
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
        validate_multilinear_rank(tensor.shape(), ranks)?;

        let order = tensor.order();
        let mut factors = Vec::with_capacity(order);

        for mode in 0..order {
            let unfolded = tensor
                .unfold(mode)
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;

            let effective = ranks[mode].min(unfolded.nrows()).min(unfolded.ncols());
            let (u, _s, _vt) = truncated_svd(&unfolded.view(), effective)?;
            factors.push(u);
        }

        let core = contract_all(tensor, &factors, None)?;

        Ok(TensorTkd {
            core,
            factors,
            iterations: 0,
        })
    }
}

impl Hooi {
    /// Compute a Tucker decomposition at the given multilinear rank,
    /// iteratively refined from the HOSVD initialization.
    ///
    /// Same input contract and failure modes as [`Hosvd::decompose`].
    pub fn decompose<T>(&self, tensor: &Tensor<T>, ranks: &[usize]) -> DecompResult<TensorTkd<T>>
    where
        T: Float
            + NumCast
            + NumAssign
            + Sum
            + ScalarOperand
            + Send
            + Sync
            + std::fmt::Debug
            + 'static,
    {
        let mut decomp = Hosvd.decompose(tensor, ranks)?;
        let order = tensor.order();
        let norm = tensor.frobenius_norm();

        let mut prev_error = reconstruction_error(tensor, &decomp, norm)?;
        let mut iterations = 0;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            for mode in 0..order {
                // Project every mode but this one onto its current factor,
                // then refresh this mode's factor from the projection.
                let projected = contract_all(tensor, &decomp.factors, Some(mode))?;
                let unfolded = projected
                    .unfold(mode)
                    .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;

                let effective = ranks[mode].min(unfolded.nrows()).min(unfolded.ncols());
                let (u, _s, _vt) = truncated_svd(&unfolded.view(), effective)?;
                decomp.factors[mode] = u;
            }

            decomp.core = contract_all(tensor, &decomp.factors, None)?;

            let error = reconstruction_error(tensor, &decomp, norm)?;
            let denom = prev_error.max(T::epsilon());
            if ((prev_error - error).abs() / denom) < NumCast::from(self.tolerance).unwrap() {
                break;
            }
            prev_error = error;
        }

        decomp.iterations = iterations;
        Ok(decomp)
    }
}

fn validate_multilinear_rank(shape: &[usize], ranks: &[usize]) -> DecompResult<()> {
    if ranks.len() != shape.len() {
        return Err(DecompError::RankLengthMismatch {
            expected: shape.len(),
            actual: ranks.len(),
        });
    }

    for (&rank, &mode_size) in ranks.iter().zip(shape.iter()) {
        if rank == 0 || rank > mode_size {
            return Err(DecompError::InvalidRank {
                rank,
                bound: mode_size,
            });
        }
    }

    Ok(())
}

/// Contract the tensor with the transpose of every factor, skipping
/// `skip_mode` when given: X ×₁ U₁ᵀ ... ×ₙ Uₙᵀ.
fn contract_all<T>(
    tensor: &Tensor<T>,
    factors: &[Array2<T>],
    skip_mode: Option<usize>,
) -> DecompResult<Tensor<T>>
where
    T: Float + 'static,
{
    let mut result = tensor.clone();

    for (mode, factor) in factors.iter().enumerate() {
        if Some(mode) == skip_mode {
            continue;
        }
        result = mode_product(&result, &factor.t(), mode)?;
    }

    Ok(result)
}

fn reconstruction_error<T>(tensor: &Tensor<T>, decomp: &TensorTkd<T>, norm: T) -> DecompResult<T>
where
    T: Float + Sum + 'static,
{
    let reconstructed = decomp.reconstruct()?;
    let residual_norm = (tensor - &reconstructed).frobenius_norm();
    Ok(residual_norm / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosvd_shapes() {
        let tensor = Tensor::<f64>::random_uniform(&[4, 5, 6], 0.0, 1.0, Some(2));
        let tucker = Hosvd.decompose(&tensor, &[2, 3, 3]).unwrap();

        assert_eq!(tucker.core.shape(), &[2, 3, 3]);
        assert_eq!(tucker.multilinear_rank(), vec![2, 3, 3]);
        assert_eq!(tucker.factors.len(), 3);
        assert_eq!(tucker.factors[0].shape(), &[4, 2]);
        assert_eq!(tucker.factors[1].shape(), &[5, 3]);
        assert_eq!(tucker.factors[2].shape(), &[6, 3]);
        assert_eq!(tucker.iterations, 0);
    }

    #[test]
    fn test_hosvd_factor_orthonormality() {
        let tensor = Tensor::<f64>::random_uniform(&[5, 6, 7], 0.0, 1.0, Some(3));
        let tucker = Hosvd.decompose(&tensor, &[3, 4, 5]).unwrap();

        for factor in &tucker.factors {
            let gram = factor.t().dot(factor);
            for i in 0..gram.nrows() {
                for j in 0..gram.ncols() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!((gram[[i, j]] - expected).abs() < 1e-8);
                }
            }
        }
    }

    #[test]
    fn test_hosvd_full_rank_is_exact() {
        let tensor = Tensor::<f64>::random_uniform(&[3, 4, 5], 0.0, 1.0, Some(4));
        let tucker = Hosvd.decompose(&tensor, &[3, 4, 5]).unwrap();

        let reconstructed = tucker.reconstruct().unwrap();
        assert_eq!(reconstructed.shape(), tensor.shape());

        let err = (&tensor - &reconstructed).frobenius_norm() / tensor.frobenius_norm();
        assert!(err < 1e-10, "full-rank Tucker should be exact, error {}", err);
    }

    #[test]
    fn test_hosvd_rank_validation() {
        let tensor = Tensor::<f64>::ones(&[4, 5, 6]);

        let err = Hosvd.decompose(&tensor, &[2, 3]).unwrap_err();
        assert!(matches!(
            err,
            DecompError::RankLengthMismatch {
                expected: 3,
                actual: 2
            }
        ));

        let err = Hosvd.decompose(&tensor, &[0, 3, 3]).unwrap_err();
        assert!(matches!(err, DecompError::InvalidRank { rank: 0, .. }));

        let err = Hosvd.decompose(&tensor, &[2, 6, 3]).unwrap_err();
        assert!(matches!(err, DecompError::InvalidRank { rank: 6, bound: 5 }));
    }

    #[test]
    fn test_hooi_refines_hosvd() {
        let tensor = Tensor::<f64>::random_uniform(&[6, 6, 6], 0.0, 1.0, Some(8));
        let ranks = [3, 3, 3];
        let norm = tensor.frobenius_norm();

        let hosvd = Hosvd.decompose(&tensor, &ranks).unwrap();
        let hosvd_err =
            (&tensor - &hosvd.reconstruct().unwrap()).frobenius_norm() / norm;

        let hooi = Hooi::default().decompose(&tensor, &ranks).unwrap();
        let hooi_err = (&tensor - &hooi.reconstruct().unwrap()).frobenius_norm() / norm;

        assert!(hooi.iterations >= 1);
        assert!(
            hooi_err <= hosvd_err + 1e-10,
            "HOOI ({}) must not be worse than HOSVD ({})",
            hooi_err,
            hosvd_err
        );
    }

    #[test]
    fn test_hooi_iteration_cap() {
        let tensor = Tensor::<f64>::random_uniform(&[5, 5, 5], 0.0, 1.0, Some(6));
        let hooi = Hooi {
            max_iterations: 2,
            tolerance: 0.0,
        };

        let tucker = hooi.decompose(&tensor, &[2, 2, 2]).unwrap();
        assert_eq!(tucker.iterations, 2);
    }

    #[test]
    fn test_compression_ratio() {
        let tensor = Tensor::<f64>::random_uniform(&[8, 8, 8], 0.0, 1.0, Some(7));
        let tucker = Hosvd.decompose(&tensor, &[2, 2, 2]).unwrap();

        // 512 elements against 8 + 3 * 16 = 56.
        assert!(tucker.compression_ratio() > 9.0);
        assert_eq!(tucker.shape(), vec![8, 8, 8]);
    }
}
