//! Canonical polyadic decomposition via alternating least squares.
//!
//! The CPD factorizes a tensor X into a sum of R rank-1 terms:
//!
//! X ≈ Σᵣ λᵣ (u₁ᵣ ⊗ u₂ᵣ ⊗ ... ⊗ uₙᵣ)
//!
//! where the uₖᵣ form factor matrices Uₖ ∈ ℝ^(Iₖ×R), one per mode, and the
//! λᵣ are optional weights. ALS sweeps over the modes, holding all factors
//! but one fixed: the Khatri-Rao product of the others against the mode-k
//! unfolding yields a linear least-squares update for that factor.
//!
//! The result is a local optimum that depends on the initialization; pass a
//! fixed [`Cpd::seed`] for reproducible runs.
//!
//! # SciRS2 Integration
//!
//! Array operations use `scirs2_core::ndarray_ext`, least-squares solves
//! use `scirs2_linalg`, and random initialization uses
//! `scirs2_core::random`. Direct use of `ndarray` or `rand` is forbidden.

use crate::error::{DecompError, DecompResult};
use multiway_core::Tensor;
use multiway_kernels::{khatri_rao_seq, orthonormal_columns, truncated_svd};
use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView2, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign, NumCast};
use scirs2_core::random::{thread_rng, Rng, SeedableRng, StdRng};
use scirs2_core::StandardNormal;
use scirs2_linalg::lstsq;
use std::iter::Sum;

/// Factor-matrix initialization strategy for ALS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitStrategy {
    /// Uniform samples from [0, 1).
    #[default]
    Random,
    /// Standard normal samples.
    RandomNormal,
    /// Leading left singular vectors of each mode unfolding, noise-filled
    /// and re-orthonormalized when the unfolding runs out of columns.
    Svd,
}

/// Configuration for the ALS solver.
///
/// # Examples
///
/// ```
/// use multiway_core::Tensor;
/// use multiway_decomp::Cpd;
///
/// let tensor = Tensor::<f64>::random_uniform(&[5, 6, 7], 0.0, 1.0, Some(42));
/// let cpd = Cpd {
///     seed: Some(42),
///     ..Cpd::default()
/// };
/// let result = cpd.decompose(&tensor, 3).unwrap();
/// assert_eq!(result.rank(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Cpd {
    /// Cap on full ALS sweeps. Hitting the cap is not an error; the best
    /// iterate found is returned.
    pub max_iterations: usize,
    /// Stop once the fit improves by less than this between sweeps.
    pub tolerance: f64,
    /// Factor initialization strategy.
    pub init: InitStrategy,
    /// Seed for the initialization RNG; `None` draws from thread entropy.
    pub seed: Option<u64>,
}

impl Default for Cpd {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-6,
            init: InitStrategy::default(),
            seed: None,
        }
    }
}

/// Kruskal-form result of a CPD.
#[derive(Debug, Clone)]
pub struct TensorCpd<T> {
    /// Factor matrices, one per mode, each of shape (Iₖ × R).
    pub factors: Vec<Array2<T>>,
    /// Per-component weights; `None` until [`normalize_weights`]
    /// (TensorCpd::normalize_weights) absorbs the column norms.
    pub weights: Option<Array1<T>>,
    /// Final fit, 1 − ‖X − X̂‖/‖X‖, clamped to [0, 1].
    pub fit: T,
    /// Number of ALS sweeps performed.
    pub iterations: usize,
}

impl<T> TensorCpd<T>
where
    T: Float,
{
    /// CP rank: every factor matrix shares this column count.
    pub fn rank(&self) -> usize {
        self.factors[0].ncols()
    }

    /// Number of modes.
    pub fn order(&self) -> usize {
        self.factors.len()
    }

    /// Shape of the tensor this decomposition represents.
    pub fn shape(&self) -> Vec<usize> {
        self.factors.iter().map(|f| f.nrows()).collect()
    }

    /// Rebuild the full tensor as the sum of R rank-1 outer products.
    pub fn reconstruct(&self) -> DecompResult<Tensor<T>> {
        let shape = self.shape();
        let order = self.order();
        let rank = self.rank();
        let total: usize = shape.iter().product();

        let mut data = vec![T::zero(); total];
        for r in 0..rank {
            let weight = self.weights.as_ref().map_or(T::one(), |w| w[r]);

            for (idx, slot) in data.iter_mut().enumerate() {
                let mut value = weight;
                let mut remaining = idx;
                for mode in (0..order).rev() {
                    let mode_idx = remaining % shape[mode];
                    remaining /= shape[mode];
                    value = value * self.factors[mode][[mode_idx, r]];
                }
                *slot = *slot + value;
            }
        }

        Tensor::from_vec(data, &shape).map_err(|e| DecompError::ShapeMismatch(e.to_string()))
    }

    /// Normalize every factor column to unit length, accumulating the norms
    /// into the component weights.
    pub fn normalize_weights(&mut self) {
        let rank = self.rank();
        let mut weights = Array1::<T>::ones(rank);

        for factor in &mut self.factors {
            for r in 0..rank {
                let mut norm_sq = T::zero();
                for i in 0..factor.nrows() {
                    let v = factor[[i, r]];
                    norm_sq = norm_sq + v * v;
                }
                let norm = norm_sq.sqrt();
                if norm > T::epsilon() {
                    weights[r] = weights[r] * norm;
                    for i in 0..factor.nrows() {
                        factor[[i, r]] = factor[[i, r]] / norm;
                    }
                }
            }
        }

        self.weights = Some(weights);
    }
}

impl Cpd {
    /// Compute a rank-R canonical polyadic decomposition of `tensor`.
    ///
    /// Fails with [`DecompError::InvalidRank`] when `rank` is zero or
    /// exceeds the product of the two smallest mode sizes, and with
    /// [`DecompError::InvalidTolerance`] when the tolerance is outside
    /// `[0, 1)`; in both cases before any numeric work.
    pub fn decompose<T>(&self, tensor: &Tensor<T>, rank: usize) -> DecompResult<TensorCpd<T>>
    where
        T: Float
            + NumCast
            + NumAssign
            + Sum
            + ScalarOperand
            + Send
            + Sync
            + std::fmt::Debug
            + std::fmt::Display
            + 'static,
    {
        let order = tensor.order();
        if order < 2 {
            return Err(DecompError::ShapeMismatch(format!(
                "tensor must have at least 2 modes, got {}",
                order
            )));
        }

        let bound = cp_rank_bound(tensor.shape());
        if rank == 0 || rank > bound {
            return Err(DecompError::InvalidRank { rank, bound });
        }
        if !(0.0..1.0).contains(&self.tolerance) {
            return Err(DecompError::InvalidTolerance(self.tolerance));
        }

        // The unfoldings are fixed across the whole ALS run.
        let mut unfoldings = Vec::with_capacity(order);
        for mode in 0..order {
            let unfolded = tensor
                .unfold(mode)
                .map_err(|e| DecompError::ShapeMismatch(e.to_string()))?;
            unfoldings.push(unfolded);
        }

        let mut factors = self.initial_factors(&unfoldings, rank)?;
        let norm_sq: T = tensor.view().iter().map(|&x| x * x).sum();

        let mut prev_fit = T::zero();
        let mut fit = T::zero();
        let mut iterations = 0;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            for mode in 0..order {
                let others: Vec<ArrayView2<T>> = factors
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != mode)
                    .map(|(_, f)| f.view())
                    .collect();

                // MTTKRP for this mode: X_(mode) · (⊙ other factors).
                let kr = khatri_rao_seq(&others)?;
                let target = unfoldings[mode].dot(&kr);

                let gram = gram_hadamard(&factors, Some(mode));
                factors[mode] = solve_normal_equations(&target, &gram)?;
            }

            fit = compute_fit(&unfoldings[0], &factors, norm_sq)?;

            let change = (fit - prev_fit).abs();
            if iter > 0 && change < NumCast::from(self.tolerance).unwrap() {
                break;
            }
            prev_fit = fit;
        }

        Ok(TensorCpd {
            factors,
            weights: None,
            fit,
            iterations,
        })
    }

    fn initial_factors<T>(
        &self,
        unfoldings: &[Array2<T>],
        rank: usize,
    ) -> DecompResult<Vec<Array2<T>>>
    where
        T: Float
            + NumCast
            + NumAssign
            + Sum
            + ScalarOperand
            + Send
            + Sync
            + std::fmt::Debug
            + std::fmt::Display
            + 'static,
    {
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut entropy = thread_rng();
                StdRng::from_rng(&mut entropy)
            }
        };

        let mut factors = Vec::with_capacity(unfoldings.len());

        match self.init {
            InitStrategy::Random => {
                for unfolding in unfoldings {
                    let mode_size = unfolding.nrows();
                    let factor = Array2::from_shape_fn((mode_size, rank), |_| {
                        NumCast::from(rng.random::<f64>()).unwrap()
                    });
                    factors.push(factor);
                }
            }
            InitStrategy::RandomNormal => {
                for unfolding in unfoldings {
                    let mode_size = unfolding.nrows();
                    let factor = Array2::from_shape_fn((mode_size, rank), |_| {
                        let sample: f64 = rng.sample(StandardNormal);
                        NumCast::from(sample).unwrap()
                    });
                    factors.push(factor);
                }
            }
            InitStrategy::Svd => {
                for unfolding in unfoldings {
                    let mode_size = unfolding.nrows();
                    let available = rank.min(mode_size).min(unfolding.ncols());

                    let (u, _s, _vt) = truncated_svd(&unfolding.view(), available)?;

                    let mut factor = Array2::<T>::zeros((mode_size, rank));
                    for i in 0..mode_size {
                        for j in 0..available {
                            factor[[i, j]] = u[[i, j]];
                        }
                    }

                    // Fill the columns the unfolding cannot provide with
                    // small noise so the least-squares updates stay
                    // well-posed.
                    for j in available..rank {
                        for i in 0..mode_size {
                            let sample: f64 = rng.sample(StandardNormal);
                            factor[[i, j]] = NumCast::from(0.01 * sample).unwrap();
                        }
                    }

                    if rank <= mode_size {
                        factor = orthonormal_columns(&factor.view())?;
                    }

                    factors.push(factor);
                }
            }
        }

        Ok(factors)
    }
}

/// Largest CP rank the solver accepts: the product of the two smallest
/// mode sizes. Anything above it signals a caller bug rather than a
/// meaningful approximation request.
fn cp_rank_bound(shape: &[usize]) -> usize {
    let mut sorted = shape.to_vec();
    sorted.sort_unstable();
    sorted[0] * sorted[1]
}

/// Hadamard product of the factor Gram matrices, optionally skipping one
/// mode: ⊛_{k≠skip} UₖᵀUₖ.
fn gram_hadamard<T>(factors: &[Array2<T>], skip: Option<usize>) -> Array2<T>
where
    T: Float + 'static,
{
    let rank = factors[0].ncols();
    let mut gram = Array2::<T>::ones((rank, rank));

    for (i, factor) in factors.iter().enumerate() {
        if Some(i) == skip {
            continue;
        }
        let factor_gram = factor.t().dot(factor);
        gram = gram * &factor_gram;
    }

    gram
}

/// Solve factor · G = M for the factor, row by row through `lstsq`.
///
/// Falls back to a ridge-damped system when the Gram matrix is singular
/// (collinear factor columns mid-iteration).
fn solve_normal_equations<T>(target: &Array2<T>, gram: &Array2<T>) -> DecompResult<Array2<T>>
where
    T: Float + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
{
    let (rows, rank) = (target.nrows(), target.ncols());
    let gram_t = gram.t().to_owned();

    let mut result = Array2::<T>::zeros((rows, rank));

    for i in 0..rows {
        let b = target.row(i).to_owned();

        match lstsq(&gram_t.view(), &b.view(), None) {
            Ok(solution) => {
                for j in 0..rank {
                    result[[i, j]] = solution.x[j];
                }
            }
            Err(_) => {
                let eps = T::epsilon() * NumCast::from(rank * 10).unwrap();
                let mut damped = gram_t.clone();
                for k in 0..rank {
                    damped[[k, k]] += eps;
                }

                let solution = lstsq(&damped.view(), &b.view(), None)?;
                for j in 0..rank {
                    result[[i, j]] = solution.x[j];
                }
            }
        }
    }

    Ok(result)
}

/// Fit without explicit reconstruction, through
/// ‖X − X̂‖² = ‖X‖² + ‖X̂‖² − 2⟨X, X̂⟩.
fn compute_fit<T>(
    unfolding0: &Array2<T>,
    factors: &[Array2<T>],
    norm_sq: T,
) -> DecompResult<T>
where
    T: Float + 'static,
{
    // ‖X̂‖²: every entry of the all-mode Gram Hadamard product summed.
    let full_gram = gram_hadamard(factors, None);
    let recon_norm_sq = full_gram.iter().fold(T::zero(), |acc, &v| acc + v);

    // ⟨X, X̂⟩ via the mode-0 MTTKRP.
    let others: Vec<ArrayView2<T>> = factors[1..].iter().map(|f| f.view()).collect();
    let kr = khatri_rao_seq(&others)?;
    let mttkrp0 = unfolding0.dot(&kr);

    let mut inner = T::zero();
    for (m, f) in mttkrp0.iter().zip(factors[0].iter()) {
        inner = inner + *m * *f;
    }

    let two = T::one() + T::one();
    let error_sq = norm_sq + recon_norm_sq - two * inner;
    let error = error_sq.max(T::zero()).sqrt();

    let fit = T::one() - error / norm_sq.sqrt();
    Ok(fit.max(T::zero()).min(T::one()))
}
