//! # multiway-decomp
//!
//! Tensor decomposition engines over [`multiway_core::Tensor`]:
//!
//! ### Canonical polyadic decomposition (CPD)
//!
//! Factorizes a tensor into a sum of rank-1 components:
//!
//! ```text
//! X ≈ Σᵣ λᵣ (u₁ᵣ ⊗ u₂ᵣ ⊗ ... ⊗ uₙᵣ)
//! ```
//!
//! [`Cpd`] runs alternating least squares with convergence detection and a
//! reproducible seeded initialization.
//!
//! ### Tucker decomposition
//!
//! Factorizes a tensor into a core contracted with one orthonormal factor
//! matrix per mode:
//!
//! ```text
//! X ≈ G ×₁ U₁ ×₂ U₂ ... ×ₙ Uₙ
//! ```
//!
//! [`Hosvd`] is the one-pass SVD construction; [`Hooi`] refines it with
//! alternating sweeps and never does worse than its own initialization.
//!
//! ### Tensor-train decomposition
//!
//! Represents a tensor as a chain of 3-way cores:
//!
//! ```text
//! X(i₁,...,iₙ) = G₁[i₁] · G₂[i₂] · ... · Gₙ[iₙ]
//! ```
//!
//! [`TtSvd`] builds the chain by sequential truncated SVD.
//!
//! ### Residual & metrics
//!
//! Any result converts into the tagged [`Decomposition`] form, which
//! [`residual`] and [`relative_error`] reconstruct and compare against the
//! original tensor.
//!
//! ## Quick Start
//!
//! ```
//! use multiway_core::Tensor;
//! use multiway_decomp::{relative_error, Cpd, Decomposition, Hosvd};
//!
//! let tensor = Tensor::<f64>::random_uniform(&[5, 6, 7], 0.0, 1.0, Some(42));
//!
//! // Rank-3 CPD with a reproducible seed.
//! let cpd = Cpd { seed: Some(42), ..Cpd::default() };
//! let kruskal = cpd.decompose(&tensor, 3)?;
//! println!("fit {:.4} after {} sweeps", kruskal.fit, kruskal.iterations);
//!
//! // Tucker at multilinear rank (4, 5, 6).
//! let tucker = Hosvd.decompose(&tensor, &[4, 5, 6])?;
//! println!("core shape {:?}", tucker.core.shape());
//!
//! let err = relative_error(&tensor, &Decomposition::from(tucker))?;
//! assert!(err < 1.0);
//! # Ok::<(), multiway_decomp::DecompError>(())
//! ```
//!
//! ## Error handling
//!
//! Rank specifications are validated before any numeric work starts
//! ([`DecompError::InvalidRank`], [`DecompError::RankLengthMismatch`]).
//! Non-convergence is not an error: the iterative engines return the best
//! iterate found within their iteration cap, and report the sweep count on
//! the result.
//!
//! ## SciRS2 Integration
//!
//! Factorizations use `scirs2-linalg` (SVD, QR, least squares); arrays and
//! RNG come from `scirs2-core`. Direct use of `ndarray` or `rand` is
//! forbidden.
//!
//! ## References
//!
//! - Kolda & Bader (2009), "Tensor Decompositions and Applications"
//! - De Lathauwer et al. (2000), "Multilinear Singular Value Decomposition"
//! - Oseledets (2011), "Tensor-Train Decomposition"

#![deny(warnings)]

pub mod cpd;
pub mod error;
pub mod metrics;
pub mod train;
pub mod tucker;


pub use cpd::{Cpd, InitStrategy, TensorCpd};
pub use error::{DecompError, DecompResult};
pub use metrics::{relative_error, residual, Decomposition};
pub use train::{TensorTt, TtSvd};
pub use tucker::{Hooi, Hosvd, TensorTkd};
