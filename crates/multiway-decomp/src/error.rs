//! Unified error type for the decomposition engines.
//!
//! Every engine validates its rank specification and configuration before
//! any numeric work starts, so a returned error never leaves a partial
//! result behind. Non-convergence of the iterative engines is not an
//! error: they return the best iterate found within the iteration cap.

use multiway_kernels::KernelError;
use scirs2_linalg::LinalgError;
use thiserror::Error;

/// Error type shared by all decomposition engines.
#[derive(Error, Debug)]
pub enum DecompError {
    /// A requested rank of zero or beyond the bound the engine allows.
    #[error("invalid rank {rank}: must be between 1 and {bound}")]
    InvalidRank { rank: usize, bound: usize },

    /// A rank specification whose length disagrees with the tensor order
    /// (or order − 1 for tensor trains).
    #[error("rank specification has {actual} entries, expected {expected}")]
    RankLengthMismatch { expected: usize, actual: usize },

    /// Shapes that should agree do not. When raised from reconstruction
    /// this is an internal invariant violation, not a user input error.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A convergence tolerance outside `[0, 1)`.
    #[error("invalid tolerance {0}: must be in [0, 1)")]
    InvalidTolerance(f64),

    /// Error propagated from a kernel operation.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Error propagated from the underlying factorization routines.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] LinalgError),
}

/// Result type for decomposition operations.
pub type DecompResult<T> = Result<T, DecompError>;
