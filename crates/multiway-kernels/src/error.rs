//! Structured error type for kernel operations.

use scirs2_linalg::LinalgError;
use thiserror::Error;

/// Error type for tensor kernel operations.
///
/// Every kernel validates its inputs up front, so a returned error means no
/// numeric work was started.
#[derive(Error, Debug)]
pub enum KernelError {
    /// Operand dimensions disagree (e.g. Khatri-Rao column counts, or a
    /// matrix contracted against the wrong mode size).
    #[error("{operation}: dimension mismatch - expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A mode index at or beyond the tensor order.
    #[error("mode {mode} out of range for tensor of order {order}")]
    ModeOutOfRange { mode: usize, order: usize },

    /// A truncation rank of zero or beyond the matrix rank bound.
    #[error("invalid rank {rank}: must be between 1 and {bound}")]
    InvalidRank { rank: usize, bound: usize },

    /// An empty operand where at least one element is required.
    #[error("{operation}: empty input not allowed")]
    EmptyInput { operation: String },

    /// Failure inside the underlying factorization routines.
    #[error("linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// Internal plumbing failure; unreachable given validated inputs.
    #[error("{operation}: {message}")]
    Operation { operation: String, message: String },
}

impl KernelError {
    pub(crate) fn operation(operation: impl Into<String>, message: impl ToString) -> Self {
        KernelError::Operation {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = KernelError::DimensionMismatch {
            operation: "khatri_rao".into(),
            expected: vec![10, 5],
            actual: vec![10, 3],
        };
        let msg = err.to_string();
        assert!(msg.contains("khatri_rao"));
        assert!(msg.contains("[10, 5]"));
        assert!(msg.contains("[10, 3]"));

        let err = KernelError::ModeOutOfRange { mode: 3, order: 3 };
        assert!(err.to_string().contains("mode 3"));

        let err = KernelError::InvalidRank { rank: 9, bound: 4 };
        assert!(err.to_string().contains("invalid rank 9"));
    }
}
