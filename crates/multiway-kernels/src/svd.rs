//! Truncated SVD and QR-based orthonormalization.
//!
//! Thin wrappers over `scirs2_linalg` that add the rank validation every
//! decomposition engine relies on: an invalid truncation rank is rejected
//! before any factorization work starts.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{s, Array1, Array2, ArrayView2, ScalarOperand};
use scirs2_core::numeric::{Float, NumAssign};
use scirs2_linalg::{qr, svd};
use std::iter::Sum;

/// Thin SVD truncated to the leading `rank` singular triplets.
///
/// Returns `(U, σ, Vᵀ)` with `U` of shape (m × rank), `σ` of length `rank`,
/// and `Vᵀ` of shape (rank × n), singular values in non-increasing order.
///
/// Fails with [`KernelError::InvalidRank`] when `rank == 0` or
/// `rank > min(m, n)`.
pub fn truncated_svd<T>(
    matrix: &ArrayView2<T>,
    rank: usize,
) -> KernelResult<(Array2<T>, Array1<T>, Array2<T>)>
where
    T: Float + NumAssign + Sum + Send + Sync + ScalarOperand + std::fmt::Debug + 'static,
{
    let (rows, cols) = (matrix.shape()[0], matrix.shape()[1]);
    let bound = rows.min(cols);

    if rank == 0 || rank > bound {
        return Err(KernelError::InvalidRank { rank, bound });
    }

    let (u, s_vals, vt) = svd(matrix, false, None)?;

    let u_r = u.slice(s![.., ..rank]).to_owned();
    let s_r = s_vals.slice(s![..rank]).to_owned();
    let vt_r = vt.slice(s![..rank, ..]).to_owned();

    Ok((u_r, s_r, vt_r))
}

/// Orthonormal basis for the column space of a tall matrix.
///
/// Thin QR factorization keeping Q's first `ncols` columns, so the result
/// has the same shape as the input with `QᵀQ = I`.
///
/// Fails with [`KernelError::DimensionMismatch`] when the matrix has more
/// columns than rows.
pub fn orthonormal_columns<T>(matrix: &ArrayView2<T>) -> KernelResult<Array2<T>>
where
    T: Float
        + NumAssign
        + Sum
        + Send
        + Sync
        + ScalarOperand
        + std::fmt::Debug
        + std::fmt::Display
        + 'static,
{
    let (rows, cols) = (matrix.shape()[0], matrix.shape()[1]);
    if cols > rows {
        return Err(KernelError::DimensionMismatch {
            operation: "orthonormal_columns".into(),
            expected: vec![rows, rows],
            actual: vec![rows, cols],
        });
    }

    let (q, _r) = qr(matrix, None)?;
    Ok(q.slice(s![.., ..cols]).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_truncated_svd_shapes() {
        let matrix = array![
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0]
        ];

        let (u, s, vt) = truncated_svd(&matrix.view(), 2).unwrap();
        assert_eq!(u.shape(), &[3, 2]);
        assert_eq!(s.len(), 2);
        assert_eq!(vt.shape(), &[2, 4]);

        // Singular values come out sorted.
        assert!(s[0] >= s[1]);
        assert!(s[1] >= 0.0);
    }

    #[test]
    fn test_truncated_svd_reconstructs_low_rank() {
        // Rank-1 matrix: outer product of [1, 2, 3] and [4, 5].
        let matrix = array![[4.0, 5.0], [8.0, 10.0], [12.0, 15.0]];

        let (u, s, vt) = truncated_svd(&matrix.view(), 1).unwrap();
        for i in 0..3 {
            for j in 0..2 {
                let approx = u[[i, 0]] * s[0] * vt[[0, j]];
                assert!((approx - matrix[[i, j]]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_truncated_svd_invalid_rank() {
        let matrix = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];

        let err = truncated_svd(&matrix.view(), 0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidRank { rank: 0, bound: 2 }));

        let err = truncated_svd(&matrix.view(), 3).unwrap_err();
        assert!(matches!(err, KernelError::InvalidRank { rank: 3, bound: 2 }));
    }

    #[test]
    fn test_orthonormal_columns() {
        let matrix = array![[1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [2.0, 1.0]];
        let q = orthonormal_columns(&matrix.view()).unwrap();
        assert_eq!(q.shape(), &[4, 2]);

        let gram = q.t().dot(&q);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[[i, j]] - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_orthonormal_columns_wide_matrix() {
        let matrix = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let err = orthonormal_columns(&matrix.view()).unwrap_err();
        assert!(matches!(err, KernelError::DimensionMismatch { .. }));
    }
}
