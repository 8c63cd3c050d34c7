//! Khatri-Rao product (column-wise Kronecker product).
//!
//! For matrices A (I × R) and B (J × R), the Khatri-Rao product A ⊙ B has
//! shape (I·J × R): column r is the Kronecker product of column r of A and
//! column r of B. CP-ALS forms this product over all factor matrices except
//! the one being updated.

use crate::error::{KernelError, KernelResult};
use scirs2_core::ndarray_ext::{Array2, ArrayView2};
use scirs2_core::numeric::Num;

/// Column-wise Kronecker product of two matrices.
///
/// Fails with [`KernelError::DimensionMismatch`] when the column counts
/// disagree.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use multiway_kernels::khatri_rao;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// let c = khatri_rao(&a.view(), &b.view()).unwrap();
///
/// // First column: [1*5, 1*7, 3*5, 3*7]
/// assert_eq!(c[[0, 0]], 5.0);
/// assert_eq!(c[[1, 0]], 7.0);
/// assert_eq!(c[[2, 0]], 15.0);
/// assert_eq!(c[[3, 0]], 21.0);
/// ```
pub fn khatri_rao<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> KernelResult<Array2<T>>
where
    T: Clone + Num,
{
    let (i, cols_a) = (a.shape()[0], a.shape()[1]);
    let (j, cols_b) = (b.shape()[0], b.shape()[1]);

    if cols_a != cols_b {
        return Err(KernelError::DimensionMismatch {
            operation: "khatri_rao".into(),
            expected: vec![i, cols_a],
            actual: vec![j, cols_b],
        });
    }

    let mut result = Array2::<T>::zeros((i * j, cols_a));

    for col in 0..cols_a {
        let a_col = a.column(col);
        let b_col = b.column(col);

        for (row_a, a_val) in a_col.iter().enumerate() {
            for (row_b, b_val) in b_col.iter().enumerate() {
                result[[row_a * j + row_b, col]] = a_val.clone() * b_val.clone();
            }
        }
    }

    Ok(result)
}

/// Khatri-Rao product over a sequence of matrices, folded left to right.
///
/// Rows of later matrices vary fastest, matching the column ordering of a
/// row-major mode-k unfolding over the remaining modes.
///
/// Fails with [`KernelError::EmptyInput`] on an empty slice and
/// [`KernelError::DimensionMismatch`] on any column-count disagreement.
pub fn khatri_rao_seq<T>(matrices: &[ArrayView2<T>]) -> KernelResult<Array2<T>>
where
    T: Clone + Num,
{
    let (first, rest) = matrices.split_first().ok_or(KernelError::EmptyInput {
        operation: "khatri_rao_seq".into(),
    })?;

    let mut acc = first.to_owned();
    for matrix in rest {
        acc = khatri_rao(&acc.view(), matrix)?;
    }

    Ok(acc)
}
