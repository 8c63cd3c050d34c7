//! Mode-k product (tensor times matrix).
//!
//! For a tensor X of shape (I₁, ..., Iₙ) and a matrix M of shape (J, Iₖ),
//! the mode-k product X ×ₖ M replaces the mode-k dimension with J:
//! the result has shape (I₁, ..., Iₖ₋₁, J, Iₖ₊₁, ..., Iₙ). Tucker cores,
//! HOOI sweeps, and reconstructions are all chains of this operation.

use crate::error::{KernelError, KernelResult};
use multiway_core::Tensor;
use scirs2_core::ndarray_ext::ArrayView2;
use scirs2_core::numeric::Float;

/// Multiply a tensor by a matrix along one mode.
///
/// Computed as unfold → multiply → fold: the mode-k unfolding X₍ₖ₎ is
/// left-multiplied by `matrix` and the product folded back with the mode-k
/// dimension replaced by the matrix's row count.
///
/// Fails with [`KernelError::ModeOutOfRange`] when `mode` is at or beyond
/// the tensor order, and [`KernelError::DimensionMismatch`] when the matrix
/// column count disagrees with the tensor's mode-k size.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::Array2;
/// use multiway_core::Tensor;
/// use multiway_kernels::mode_product;
///
/// let tensor = Tensor::<f64>::ones(&[3, 4, 5]);
/// let matrix = Array2::<f64>::ones((2, 4));
/// let result = mode_product(&tensor, &matrix.view(), 1).unwrap();
/// assert_eq!(result.shape(), &[3, 2, 5]);
/// ```
pub fn mode_product<T>(
    tensor: &Tensor<T>,
    matrix: &ArrayView2<T>,
    mode: usize,
) -> KernelResult<Tensor<T>>
where
    T: Float + 'static,
{
    let order = tensor.order();
    if mode >= order {
        return Err(KernelError::ModeOutOfRange { mode, order });
    }

    let mode_size = tensor.shape()[mode];
    let (rows, cols) = (matrix.shape()[0], matrix.shape()[1]);
    if cols != mode_size {
        return Err(KernelError::DimensionMismatch {
            operation: "mode_product".into(),
            expected: vec![rows, mode_size],
            actual: vec![rows, cols],
        });
    }

    let unfolded = tensor
        .unfold(mode)
        .map_err(|e| KernelError::operation("mode_product", e))?;

    let product = matrix.dot(&unfolded);

    let mut new_shape = tensor.shape().to_vec();
    new_shape[mode] = rows;

    Tensor::fold(&product, &new_shape, mode).map_err(|e| KernelError::operation("mode_product", e))
}
