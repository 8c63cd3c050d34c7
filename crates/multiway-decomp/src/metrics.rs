//! Residual and relative-error metrics over any decomposed form.
//!
//! [`Decomposition`] tags the three decomposed forms so reconstruction can
//! dispatch in one place; [`residual`] and [`relative_error`] compare a
//! reconstruction against the original tensor.

use crate::cpd::TensorCpd;
use crate::error::{DecompError, DecompResult};
use crate::train::TensorTt;
use crate::tucker::TensorTkd;
use multiway_core::Tensor;
use scirs2_core::numeric::Float;
use std::iter::Sum;

/// Any decomposed form, tagged by family.
///
/// Each engine's `decompose` returns its concrete form; wrap it (or use the
/// `From` impls) to hand it to the metrics layer.
///
/// # Examples
///
/// ```
/// use multiway_core::Tensor;
/// use multiway_decomp::{relative_error, Decomposition, Hosvd};
///
/// let tensor = Tensor::<f64>::random_uniform(&[4, 4, 4], 0.0, 1.0, Some(1));
/// let tucker = Hosvd.decompose(&tensor, &[2, 2, 2]).unwrap();
///
/// let err = relative_error(&tensor, &Decomposition::from(tucker)).unwrap();
/// assert!((0.0..1.0).contains(&err));
/// ```
#[derive(Debug, Clone)]
pub enum Decomposition<T> {
    /// Kruskal form from the CPD engine.
    Cpd(TensorCpd<T>),
    /// Tucker form from HOSVD or HOOI.
    Tucker(TensorTkd<T>),
    /// Tensor-train form from TT-SVD.
    TensorTrain(TensorTt<T>),
}

impl<T> Decomposition<T>
where
    T: Float + Sum + 'static,
{
    /// Rebuild the full tensor from whichever form this is.
    pub fn reconstruct(&self) -> DecompResult<Tensor<T>> {
        match self {
            Decomposition::Cpd(cpd) => cpd.reconstruct(),
            Decomposition::Tucker(tucker) => tucker.reconstruct(),
            Decomposition::TensorTrain(tt) => tt.reconstruct(),
        }
    }

    /// Shape of the tensor the form represents.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Decomposition::Cpd(cpd) => cpd.shape(),
            Decomposition::Tucker(tucker) => tucker.shape(),
            Decomposition::TensorTrain(tt) => tt.shape.clone(),
        }
    }
}

impl<T> From<TensorCpd<T>> for Decomposition<T> {
    fn from(form: TensorCpd<T>) -> Self {
        Decomposition::Cpd(form)
    }
}

impl<T> From<TensorTkd<T>> for Decomposition<T> {
    fn from(form: TensorTkd<T>) -> Self {
        Decomposition::Tucker(form)
    }
}

impl<T> From<TensorTt<T>> for Decomposition<T> {
    fn from(form: TensorTt<T>) -> Self {
        Decomposition::TensorTrain(form)
    }
}

/// Elementwise difference between the original tensor and the
/// reconstruction of a decomposed form.
///
/// Fails with [`DecompError::ShapeMismatch`] when the reconstruction shape
/// disagrees with the original, an internal invariant violation for any
/// well-formed decomposed form.
pub fn residual<T>(original: &Tensor<T>, decomposed: &Decomposition<T>) -> DecompResult<Tensor<T>>
where
    T: Float + Sum + 'static,
{
    let reconstructed = decomposed.reconstruct()?;

    if reconstructed.shape() != original.shape() {
        return Err(DecompError::ShapeMismatch(format!(
            "reconstruction shape {:?} disagrees with original {:?}",
            reconstructed.shape(),
            original.shape()
        )));
    }

    Ok(original - &reconstructed)
}

/// Relative reconstruction error ‖X − X̂‖_F / ‖X‖_F.
///
/// Non-negative; returns `T::infinity()` when the original tensor has zero
/// norm and the residual does not.
pub fn relative_error<T>(original: &Tensor<T>, decomposed: &Decomposition<T>) -> DecompResult<T>
where
    T: Float + Sum + 'static,
{
    let residual_norm = residual(original, decomposed)?.frobenius_norm();
    let original_norm = original.frobenius_norm();

    if original_norm == T::zero() {
        return Ok(if residual_norm == T::zero() {
            T::zero()
        } else {
            T::infinity()
        });
    }

    Ok(residual_norm / original_norm)
}
