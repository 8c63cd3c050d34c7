//! Dense N-way tensor with mode metadata and matricization.
//!
//! # SciRS2 Integration
//!
//! Array storage uses `scirs2_core::ndarray_ext`; random constructors use
//! `scirs2_core::random`. Direct use of `ndarray` or `rand` is forbidden.

use scirs2_core::ndarray_ext::{Array, Array2, ArrayView, ArrayViewMut, IxDyn};
use scirs2_core::numeric::{Float, Num};
use scirs2_core::random::{thread_rng, Rng, SeedableRng, StdRng};
use std::fmt;

/// Dense N-dimensional tensor backed by scirs2_core's ndarray.
///
/// The shape is immutable after construction; data is reachable through
/// views and indexing. Modes may optionally carry symbolic names for
/// debugging output.
///
/// # Examples
///
/// ```
/// use multiway_core::Tensor;
///
/// let tensor = Tensor::<f64>::zeros(&[2, 3, 4]);
/// assert_eq!(tensor.shape(), &[2, 3, 4]);
/// assert_eq!(tensor.order(), 3);
/// ```
#[derive(Clone)]
pub struct Tensor<T> {
    data: Array<T, IxDyn>,
    names: Option<Vec<String>>,
}

impl<T> Tensor<T>
where
    T: Clone + Num,
{
    /// Wrap an existing dynamic-dimension array.
    pub fn from_array(array: Array<T, IxDyn>) -> Self {
        Self {
            data: array,
            names: None,
        }
    }

    /// Create a tensor from a flat buffer in row-major order.
    ///
    /// Fails when the buffer length disagrees with the shape product.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_core::Tensor;
    ///
    /// let tensor = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(tensor.shape(), &[2, 3]);
    ///
    /// assert!(Tensor::from_vec(vec![1.0, 2.0], &[2, 3]).is_err());
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: &[usize]) -> anyhow::Result<Self> {
        let total: usize = shape.iter().product();
        if vec.len() != total {
            anyhow::bail!(
                "shape {:?} requires {} elements, but buffer holds {}",
                shape,
                total,
                vec.len()
            );
        }
        let array = Array::from_shape_vec(IxDyn(shape), vec)?;
        Ok(Self {
            data: array,
            names: None,
        })
    }

    /// Create a tensor filled with a single value.
    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
            names: None,
        }
    }

    /// Create a tensor of zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
            names: None,
        }
    }

    /// Create a tensor of ones.
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
            names: None,
        }
    }

    /// Attach symbolic names to the modes.
    ///
    /// Fails when the number of names disagrees with the tensor order.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_core::Tensor;
    ///
    /// let tensor = Tensor::<f64>::zeros(&[5, 6, 7])
    ///     .with_mode_names(&["subject", "trial", "channel"])
    ///     .unwrap();
    /// assert_eq!(tensor.mode_names().unwrap()[1], "trial");
    /// ```
    pub fn with_mode_names(mut self, names: &[&str]) -> anyhow::Result<Self> {
        if names.len() != self.order() {
            anyhow::bail!(
                "expected {} mode names for a tensor of order {}, got {}",
                self.order(),
                self.order(),
                names.len()
            );
        }
        self.names = Some(names.iter().map(|n| n.to_string()).collect());
        Ok(self)
    }

    /// Symbolic mode names, if any were attached.
    pub fn mode_names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Number of modes (dimensions) of this tensor.
    pub fn order(&self) -> usize {
        self.data.ndim()
    }

    /// Size of each mode.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutable reference to the underlying array.
    pub fn as_array(&self) -> &Array<T, IxDyn> {
        &self.data
    }

    /// Immutable view of the data.
    pub fn view(&self) -> ArrayView<'_, T, IxDyn> {
        self.data.view()
    }

    /// Mutable view of the data.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, IxDyn> {
        self.data.view_mut()
    }

    /// Mode-k matricization.
    ///
    /// Returns a matrix whose rows are indexed by mode `mode` and whose
    /// columns flatten the remaining modes in increasing order, last mode
    /// fastest (row-major).
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_core::Tensor;
    ///
    /// let tensor = Tensor::<f64>::zeros(&[2, 3, 4]);
    /// let unfolded = tensor.unfold(1).unwrap();
    /// assert_eq!(unfolded.shape(), &[3, 8]);
    /// ```
    pub fn unfold(&self, mode: usize) -> anyhow::Result<Array2<T>> {
        if mode >= self.order() {
            anyhow::bail!(
                "mode {} out of range for tensor of order {}",
                mode,
                self.order()
            );
        }

        let shape = self.shape();
        let mode_size = shape[mode];
        let other_size: usize = shape
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != mode)
            .map(|(_, &s)| s)
            .product();

        // Bring the target mode to the front, keep the rest in order.
        let mut perm: Vec<usize> = Vec::with_capacity(self.order());
        perm.push(mode);
        for i in 0..self.order() {
            if i != mode {
                perm.push(i);
            }
        }

        let permuted = self.data.clone().permuted_axes(IxDyn(&perm));
        let contiguous = permuted.as_standard_layout().into_owned();
        let unfolded = contiguous.into_shape_with_order((mode_size, other_size))?;

        Ok(unfolded)
    }

    /// Inverse of [`unfold`](Self::unfold): rebuild a tensor of `shape`
    /// from its mode-k matricization.
    pub fn fold(matrix: &Array2<T>, shape: &[usize], mode: usize) -> anyhow::Result<Self> {
        if mode >= shape.len() {
            anyhow::bail!("mode {} out of range for shape {:?}", mode, shape);
        }

        let mode_size = shape[mode];
        let other_size: usize = shape
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != mode)
            .map(|(_, &s)| s)
            .product();

        if matrix.shape() != [mode_size, other_size] {
            anyhow::bail!(
                "matrix shape {:?} incompatible with tensor shape {:?} unfolded at mode {}",
                matrix.shape(),
                shape,
                mode
            );
        }

        // Intermediate layout: [mode_size, remaining modes in order].
        let mut inter_shape = Vec::with_capacity(shape.len());
        inter_shape.push(mode_size);
        for (i, &s) in shape.iter().enumerate() {
            if i != mode {
                inter_shape.push(s);
            }
        }

        let inter = matrix.clone().into_shape_with_order(IxDyn(&inter_shape))?;

        let mut inv_perm = vec![0; shape.len()];
        inv_perm[mode] = 0;
        let mut next = 1;
        for (i, slot) in inv_perm.iter_mut().enumerate() {
            if i != mode {
                *slot = next;
                next += 1;
            }
        }

        let tensor = inter.permuted_axes(IxDyn(&inv_perm));
        Ok(Self {
            data: tensor.as_standard_layout().into_owned(),
            names: None,
        })
    }
}

impl<T> Tensor<T>
where
    T: Clone + Num + From<f64>,
{
    /// Tensor of uniform samples from `[low, high)`.
    ///
    /// A fixed `seed` makes the result reproducible across runs; `None`
    /// seeds from the thread RNG.
    pub fn random_uniform(shape: &[usize], low: f64, high: f64, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let total: usize = shape.iter().product();
        let range = high - low;
        let data: Vec<T> = (0..total)
            .map(|_| <T as From<f64>>::from(low + rng.random::<f64>() * range))
            .collect();
        Self {
            data: Array::from_shape_vec(IxDyn(shape), data).unwrap(),
            names: None,
        }
    }

    /// Tensor of normal samples with the given mean and standard deviation.
    pub fn random_normal(shape: &[usize], mean: f64, std: f64, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let total: usize = shape.iter().product();
        let mut data: Vec<T> = Vec::with_capacity(total + 1);
        while data.len() < total {
            // Box-Muller transform; 1 - u keeps the log argument in (0, 1].
            let u1 = 1.0 - rng.random::<f64>();
            let u2 = rng.random::<f64>();
            let radius = (-2.0 * u1.ln()).sqrt();
            let angle = 2.0 * std::f64::consts::PI * u2;
            data.push(<T as From<f64>>::from(mean + std * radius * angle.cos()));
            data.push(<T as From<f64>>::from(mean + std * radius * angle.sin()));
        }
        data.truncate(total);
        Self {
            data: Array::from_shape_vec(IxDyn(shape), data).unwrap(),
            names: None,
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            let mut entropy = thread_rng();
            StdRng::from_rng(&mut entropy)
        }
    }
}

impl<T> Tensor<T>
where
    T: Float + std::iter::Sum,
{
    /// Frobenius norm: square root of the sum of squared entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiway_core::Tensor;
    ///
    /// let tensor = Tensor::<f64>::ones(&[2, 3]);
    /// assert!((tensor.frobenius_norm() - 6.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        self.data.iter().map(|&x| x * x).sum::<T>().sqrt()
    }
}

impl<T> std::ops::Index<&[usize]> for Tensor<T> {
    type Output = T;

    fn index(&self, index: &[usize]) -> &Self::Output {
        &self.data[IxDyn(index)]
    }
}

impl<T> std::ops::IndexMut<&[usize]> for Tensor<T> {
    fn index_mut(&mut self, index: &[usize]) -> &mut Self::Output {
        &mut self.data[IxDyn(index)]
    }
}

/// Elementwise difference of two same-shape tensors.
///
/// Panics when the shapes disagree, as the underlying array subtraction
/// does; callers that cannot guarantee matching shapes must check first.
impl<'b, T> std::ops::Sub<&'b Tensor<T>> for &Tensor<T>
where
    T: Clone + Num,
{
    type Output = Tensor<T>;

    fn sub(self, rhs: &'b Tensor<T>) -> Self::Output {
        Tensor {
            data: &self.data - &rhs.data,
            names: None,
        }
    }
}

/// Elementwise sum of two same-shape tensors.
impl<'b, T> std::ops::Add<&'b Tensor<T>> for &Tensor<T>
where
    T: Clone + Num,
{
    type Output = Tensor<T>;

    fn add(self, rhs: &'b Tensor<T>) -> Self::Output {
        Tensor {
            data: &self.data + &rhs.data,
            names: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Tensor");
        dbg.field("shape", &self.data.shape())
            .field("order", &self.data.ndim());
        if let Some(names) = &self.names {
            dbg.field("modes", names);
        }
        dbg.field("data", &self.data).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iota(shape: &[usize]) -> Tensor<f64> {
        let total: usize = shape.iter().product();
        Tensor::from_vec((0..total).map(|x| x as f64).collect(), shape).unwrap()
    }

    #[test]
    fn test_from_vec_shape_check() {
        let ok = Tensor::from_vec(vec![1.0; 24], &[2, 3, 4]);
        assert!(ok.is_ok());

        let err = Tensor::from_vec(vec![1.0; 23], &[2, 3, 4]);
        assert!(err.is_err());
    }

    #[test]
    fn test_creation_basics() {
        let zeros = Tensor::<f64>::zeros(&[2, 3, 4]);
        assert_eq!(zeros.shape(), &[2, 3, 4]);
        assert_eq!(zeros.order(), 3);
        assert_eq!(zeros.len(), 24);
        assert_eq!(zeros[&[1, 2, 3]], 0.0);

        let fives = Tensor::from_elem(&[2, 2], 5.0);
        assert_eq!(fives[&[1, 1]], 5.0);
    }

    #[test]
    fn test_index_mut() {
        let mut tensor = Tensor::<f64>::zeros(&[2, 3]);
        tensor[&[1, 2]] = 42.0;
        assert_eq!(tensor[&[1, 2]], 42.0);
    }

    #[test]
    fn test_mode_names() {
        let tensor = Tensor::<f64>::zeros(&[2, 3])
            .with_mode_names(&["row", "col"])
            .unwrap();
        assert_eq!(tensor.mode_names().unwrap(), &["row", "col"]);

        let bad = Tensor::<f64>::zeros(&[2, 3]).with_mode_names(&["only-one"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_unfold_known_values() {
        // X[i, j, k] = 12i + 4j + k
        let tensor = iota(&[2, 3, 4]);

        let mode1 = tensor.unfold(1).unwrap();
        assert_eq!(mode1.shape(), &[3, 8]);
        // Column index flattens (i, k) with k fastest.
        assert_eq!(mode1[[1, 5]], 17.0); // X[1, 1, 1]
        assert_eq!(mode1[[2, 0]], 8.0); // X[0, 2, 0]

        let mode0 = tensor.unfold(0).unwrap();
        assert_eq!(mode0.shape(), &[2, 12]);
        assert_eq!(mode0[[1, 7]], 19.0); // X[1, 1, 3]
    }

    #[test]
    fn test_unfold_mode_out_of_range() {
        let tensor = Tensor::<f64>::zeros(&[2, 3]);
        assert!(tensor.unfold(2).is_err());
    }

    #[test]
    fn test_fold_roundtrip() {
        let tensor = iota(&[3, 4, 5]);
        for mode in 0..3 {
            let unfolded = tensor.unfold(mode).unwrap();
            let folded = Tensor::fold(&unfolded, &[3, 4, 5], mode).unwrap();
            assert_eq!(folded.shape(), tensor.shape());
            for (a, b) in tensor.view().iter().zip(folded.view().iter()) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_fold_rejects_bad_matrix() {
        let matrix = Array2::<f64>::zeros((3, 7));
        assert!(Tensor::fold(&matrix, &[2, 3, 4], 1).is_err());
    }

    #[test]
    fn test_frobenius_norm() {
        let tensor = Tensor::<f64>::ones(&[2, 3]);
        assert!((tensor.frobenius_norm() - 6.0_f64.sqrt()).abs() < 1e-12);

        let zero = Tensor::<f64>::zeros(&[4, 4]);
        assert_eq!(zero.frobenius_norm(), 0.0);
    }

    #[test]
    fn test_random_uniform_seeded() {
        let a = Tensor::<f64>::random_uniform(&[4, 5], 0.0, 1.0, Some(7));
        let b = Tensor::<f64>::random_uniform(&[4, 5], 0.0, 1.0, Some(7));
        for (x, y) in a.view().iter().zip(b.view().iter()) {
            assert_eq!(x, y);
        }
        for &x in a.view().iter() {
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_random_normal_shape() {
        // Odd element count exercises the Box-Muller pair truncation.
        let t = Tensor::<f64>::random_normal(&[3, 5], 0.0, 1.0, Some(11));
        assert_eq!(t.len(), 15);
    }

    #[test]
    fn test_sub_elementwise() {
        let a = Tensor::from_vec(vec![3.0, 4.0, 5.0, 6.0], &[2, 2]).unwrap();
        let b = Tensor::from_vec(vec![1.0, 1.0, 2.0, 2.0], &[2, 2]).unwrap();
        let diff = &a - &b;
        assert_eq!(diff[&[0, 0]], 2.0);
        assert_eq!(diff[&[1, 1]], 4.0);

        let sum = &a + &b;
        assert_eq!(sum[&[1, 0]], 7.0);
    }
}
