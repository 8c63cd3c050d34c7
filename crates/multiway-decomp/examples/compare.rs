//! Run all four engines on the same tensor and compare their
//! reconstruction error and storage cost.
//!
//! ```bash
//! cargo run --example compare -p multiway-decomp
//! ```

use multiway_core::Tensor;
use multiway_decomp::{relative_error, Cpd, DecompError, Decomposition, Hooi, Hosvd, TtSvd};

fn main() -> Result<(), DecompError> {
    let tensor = Tensor::<f64>::random_uniform(&[5, 6, 7], 0.0, 1.0, Some(42));
    println!(
        "input: {:?}, {} elements, |X| = {:.4}",
        tensor.shape(),
        tensor.len(),
        tensor.frobenius_norm()
    );

    let cpd = Cpd {
        seed: Some(42),
        ..Cpd::default()
    };
    let kruskal = cpd.decompose(&tensor, 5)?;
    println!(
        "CPD rank 5:        error {:.4} ({} sweeps, fit {:.4})",
        relative_error(&tensor, &Decomposition::from(kruskal.clone()))?,
        kruskal.iterations,
        kruskal.fit
    );

    let tucker = Hosvd.decompose(&tensor, &[4, 5, 6])?;
    println!(
        "HOSVD (4,5,6):     error {:.4} ({:.2}x compression)",
        relative_error(&tensor, &Decomposition::from(tucker.clone()))?,
        tucker.compression_ratio()
    );

    let refined = Hooi::default().decompose(&tensor, &[4, 5, 6])?;
    println!(
        "HOOI (4,5,6):      error {:.4} ({} sweeps)",
        relative_error(&tensor, &Decomposition::from(refined.clone()))?,
        refined.iterations
    );

    let train = TtSvd.decompose(&tensor, &[2, 3])?;
    println!(
        "TT-SVD (2,3):      error {:.4} ({} parameters, {:.2}x compression)",
        relative_error(&tensor, &Decomposition::from(train.clone()))?,
        train.num_parameters(),
        train.compression_ratio()
    );

    Ok(())
}
