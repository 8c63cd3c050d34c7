//! # multiway-kernels
//!
//! Linear-algebra kernels shared by every decomposition engine in the
//! multiway stack:
//!
//! - **Truncated SVD** ([`truncated_svd`]): thin SVD cut to a requested
//!   rank, the workhorse of HOSVD, HOOI, and TT-SVD.
//! - **Column orthonormalization** ([`orthonormal_columns`]): thin QR used
//!   to repair factor initializations.
//! - **Khatri-Rao product** ([`khatri_rao`], [`khatri_rao_seq`]): the
//!   column-wise Kronecker product at the heart of CP-ALS.
//! - **Mode-k product** ([`mode_product`]): tensor-times-matrix along one
//!   mode, used for Tucker cores and reconstructions.
//!
//! All kernels validate their inputs and return a structured
//! [`KernelError`] before touching any data.
//!
//! ## SciRS2 Integration
//!
//! Array operations use `scirs2_core::ndarray_ext`; factorizations use
//! `scirs2_linalg`. Direct use of `ndarray` is forbidden.
//!
//! ```
//! use scirs2_core::ndarray_ext::array;
//! use multiway_kernels::khatri_rao;
//!
//! let a = array![[1.0, 2.0], [3.0, 4.0]];
//! let b = array![[5.0, 6.0], [7.0, 8.0]];
//! let c = khatri_rao(&a.view(), &b.view()).unwrap();
//! assert_eq!(c.shape(), &[4, 2]);
//! ```

#![deny(warnings)]

pub mod error;
pub mod khatri_rao;
pub mod nmode;
pub mod svd;


pub use error::{KernelError, KernelResult};
pub use khatri_rao::{khatri_rao, khatri_rao_seq};
pub use nmode::mode_product;
pub use svd::{orthonormal_columns, truncated_svd};
