//! # multiway-core
//!
//! Dense tensor type and matricization primitives for the multiway stack.
//!
//! This crate provides the value type every decomposition in the workspace
//! operates on:
//!
//! - **[`Tensor`]**: a dense N-way array with an immutable shape, optional
//!   mode names, and the derived quantities decompositions need
//!   (Frobenius norm, mode-k unfolding).
//!
//! ## SciRS2 Integration
//!
//! All array storage and random number generation go through `scirs2-core`
//! (`ndarray_ext`, `numeric`, `random`). `ndarray`, `rand`, and `num-traits`
//! are never used directly.
//!
//! ## Quick Start
//!
//! ```
//! use multiway_core::Tensor;
//!
//! let tensor = Tensor::from_vec((1..=24).map(f64::from).collect(), &[2, 3, 4]).unwrap();
//! assert_eq!(tensor.order(), 3);
//! assert_eq!(tensor.shape(), &[2, 3, 4]);
//!
//! // Mode-1 matricization: rows indexed by mode 1, columns by the rest.
//! let unfolded = tensor.unfold(1).unwrap();
//! assert_eq!(unfolded.shape(), &[3, 8]);
//! ```
//!
//! Tensors are value objects: the shape is fixed at construction, and every
//! operation that changes data produces a new instance.

#![deny(warnings)]

pub mod tensor;

#[cfg(test)]
mod property_tests;

pub use tensor::Tensor;
