//! # shunt-core
//!
//! Core buffer and execution primitives for shunt.
//!
//! This crate provides:
//! - [`Tensor`] — dense 4-D sample batch with value and gradient views
//! - [`Shape`] — the fixed (N, C, H, W) batch shape
//! - [`Element`] — compile-time numeric element parametrization
//! - [`CopyBackend`] trait — block-copy execution, serial and rayon
//! - [`Error`] / [`Result`] — the routing error taxonomy

pub mod backend;
pub mod element;
pub mod error;
pub mod shape;
pub mod tensor;

pub use backend::{CopyBackend, RayonBackend, SerialBackend};
pub use element::Element;
pub use error::{Error, Result};
pub use shape::Shape;
pub use tensor::Tensor;
