//! Analytic evaluators for boundary values, source terms, and coefficients.
//!
//! Every evaluator here implements [`condif_core::Evaluator`]: a pure
//! function of `(time, position)` whose value shape is fixed by its type.
//!
//! # Manufactured solutions
//!
//! [`ManufacturedSource`] derives the source term that makes an assumed
//! exact solution `u` satisfy
//!
//! ```text
//! ρ ∂u/∂t - ∇·(K∇u) + β·∇u + σu = f
//! ```
//!
//! from closed-form first and second derivatives of `u`. [`verify`]
//! recomputes the same quantity by central differences for regression
//! testing.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analytic;
pub mod manufactured;
pub mod tensor;
pub mod verify;

pub use analytic::{Constant, ScalarFn, ScalarLaw, TensorFn, VectorFn};
pub use manufactured::{
    ExactSolution, ManufacturedSource, ManufacturedSourceBuilder, SineProduct, SourceContributions,
};
