//! Core types and traits for the condif PDE setup layer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: typed
//! registry IDs, value shapes, setup error kinds, and the evaluation
//! traits behind boundary conditions, source terms, and coefficients.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;
pub mod value;

pub use error::{EntityClass, Role, SetupError};
pub use id::{AdvectionId, EquationId, LocationId, PropertyId};
pub use traits::{Evaluator, Law};
pub use value::{EntityKind, Point3, Tensor3, Value, ValueShape, Vector3};
