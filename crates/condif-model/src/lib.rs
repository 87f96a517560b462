//! Registries and the term linker of the condif setup layer.
//!
//! - [`PropertyRegistry`]: named material coefficients, with the
//!   predefined `unity` property.
//! - [`AdvectionRegistry`]: named transport velocity fields.
//! - [`EquationRegistry`]: named unknowns, their boundary conditions,
//!   source and reaction terms, role links and numerical options.
//!
//! Options are closed enumerations ([`options`]) with string parsing at
//! the API boundary. [`check_model`] runs the cross-registry checks used
//! by domain finalization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advection;
pub mod equation;
pub mod options;
pub mod property;
pub mod registry;
pub mod validate;
pub mod warning;

pub use advection::{AdvectionDefinition, AdvectionField, AdvectionRegistry};
pub use equation::{
    BcDefinition, BcType, BoundaryCondition, DefaultBc, DefinitionMethod, Equation, Link, Links,
    ReactionTerm, ReactionTermOption, SourceDefinition, SourceTerm, SourceTermOption,
};
pub use options::{EquationOption, EquationParams, OptionKey};
pub use property::{Property, PropertyDefinition, PropertyKind, PropertyRegistry, UNITY};
pub use registry::{EquationRegistry, LinkTarget};
pub use validate::{check_model, ModelCheck};
pub use warning::SetupWarning;
