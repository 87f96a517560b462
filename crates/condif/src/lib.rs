//! condif: the setup layer of a convection-diffusion-reaction solver.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all condif sub-crates. For most users, adding `condif` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use condif::prelude::*;
//!
//! let mut b = DomainBuilder::new();
//! b.add_property("rho.cp", PropertyKind::Isotropic).unwrap();
//! b.define_property(
//!     "rho.cp",
//!     PropertyDefinition::parse_constant(PropertyKind::Isotropic, "1.0").unwrap(),
//! )
//! .unwrap();
//! b.add_equation("AdvDiff", "Potential", ValueShape::Scalar, DefaultBc::ZeroValue)
//!     .unwrap();
//! b.link("AdvDiff", Role::Time, "rho.cp").unwrap();
//! b.link("AdvDiff", Role::Diffusion, "unity").unwrap();
//! b.add_source_term(
//!     "AdvDiff",
//!     Some("SourceTerm"),
//!     None,
//!     SourceDefinition::Analytic(ScalarFn::shared(|_, x| x[0] * x[1])),
//! )
//! .unwrap();
//! b.set_source_term_option("AdvDiff", Some("SourceTerm"), "quadrature", "subdiv")
//!     .unwrap();
//! b.set_time_step(TimeStepPolicy::parse(100, 10.0, "value", "1").unwrap());
//!
//! let domain = b.finalize().unwrap();
//! assert!(domain.equations().get("AdvDiff").unwrap().is_unsteady());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `condif-core` | ids, values, setup errors, the evaluator traits |
//! | [`eval`] | `condif-eval` | analytic evaluators, manufactured sources, finite-difference checks |
//! | [`mesh`] | `condif-mesh` | mesh locations and overlap detection |
//! | [`model`] | `condif-model` | property, advection and equation registries, options |
//! | [`domain`] | `condif-domain` | the domain builder and the frozen domain |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and ids (`condif-core`).
///
/// Contains [`types::Value`], [`types::SetupError`] and the
/// [`types::Evaluator`] and [`types::Law`] traits.
pub use condif_core as types;

/// Analytic evaluators and verification helpers (`condif-eval`).
pub use condif_eval as eval;

/// Mesh locations and overlap detection (`condif-mesh`).
///
/// Implement [`mesh::EntitySelector`] to let the domain resolve
/// locations against a real mesh.
pub use condif_mesh as mesh;

/// Registries, options and the term linker (`condif-model`).
pub use condif_model as model;

/// The domain builder and the frozen domain (`condif-domain`).
pub use condif_domain as domain;

/// Common imports for typical condif usage.
///
/// ```rust
/// use condif::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use condif_core::{
        EntityKind, Evaluator, Law, Point3, Role, SetupError, Tensor3, Value, ValueShape, Vector3,
    };

    // Evaluators
    pub use condif_eval::{Constant, ManufacturedSource, ScalarFn, ScalarLaw, TensorFn, VectorFn};

    // Mesh
    pub use condif_mesh::{EntitySelector, Selection};

    // Model
    pub use condif_model::{
        AdvectionDefinition, BcDefinition, BcType, DefaultBc, EquationOption, PropertyDefinition,
        PropertyKind, SetupWarning, SourceDefinition,
    };

    // Domain
    pub use condif_domain::{
        BoundaryKind, CellCenterAlgo, Domain, DomainBuilder, FinalizeError, PredefinedEquation,
        TimeStepDefinition, TimeStepPolicy,
    };
}
