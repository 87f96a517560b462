//! Domain-level setup for condif.
//!
//! [`DomainBuilder`] is the single mutable entry point: it owns the mesh
//! location, property, advection and equation registries, the boundary
//! classification, the time-step policy and the predefined equations.
//! [`DomainBuilder::finalize`] validates the whole setup and returns an
//! immutable [`Domain`], or a [`FinalizeError`] listing every violation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod builder;
pub mod domain;
pub mod geometry;
pub mod predefined;
pub mod time_step;

pub use boundary::{BoundaryClassification, BoundaryKind, BoundaryZone};
pub use builder::{DomainBuilder, SetupResult, DEFAULT_BOUNDARY};
pub use domain::{Domain, FinalizeError};
pub use geometry::CellCenterAlgo;
pub use predefined::{PredefinedEquation, WALL_DISTANCE};
pub use time_step::{TimeFunc, TimeStepDefinition, TimeStepPolicy};
