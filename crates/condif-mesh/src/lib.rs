//! Named mesh locations for the condif setup layer.
//!
//! A [`MeshLocation`] names a subset of one [`EntityKind`](condif_core::EntityKind)
//! of mesh entities. Locations are registered in a [`LocationRegistry`],
//! which always holds the four whole-kind locations `cells`,
//! `interior_faces`, `boundary_faces` and `vertices`.
//!
//! No entity set is evaluated here. Criteria strings are resolved only when
//! an [`EntitySelector`] backed by the actual mesh is supplied, as done by
//! [`SelectionCache`] for exact overlap checks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod location;
pub mod overlap;
pub mod registry;
pub mod selector;

pub use location::{MeshLocation, Selection};
pub use overlap::{overlaps_static, SelectionCache};
pub use registry::LocationRegistry;
pub use selector::EntitySelector;
