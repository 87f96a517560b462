//! Test utilities and mock types for condif development.
//!
//! Provides a mock [`EntitySelector`] backed by explicit id tables and the
//! reference advection-diffusion setup in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use condif_core::EntityKind;
use condif_mesh::EntitySelector;

/// Mock implementation of [`EntitySelector`].
///
/// Entity counts default to zero. Criteria expressions are looked up
/// verbatim; register them with [`set_criteria`](MockSelector::set_criteria)
/// before passing the selector to code under test. Unknown expressions
/// fail.
#[derive(Debug, Default)]
pub struct MockSelector {
    counts: HashMap<EntityKind, usize>,
    criteria: HashMap<(EntityKind, String), Vec<u32>>,
}

impl MockSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mesh with the given number of cells and boundary faces.
    pub fn with_counts(cells: usize, boundary_faces: usize) -> Self {
        let mut s = Self::new();
        s.set_count(EntityKind::Cell, cells);
        s.set_count(EntityKind::BoundaryFace, boundary_faces);
        s
    }

    /// Set the number of entities of `kind`.
    pub fn set_count(&mut self, kind: EntityKind, count: usize) {
        self.counts.insert(kind, count);
    }

    /// Make `expr` select `ids` among entities of `kind`.
    pub fn set_criteria(&mut self, kind: EntityKind, expr: &str, ids: Vec<u32>) {
        self.criteria.insert((kind, expr.to_string()), ids);
    }
}

impl EntitySelector for MockSelector {
    fn entity_count(&self, kind: EntityKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    fn select(&self, kind: EntityKind, criteria: &str) -> Result<Vec<u32>, String> {
        self.criteria
            .get(&(kind, criteria.to_string()))
            .cloned()
            .ok_or_else(|| format!("no mock selection for '{criteria}' on {kind}"))
    }
}
