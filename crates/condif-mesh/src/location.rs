//! Named mesh locations and their selections.

use std::fmt;

use condif_core::{EntityKind, LocationId};

/// Which entities of a given kind a location covers.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
    /// Every entity of the kind.
    All,
    /// An opaque selection expression, resolved by the mesh-side
    /// [`EntitySelector`](crate::EntitySelector).
    Criteria(String),
    /// Explicit entity ids.
    Ids(Vec<u32>),
    /// Every entity of the kind not covered by the listed locations.
    Remainder {
        /// Locations whose entities are left out.
        excluded: Vec<LocationId>,
    },
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Criteria(c) => write!(f, "criteria \"{c}\""),
            Self::Ids(ids) => write!(f, "{} explicit ids", ids.len()),
            Self::Remainder { excluded } => {
                write!(f, "remainder excluding {} locations", excluded.len())
            }
        }
    }
}

/// A named, immutable subset of mesh entities.
///
/// Constructed only by [`LocationRegistry::add`](crate::LocationRegistry::add).
#[derive(Clone, Debug, PartialEq)]
pub struct MeshLocation {
    pub(crate) id: LocationId,
    pub(crate) name: String,
    pub(crate) kind: EntityKind,
    pub(crate) selection: Selection,
}

impl MeshLocation {
    /// Registry id.
    pub fn id(&self) -> LocationId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of entity selected.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The selection rule.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether this location covers every entity of its kind.
    pub fn is_whole_kind(&self) -> bool {
        matches!(self.selection, Selection::All)
    }
}
