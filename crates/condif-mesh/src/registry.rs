//! Registry of named mesh locations.

use indexmap::IndexMap;

use condif_core::{EntityClass, EntityKind, LocationId, SetupError};

use crate::location::{MeshLocation, Selection};

/// Name of the predefined all-cells location.
pub const CELLS: &str = "cells";
/// Name of the predefined all-interior-faces location.
pub const INTERIOR_FACES: &str = "interior_faces";
/// Name of the predefined all-boundary-faces location.
pub const BOUNDARY_FACES: &str = "boundary_faces";
/// Name of the predefined all-vertices location.
pub const VERTICES: &str = "vertices";

const PREDEFINED: [(&str, EntityKind); 4] = [
    (CELLS, EntityKind::Cell),
    (INTERIOR_FACES, EntityKind::InteriorFace),
    (BOUNDARY_FACES, EntityKind::BoundaryFace),
    (VERTICES, EntityKind::Vertex),
];

/// Named mesh locations in declaration order.
///
/// `LocationId(n)` is the n-th location; the predefined whole-kind
/// locations occupy ids 0 to 3. Locations cannot be removed or changed
/// once added.
#[derive(Clone, Debug)]
pub struct LocationRegistry {
    locations: IndexMap<String, MeshLocation>,
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationRegistry {
    /// A registry holding only the predefined locations.
    pub fn new() -> Self {
        let mut locations = IndexMap::with_capacity(PREDEFINED.len());
        for (i, (name, kind)) in PREDEFINED.iter().enumerate() {
            locations.insert(
                name.to_string(),
                MeshLocation {
                    id: LocationId(i as u32),
                    name: name.to_string(),
                    kind: *kind,
                    selection: Selection::All,
                },
            );
        }
        Self { locations }
    }

    /// Register a new location.
    ///
    /// Fails with `DuplicateName` if `name` is taken. A remainder selection
    /// may only exclude existing locations of the same kind, and a criteria
    /// expression must be non-empty.
    pub fn add(
        &mut self,
        name: &str,
        kind: EntityKind,
        selection: Selection,
    ) -> Result<LocationId, SetupError> {
        if self.locations.contains_key(name) {
            return Err(SetupError::DuplicateName {
                class: EntityClass::MeshLocation,
                name: name.to_string(),
            });
        }
        match &selection {
            Selection::Criteria(c) if c.trim().is_empty() => {
                return Err(SetupError::InvalidOption {
                    key: "selection".to_string(),
                    value: c.clone(),
                    reason: format!("location '{name}' has an empty selection expression"),
                });
            }
            Selection::Remainder { excluded } => {
                for &ex in excluded {
                    let other = self.get(ex).ok_or_else(|| SetupError::NotFound {
                        class: EntityClass::MeshLocation,
                        name: format!("#{ex}"),
                    })?;
                    if other.kind != kind {
                        return Err(SetupError::EntityKindMismatch {
                            location: other.name.clone(),
                            expected: kind,
                            found: other.kind,
                        });
                    }
                }
            }
            _ => {}
        }

        let id = u32::try_from(self.locations.len())
            .map(LocationId)
            .map_err(|_| SetupError::InvalidOption {
                key: "location".to_string(),
                value: name.to_string(),
                reason: "location count exceeds u32::MAX".to_string(),
            })?;
        log::debug!("registered mesh location '{name}' ({kind}, {selection})");
        self.locations.insert(
            name.to_string(),
            MeshLocation {
                id,
                name: name.to_string(),
                kind,
                selection,
            },
        );
        Ok(id)
    }

    /// Look a location up by name.
    pub fn resolve(&self, name: &str) -> Result<&MeshLocation, SetupError> {
        self.locations
            .get(name)
            .ok_or_else(|| SetupError::NotFound {
                class: EntityClass::MeshLocation,
                name: name.to_string(),
            })
    }

    /// Look a location up by name and require a given entity kind.
    pub fn resolve_kind(
        &self,
        name: &str,
        expected: EntityKind,
    ) -> Result<&MeshLocation, SetupError> {
        let loc = self.resolve(name)?;
        if loc.kind != expected {
            return Err(SetupError::EntityKindMismatch {
                location: name.to_string(),
                expected,
                found: loc.kind,
            });
        }
        Ok(loc)
    }

    /// Look a location up by id.
    pub fn get(&self, id: LocationId) -> Option<&MeshLocation> {
        self.locations
            .get_index(id.0 as usize)
            .map(|(_, loc)| loc)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    /// Number of locations, predefined ones included.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false: the predefined locations are never absent.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MeshLocation> {
        self.locations.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn predefined_locations_exist() {
        let reg = LocationRegistry::new();
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.resolve(CELLS).unwrap().id(), LocationId(0));
        let faces = reg.resolve(BOUNDARY_FACES).unwrap();
        assert_eq!(faces.kind(), EntityKind::BoundaryFace);
        assert!(faces.is_whole_kind());
    }

    #[test]
    fn add_assigns_sequential_ids() {
        let mut reg = LocationRegistry::new();
        let a = reg
            .add("inlet", EntityKind::BoundaryFace, Selection::Criteria("x < 1e-3".into()))
            .unwrap();
        let b = reg
            .add("core", EntityKind::Cell, Selection::Ids(vec![1, 2, 3]))
            .unwrap();
        assert_eq!(a, LocationId(4));
        assert_eq!(b, LocationId(5));
        assert_eq!(reg.get(b).unwrap().name(), "core");
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = LocationRegistry::new();
        let err = reg
            .add("cells", EntityKind::Cell, Selection::All)
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::DuplicateName { class: EntityClass::MeshLocation, .. }
        ));
    }

    #[test]
    fn unknown_name_not_found() {
        let reg = LocationRegistry::new();
        match reg.resolve("outlet") {
            Err(SetupError::NotFound { name, .. }) => assert_eq!(name, "outlet"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn resolve_kind_checks_entity_kind() {
        let reg = LocationRegistry::new();
        assert!(reg.resolve_kind(CELLS, EntityKind::Cell).is_ok());
        assert!(matches!(
            reg.resolve_kind(CELLS, EntityKind::BoundaryFace),
            Err(SetupError::EntityKindMismatch { .. })
        ));
    }

    #[test]
    fn remainder_must_exclude_same_kind() {
        let mut reg = LocationRegistry::new();
        let wall = reg
            .add("wall", EntityKind::BoundaryFace, Selection::Criteria("y > 0.9".into()))
            .unwrap();
        assert!(reg
            .add(
                "rest",
                EntityKind::BoundaryFace,
                Selection::Remainder { excluded: vec![wall] },
            )
            .is_ok());
        assert!(matches!(
            reg.add(
                "bad",
                EntityKind::Cell,
                Selection::Remainder { excluded: vec![wall] },
            ),
            Err(SetupError::EntityKindMismatch { .. })
        ));
        assert!(matches!(
            reg.add(
                "dangling",
                EntityKind::Cell,
                Selection::Remainder { excluded: vec![LocationId(99)] },
            ),
            Err(SetupError::NotFound { .. })
        ));
    }

    #[test]
    fn empty_criteria_rejected() {
        let mut reg = LocationRegistry::new();
        assert!(matches!(
            reg.add("blank", EntityKind::Vertex, Selection::Criteria("  ".into())),
            Err(SetupError::InvalidOption { .. })
        ));
        assert!(!reg.contains("blank"));
    }

    proptest! {
        #[test]
        fn added_names_resolve_to_their_ids(names in prop::collection::hash_set("[a-z]{3,8}", 1..12)) {
            let mut reg = LocationRegistry::new();
            let mut ids = Vec::new();
            for name in &names {
                if reg.contains(name) {
                    continue;
                }
                ids.push((name.clone(), reg.add(name, EntityKind::Cell, Selection::All).unwrap()));
            }
            for (name, id) in ids {
                let loc = reg.resolve(&name).unwrap();
                prop_assert_eq!(loc.id(), id);
                prop_assert_eq!(reg.get(id).unwrap().name(), name.as_str());
            }
        }
    }
}
