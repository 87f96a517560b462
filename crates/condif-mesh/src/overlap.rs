//! Overlap detection between mesh locations.
//!
//! Two checks are offered. [`overlaps_static`] decides from the selection
//! rules alone and compares criteria expressions as text. [`SelectionCache`]
//! resolves every location through an [`EntitySelector`] and intersects the
//! concrete id sets.

use indexmap::IndexMap;

use condif_core::{EntityClass, LocationId, SetupError};

use crate::location::{MeshLocation, Selection};
use crate::registry::LocationRegistry;
use crate::selector::EntitySelector;

fn sorted_intersect(a: &[u32], b: &[u32]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

fn normalized(mut ids: Vec<u32>) -> Vec<u32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Whether two locations may cover a common entity, judged from their
/// selection rules only.
///
/// Locations of different kinds never overlap. Otherwise they overlap when
/// they are the same location, when either covers its whole kind, when
/// their explicit id lists intersect, or when one is a remainder that does
/// not exclude the other. Two criteria locations overlap when their
/// expressions are equal up to surrounding whitespace. Any other pairing
/// involving a criteria expression is assumed disjoint.
pub fn overlaps_static(a: &MeshLocation, b: &MeshLocation) -> bool {
    if a.kind() != b.kind() {
        return false;
    }
    if a.id() == b.id() {
        return true;
    }
    match (a.selection(), b.selection()) {
        (Selection::Ids(x), _) | (_, Selection::Ids(x)) if x.is_empty() => false,
        (Selection::All, _) | (_, Selection::All) => true,
        (Selection::Remainder { excluded }, _) => !excluded.contains(&b.id()),
        (_, Selection::Remainder { excluded }) => !excluded.contains(&a.id()),
        (Selection::Ids(x), Selection::Ids(y)) => {
            sorted_intersect(&normalized(x.clone()), &normalized(y.clone()))
        }
        (Selection::Criteria(x), Selection::Criteria(y)) => x.trim() == y.trim(),
        _ => false,
    }
}

/// Resolves locations to sorted entity ids through an [`EntitySelector`],
/// caching each location's ids.
pub struct SelectionCache<'a> {
    registry: &'a LocationRegistry,
    selector: &'a dyn EntitySelector,
    resolved: IndexMap<LocationId, Vec<u32>>,
}

impl<'a> SelectionCache<'a> {
    /// An empty cache over `registry`.
    pub fn new(registry: &'a LocationRegistry, selector: &'a dyn EntitySelector) -> Self {
        Self {
            registry,
            selector,
            resolved: IndexMap::new(),
        }
    }

    /// Sorted, de-duplicated entity ids covered by `id`.
    ///
    /// Fails with `SelectionFailed` when the selector rejects a criteria
    /// expression or an explicit id lies outside the mesh.
    pub fn ids(&mut self, id: LocationId) -> Result<&[u32], SetupError> {
        if !self.resolved.contains_key(&id) {
            let ids = self.compute(id)?;
            self.resolved.insert(id, ids);
        }
        Ok(self.resolved.get(&id).map(Vec::as_slice).unwrap_or_default())
    }

    /// Whether two locations share at least one entity.
    pub fn overlaps(&mut self, a: LocationId, b: LocationId) -> Result<bool, SetupError> {
        let kinds = (
            self.location(a)?.kind(),
            self.location(b)?.kind(),
        );
        if kinds.0 != kinds.1 {
            return Ok(false);
        }
        let first = self.ids(a)?.to_vec();
        Ok(sorted_intersect(&first, self.ids(b)?))
    }

    fn location(&self, id: LocationId) -> Result<&'a MeshLocation, SetupError> {
        self.registry.get(id).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::MeshLocation,
            name: format!("#{id}"),
        })
    }

    fn compute(&mut self, id: LocationId) -> Result<Vec<u32>, SetupError> {
        let loc = self.location(id)?;
        let count = self.selector.entity_count(loc.kind());
        let failed = |reason: String| SetupError::SelectionFailed {
            location: loc.name().to_string(),
            reason,
        };
        let ids = match loc.selection() {
            Selection::All => (0..count as u32).collect(),
            Selection::Criteria(criteria) => normalized(
                self.selector
                    .select(loc.kind(), criteria)
                    .map_err(failed)?,
            ),
            Selection::Ids(ids) => normalized(ids.clone()),
            Selection::Remainder { excluded } => {
                // Excluded locations always have smaller ids, so this
                // recursion terminates.
                let mut taken = Vec::new();
                for &ex in excluded {
                    taken.extend_from_slice(self.ids(ex)?);
                }
                let taken = normalized(taken);
                (0..count as u32)
                    .filter(|e| taken.binary_search(e).is_err())
                    .collect()
            }
        };
        if let Some(&bad) = ids.iter().find(|&&e| e as usize >= count) {
            return Err(SetupError::SelectionFailed {
                location: loc.name().to_string(),
                reason: format!("entity {bad} out of range (mesh has {count} {} entities)", loc.kind()),
            });
        }
        Ok(ids)
    }
}
