//! The mesh-side collaborator that turns selections into entity ids.

use condif_core::EntityKind;

/// Resolves location selections against an actual mesh.
///
/// The setup layer never reads mesh data itself. A solver driver that has
/// loaded a mesh implements this trait so that overlap checks can compare
/// concrete entity sets instead of relying on static rules.
pub trait EntitySelector {
    /// Number of entities of `kind` in the mesh. Valid ids are `0..count`.
    fn entity_count(&self, kind: EntityKind) -> usize;

    /// Ids of the entities of `kind` matching `criteria`.
    ///
    /// Returns a human-readable reason if the expression cannot be evaluated.
    fn select(&self, kind: EntityKind, criteria: &str) -> Result<Vec<u32>, String>;
}
