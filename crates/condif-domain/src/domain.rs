//! The frozen result of setup.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;

use condif_core::SetupError;
use condif_mesh::LocationRegistry;
use condif_model::{AdvectionRegistry, EquationRegistry, PropertyRegistry, SetupWarning};

use crate::boundary::BoundaryClassification;
use crate::geometry::CellCenterAlgo;
use crate::predefined::PredefinedEquation;
use crate::time_step::TimeStepPolicy;

/// Every violation found by [`DomainBuilder::finalize`](crate::DomainBuilder::finalize).
#[derive(Clone, Debug, PartialEq)]
pub struct FinalizeError {
    /// Violations in discovery order. Never empty.
    pub violations: Vec<SetupError>,
}

impl fmt::Display for FinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain setup failed with {} violation(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

impl Error for FinalizeError {}

/// A validated, read-only problem setup.
///
/// Produced once by the builder and handed to the solver core. Nothing
/// here can be changed after construction, so a `Domain` can be shared
/// across solver threads.
#[derive(Debug)]
pub struct Domain {
    pub(crate) locations: LocationRegistry,
    pub(crate) properties: PropertyRegistry,
    pub(crate) advection: AdvectionRegistry,
    pub(crate) equations: EquationRegistry,
    pub(crate) boundaries: BoundaryClassification,
    pub(crate) time_step: Option<TimeStepPolicy>,
    pub(crate) cell_center: CellCenterAlgo,
    pub(crate) predefined: IndexSet<PredefinedEquation>,
    pub(crate) warnings: Vec<SetupWarning>,
}

impl Domain {
    /// Mesh locations.
    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Material properties.
    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    /// Advection fields.
    pub fn advection_fields(&self) -> &AdvectionRegistry {
        &self.advection
    }

    /// Equations, each with its terms, links and numerics.
    pub fn equations(&self) -> &EquationRegistry {
        &self.equations
    }

    /// Boundary classification.
    pub fn boundaries(&self) -> &BoundaryClassification {
        &self.boundaries
    }

    /// Time-step policy, absent for a steady setup.
    pub fn time_step(&self) -> Option<&TimeStepPolicy> {
        self.time_step.as_ref()
    }

    /// Cell center algorithm.
    pub fn cell_center_algo(&self) -> CellCenterAlgo {
        self.cell_center
    }

    /// Whether a predefined equation was activated.
    pub fn is_active(&self, tag: PredefinedEquation) -> bool {
        self.predefined.contains(&tag)
    }

    /// Every warning raised during setup, in order.
    pub fn warnings(&self) -> &[SetupWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Domain>();
    }

    #[test]
    fn display_lists_every_violation() {
        let err = FinalizeError {
            violations: vec![
                SetupError::NotFound {
                    class: condif_core::EntityClass::Property,
                    name: "a".into(),
                },
                SetupError::NotFound {
                    class: condif_core::EntityClass::Property,
                    name: "b".into(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("domain setup failed with 2 violation(s)"));
        assert_eq!(text.lines().count(), 3);
    }
}
