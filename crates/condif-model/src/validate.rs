//! Finalization checks over the property, advection and equation
//! registries.
//!
//! [`check_model`] never stops at the first problem: it walks every
//! equation and reports all violations together, so a configuration can be
//! fixed in one pass.

use indexmap::IndexSet;

use condif_core::{AdvectionId, EntityClass, PropertyId, Role, SetupError};

use crate::advection::AdvectionRegistry;
use crate::equation::Equation;
use crate::options::{HodgeParams, OptionKey, SolverFamily};
use crate::property::PropertyRegistry;
use crate::registry::EquationRegistry;
use crate::warning::SetupWarning;

/// Outcome of [`check_model`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelCheck {
    /// Errors that must abort setup.
    pub violations: Vec<SetupError>,
    /// Non-fatal findings, already logged.
    pub warnings: Vec<SetupWarning>,
}

impl ModelCheck {
    fn warn(&mut self, warning: SetupWarning) {
        warning.log();
        self.warnings.push(warning);
    }
}

/// Check every cross-registry invariant.
///
/// - each linked time or diffusion property, advection field and
///   reaction-term property has a definition (`UnlinkedRole` otherwise);
/// - each label addressed by a per-term option names an existing term;
/// - preconditioners restricted to PETSc are used with that family.
pub fn check_model(
    properties: &PropertyRegistry,
    advection: &AdvectionRegistry,
    equations: &EquationRegistry,
) -> ModelCheck {
    let mut check = ModelCheck::default();
    let mut linked_properties: IndexSet<PropertyId> = IndexSet::new();
    let mut linked_fields: IndexSet<AdvectionId> = IndexSet::new();

    for eq in equations.iter() {
        let links = eq.links();
        for (role, link) in [(Role::Time, &links.time), (Role::Diffusion, &links.diffusion)] {
            if let Some(link) = link {
                linked_properties.insert(link.id);
                let defined = properties.by_id(link.id).is_some_and(|p| p.is_defined());
                if !defined {
                    check.violations.push(SetupError::UnlinkedRole {
                        equation: eq.name().to_string(),
                        role,
                        target: link.name.clone(),
                    });
                }
            }
        }
        if let Some(link) = &links.advection {
            linked_fields.insert(link.id);
            let defined = advection.by_id(link.id).is_some_and(|a| a.is_defined());
            if !defined {
                check.violations.push(SetupError::UnlinkedRole {
                    equation: eq.name().to_string(),
                    role: Role::Advection,
                    target: link.name.clone(),
                });
            }
        }
        for term in eq.reaction_terms() {
            linked_properties.insert(term.property);
            let defined = properties.by_id(term.property).is_some_and(|p| p.is_defined());
            if !defined {
                check.violations.push(SetupError::UnlinkedRole {
                    equation: eq.name().to_string(),
                    role: Role::Reaction,
                    target: term.property_name.clone(),
                });
            }
        }

        check_labels(eq, &mut check);
        check_numerics(eq, &mut check);
    }

    for prop in properties.iter() {
        if !prop.is_defined() && !linked_properties.contains(&prop.id()) {
            check.warn(SetupWarning::UnusedUndefined {
                class: EntityClass::Property,
                name: prop.name().to_string(),
            });
        }
    }
    for field in advection.iter() {
        if !field.is_defined() && !linked_fields.contains(&field.id()) {
            check.warn(SetupWarning::UnusedUndefined {
                class: EntityClass::AdvectionField,
                name: field.name().to_string(),
            });
        }
    }
    check
}

fn check_labels(eq: &Equation, check: &mut ModelCheck) {
    for label in eq.referenced_source_labels() {
        if eq.source_term(label).is_none() {
            check.violations.push(SetupError::NotFound {
                class: EntityClass::SourceTerm,
                name: format!("{}/{label}", eq.name()),
            });
        }
    }
    for label in eq.referenced_reaction_labels() {
        if eq.reaction_term(label).is_none() {
            check.violations.push(SetupError::NotFound {
                class: EntityClass::ReactionTerm,
                name: format!("{}/{label}", eq.name()),
            });
        }
    }
}

fn check_numerics(eq: &Equation, check: &mut ModelCheck) {
    let params = eq.params();
    if params.solver.precond.requires_petsc() && params.solver.family != SolverFamily::Petsc {
        check.violations.push(SetupError::InvalidOption {
            key: OptionKey::Precond.as_str().to_string(),
            value: params.solver.precond.to_string(),
            reason: format!(
                "equation '{}' uses the {} solver family; this preconditioner requires petsc",
                eq.name(),
                params.solver.family
            ),
        });
    }

    let hodges: [(String, &HodgeParams); 2] = [
        (OptionKey::HodgeDiffCoef.as_str().to_string(), &params.hodge_diffusion),
        (OptionKey::HodgeTimeCoef.as_str().to_string(), &params.hodge_time),
    ];
    let reaction_hodges = eq.reaction_terms().iter().map(|t| {
        let label = t.label.as_deref().unwrap_or("<unlabelled>");
        (format!("hodge_coef of reaction term '{label}'"), &t.hodge)
    });
    for (key, hodge) in hodges.into_iter().chain(reaction_hodges) {
        if hodge.has_ineffective_coef() {
            check.warn(SetupWarning::IneffectiveOption {
                equation: eq.name().to_string(),
                key,
                reason: format!("the {} Hodge algorithm ignores the coefficient", hodge.algo),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advection::AdvectionDefinition;
    use crate::equation::DefaultBc;
    use crate::property::{PropertyDefinition, PropertyKind};
    use crate::registry::LinkTarget;
    use condif_core::ValueShape;

    fn registries() -> (PropertyRegistry, AdvectionRegistry, EquationRegistry) {
        let mut props = PropertyRegistry::new();
        props.add("conductivity", PropertyKind::Anisotropic).unwrap();
        props.add("rho.cp", PropertyKind::Isotropic).unwrap();
        let mut adv = AdvectionRegistry::new();
        adv.add("adv_field").unwrap();
        let mut eqs = EquationRegistry::new();
        eqs.add("AdvDiff", "Potential", ValueShape::Scalar, DefaultBc::ZeroValue)
            .unwrap();
        (props, adv, eqs)
    }

    #[test]
    fn undefined_diffusion_property_is_unlinked_role() {
        let (props, adv, mut eqs) = registries();
        eqs.link(
            "AdvDiff",
            Role::Diffusion,
            LinkTarget::Property(props.get("conductivity").unwrap()),
        )
        .unwrap();
        let check = check_model(&props, &adv, &eqs);
        assert_eq!(
            check.violations,
            vec![SetupError::UnlinkedRole {
                equation: "AdvDiff".to_string(),
                role: Role::Diffusion,
                target: "conductivity".to_string(),
            }]
        );
    }

    #[test]
    fn all_violations_are_reported_together() {
        let (props, adv, mut eqs) = registries();
        eqs.link("AdvDiff", Role::Diffusion, LinkTarget::Property(props.get("conductivity").unwrap()))
            .unwrap();
        eqs.link("AdvDiff", Role::Time, LinkTarget::Property(props.get("rho.cp").unwrap()))
            .unwrap();
        eqs.link("AdvDiff", Role::Advection, LinkTarget::Advection(adv.get("adv_field").unwrap()))
            .unwrap();
        let _ = eqs.set_source_term_option("AdvDiff", Some("ghost"), "quadrature", "bary");
        eqs.set_option("AdvDiff", "precond", "ssor").unwrap();
        let check = check_model(&props, &adv, &eqs);
        assert_eq!(check.violations.len(), 5, "{:?}", check.violations);
    }

    #[test]
    fn defined_links_pass() {
        let (mut props, mut adv, mut eqs) = registries();
        props
            .define(
                "conductivity",
                PropertyDefinition::parse_constant(
                    PropertyKind::Anisotropic,
                    "1 .5 0 .5 1 .5 0 .5 1",
                )
                .unwrap(),
            )
            .unwrap();
        adv.define("adv_field", AdvectionDefinition::Constant([1.0, 0.0, 0.0]))
            .unwrap();
        eqs.link("AdvDiff", Role::Diffusion, LinkTarget::Property(props.get("conductivity").unwrap()))
            .unwrap();
        eqs.link("AdvDiff", Role::Advection, LinkTarget::Advection(adv.get("adv_field").unwrap()))
            .unwrap();
        eqs.add_reaction_term("AdvDiff", None, props.get("unity").unwrap())
            .unwrap();
        let check = check_model(&props, &adv, &eqs);
        assert!(check.violations.is_empty(), "{:?}", check.violations);
        // rho.cp is neither defined nor linked.
        assert_eq!(
            check.warnings,
            vec![SetupWarning::UnusedUndefined {
                class: EntityClass::Property,
                name: "rho.cp".to_string(),
            }]
        );
    }

    #[test]
    fn undefined_reaction_property_reported() {
        let (props, adv, mut eqs) = registries();
        eqs.add_reaction_term("AdvDiff", Some("r"), props.get("rho.cp").unwrap())
            .unwrap();
        let check = check_model(&props, &adv, &eqs);
        assert!(check.violations.iter().any(|v| matches!(
            v,
            SetupError::UnlinkedRole { role: Role::Reaction, .. }
        )));
    }

    #[test]
    fn ssor_with_petsc_is_allowed() {
        let (props, adv, mut eqs) = registries();
        eqs.set_option("AdvDiff", "precond", "ssor").unwrap();
        eqs.set_option("AdvDiff", "solver_family", "petsc").unwrap();
        assert!(check_model(&props, &adv, &eqs).violations.is_empty());
    }

    #[test]
    fn ineffective_hodge_coefficient_warns() {
        let (props, adv, mut eqs) = registries();
        eqs.set_option("AdvDiff", "hodge_diff_algo", "voronoi").unwrap();
        eqs.set_option("AdvDiff", "hodge_diff_coef", "sushi").unwrap();
        let check = check_model(&props, &adv, &eqs);
        assert!(check.warnings.iter().any(|w| matches!(
            w,
            SetupWarning::IneffectiveOption { key, .. } if key == "hodge_diff_coef"
        )));
    }
}
