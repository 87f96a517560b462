//! The equation registry and term linker.
//!
//! Every mutation is validated when it is made: unknown names and labels,
//! shape mismatches, wrong location kinds and out-of-range options fail
//! immediately. Checks that depend on the final state of other registries,
//! such as whether a linked property was ever defined, run later in
//! [`validate`](crate::validate).

use indexmap::IndexMap;

use condif_core::{EntityClass, EntityKind, EquationId, Role, SetupError, ValueShape};
use condif_mesh::MeshLocation;

use crate::advection::AdvectionField;
use crate::equation::{
    BcDefinition, BcType, BoundaryCondition, DefaultBc, Equation, Link, ReactionTerm,
    ReactionTermOption, SourceDefinition, SourceTerm, SourceTermOption,
};
use crate::options::{EquationOption, HodgeParams, OptionKey, Quadrature};
use crate::property::Property;
use crate::warning::SetupWarning;

/// What a role is linked to.
#[derive(Clone, Copy, Debug)]
pub enum LinkTarget<'a> {
    /// A property, for the time and diffusion roles.
    Property(&'a Property),
    /// An advection field, for the advection role.
    Advection(&'a AdvectionField),
}

impl LinkTarget<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Property(p) => p.name(),
            Self::Advection(a) => a.name(),
        }
    }
}

fn require_kind(location: &MeshLocation, expected: EntityKind) -> Result<(), SetupError> {
    if location.kind() != expected {
        return Err(SetupError::EntityKindMismatch {
            location: location.name().to_string(),
            expected,
            found: location.kind(),
        });
    }
    Ok(())
}

/// Equations in declaration order.
#[derive(Clone, Debug, Default)]
pub struct EquationRegistry {
    equations: IndexMap<String, Equation>,
    warnings: Vec<SetupWarning>,
}

impl EquationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an equation with default numerics and no terms.
    pub fn add(
        &mut self,
        name: &str,
        field_name: &str,
        shape: ValueShape,
        default_bc: DefaultBc,
    ) -> Result<EquationId, SetupError> {
        if self.equations.contains_key(name) {
            return Err(SetupError::DuplicateName {
                class: EntityClass::Equation,
                name: name.to_string(),
            });
        }
        if field_name.trim().is_empty() {
            return Err(SetupError::InvalidOption {
                key: "field_name".to_string(),
                value: field_name.to_string(),
                reason: format!("equation '{name}' needs a field name"),
            });
        }
        let id = EquationId(self.equations.len() as u32);
        self.equations.insert(
            name.to_string(),
            Equation::new(id, name, field_name, shape, default_bc),
        );
        log::debug!("registered {shape} equation '{name}' on field '{field_name}'");
        Ok(id)
    }

    /// Look an equation up by name.
    pub fn get(&self, name: &str) -> Result<&Equation, SetupError> {
        self.equations.get(name).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::Equation,
            name: name.to_string(),
        })
    }

    /// Look an equation up by id.
    pub fn by_id(&self, id: EquationId) -> Option<&Equation> {
        self.equations.get_index(id.0 as usize).map(|(_, e)| e)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Equation, SetupError> {
        self.equations.get_mut(name).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::Equation,
            name: name.to_string(),
        })
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.equations.contains_key(name)
    }

    /// Number of equations.
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    /// Whether no equation is registered.
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Equations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Equation> {
        self.equations.values()
    }

    /// Warnings recorded so far, in order.
    pub fn warnings(&self) -> &[SetupWarning] {
        &self.warnings
    }

    fn warn(&mut self, warning: SetupWarning) {
        warning.log();
        self.warnings.push(warning);
    }

    // ── Terms ───────────────────────────────────────────────────

    /// Attach a boundary condition on a boundary-face location.
    ///
    /// Dirichlet and Neumann payloads must have the equation's shape. A
    /// Robin payload is the vector `(alpha, u0, g)` and is only accepted on
    /// scalar equations.
    pub fn add_boundary_condition(
        &mut self,
        equation: &str,
        location: &MeshLocation,
        bc_type: BcType,
        definition: BcDefinition,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        require_kind(location, EntityKind::BoundaryFace)?;
        let expected = match bc_type {
            BcType::Dirichlet | BcType::Neumann => eq.shape,
            BcType::Robin if eq.shape == ValueShape::Scalar => ValueShape::Vector,
            BcType::Robin => {
                return Err(SetupError::ShapeMismatch {
                    entity: format!("robin condition of '{equation}'"),
                    expected: "scalar equation".to_string(),
                    found: format!("{} equation", eq.shape),
                });
            }
        };
        if definition.shape() != expected {
            return Err(SetupError::ShapeMismatch {
                entity: format!("{bc_type} condition of '{equation}' on '{}'", location.name()),
                expected: expected.to_string(),
                found: definition.shape().to_string(),
            });
        }
        if let BcDefinition::Value(v) = &definition {
            if !v.is_finite() {
                return Err(SetupError::InvalidOption {
                    key: "value".to_string(),
                    value: format!("{:?}", v.components()),
                    reason: "boundary values must be finite".to_string(),
                });
            }
        }
        log::debug!(
            "equation '{equation}': {bc_type} condition by {} on '{}'",
            definition.method(),
            location.name()
        );
        eq.boundary_conditions.push(BoundaryCondition {
            location: location.id(),
            location_name: location.name().to_string(),
            bc_type,
            definition,
        });
        Ok(())
    }

    /// Attach a source term on a cell location.
    ///
    /// Labels are optional but unique within the equation.
    pub fn add_source_term(
        &mut self,
        equation: &str,
        label: Option<&str>,
        location: &MeshLocation,
        definition: SourceDefinition,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        require_kind(location, EntityKind::Cell)?;
        if let Some(label) = label {
            if eq.source_term(label).is_some() {
                return Err(SetupError::DuplicateName {
                    class: EntityClass::SourceTerm,
                    name: label.to_string(),
                });
            }
        }
        if let Some(shape) = definition.shape() {
            if shape != eq.shape {
                return Err(SetupError::ShapeMismatch {
                    entity: format!(
                        "source term '{}' of '{equation}'",
                        label.unwrap_or("<unlabelled>")
                    ),
                    expected: eq.shape.to_string(),
                    found: shape.to_string(),
                });
            }
        }
        log::debug!(
            "equation '{equation}': source term '{}' by {} on '{}'",
            label.unwrap_or("<unlabelled>"),
            definition.method(),
            location.name()
        );
        eq.source_terms.push(SourceTerm {
            label: label.map(str::to_string),
            location: location.id(),
            location_name: location.name().to_string(),
            definition,
            quadrature: Quadrature::default(),
            post_freq: -1,
        });
        Ok(())
    }

    /// Set a per-source-term option from `(key, value)` strings.
    ///
    /// `None` as label applies the option to every source term of the
    /// equation.
    pub fn set_source_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<(), SetupError> {
        let opt = SourceTermOption::parse(key, value)?;
        self.apply_source_term_option(equation, label, opt)
    }

    /// Set a typed per-source-term option. Later settings replace earlier
    /// ones.
    pub fn apply_source_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        opt: SourceTermOption,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        match label {
            Some(label) => {
                eq.source_labels_used.insert(label.to_string());
                let term = eq
                    .source_terms
                    .iter_mut()
                    .find(|t| t.label.as_deref() == Some(label))
                    .ok_or_else(|| SetupError::NotFound {
                        class: EntityClass::SourceTerm,
                        name: label.to_string(),
                    })?;
                opt.apply(term)
            }
            None if eq.source_terms.is_empty() => {
                let warning = SetupWarning::IneffectiveOption {
                    equation: equation.to_string(),
                    key: source_option_key(&opt).to_string(),
                    reason: "the equation has no source terms".to_string(),
                };
                self.warn(warning);
                Ok(())
            }
            None => {
                for term in eq.source_terms.iter_mut() {
                    opt.apply(term)?;
                }
                Ok(())
            }
        }
    }

    /// Attach a reaction term `σ·u` with coefficient `property`.
    pub fn add_reaction_term(
        &mut self,
        equation: &str,
        label: Option<&str>,
        property: &Property,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        if let Some(label) = label {
            if eq.reaction_term(label).is_some() {
                return Err(SetupError::DuplicateName {
                    class: EntityClass::ReactionTerm,
                    name: label.to_string(),
                });
            }
        }
        log::debug!(
            "equation '{equation}': reaction term '{}' with property '{}'",
            label.unwrap_or("<unlabelled>"),
            property.name()
        );
        eq.reaction_terms.push(ReactionTerm {
            label: label.map(str::to_string),
            property: property.id(),
            property_name: property.name().to_string(),
            hodge: HodgeParams::MASS,
            lumping: false,
            invert_property: false,
        });
        Ok(())
    }

    /// Set a per-reaction-term option from `(key, value)` strings.
    ///
    /// `None` as label applies the option to every reaction term.
    pub fn set_reaction_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        key: &str,
        value: &str,
    ) -> Result<(), SetupError> {
        let opt = ReactionTermOption::parse(key, value)?;
        self.apply_reaction_term_option(equation, label, opt)
    }

    /// Set a typed per-reaction-term option.
    pub fn apply_reaction_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        opt: ReactionTermOption,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        match label {
            Some(label) => {
                eq.reaction_labels_used.insert(label.to_string());
                let term = eq
                    .reaction_terms
                    .iter_mut()
                    .find(|t| t.label.as_deref() == Some(label))
                    .ok_or_else(|| SetupError::NotFound {
                        class: EntityClass::ReactionTerm,
                        name: label.to_string(),
                    })?;
                opt.apply(term)
            }
            None if eq.reaction_terms.is_empty() => {
                let warning = SetupWarning::IneffectiveOption {
                    equation: equation.to_string(),
                    key: reaction_option_key(&opt).to_string(),
                    reason: "the equation has no reaction terms".to_string(),
                };
                self.warn(warning);
                Ok(())
            }
            None => {
                for term in eq.reaction_terms.iter_mut() {
                    opt.apply(term)?;
                }
                Ok(())
            }
        }
    }

    // ── Linking ─────────────────────────────────────────────────

    /// Link a role of `equation` to a property or advection field.
    ///
    /// The time and diffusion roles take a property, the advection role an
    /// advection field. Reaction terms are attached with
    /// [`add_reaction_term`](Self::add_reaction_term) instead. Linking a
    /// role again replaces its target and records a
    /// [`SetupWarning::Relinked`].
    pub fn link(
        &mut self,
        equation: &str,
        role: Role,
        target: LinkTarget<'_>,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        let previous = match (role, target) {
            (Role::Reaction, _) => {
                return Err(SetupError::InvalidOption {
                    key: "role".to_string(),
                    value: role.to_string(),
                    reason: "reaction terms are added with add_reaction_term".to_string(),
                });
            }
            (Role::Time, LinkTarget::Property(p)) => eq
                .links
                .time
                .replace(Link { id: p.id(), name: p.name().to_string() })
                .map(|l| l.name),
            (Role::Diffusion, LinkTarget::Property(p)) => eq
                .links
                .diffusion
                .replace(Link { id: p.id(), name: p.name().to_string() })
                .map(|l| l.name),
            (Role::Advection, LinkTarget::Advection(a)) => eq
                .links
                .advection
                .replace(Link { id: a.id(), name: a.name().to_string() })
                .map(|l| l.name),
            (_, target) => {
                return Err(SetupError::RoleTargetMismatch {
                    equation: equation.to_string(),
                    role,
                    target: target.name().to_string(),
                });
            }
        };
        log::debug!("equation '{equation}': {role} term linked to '{}'", target.name());
        if let Some(previous) = previous {
            self.warn(SetupWarning::Relinked {
                equation: equation.to_string(),
                role,
                previous,
                current: target.name().to_string(),
            });
        }
        Ok(())
    }

    // ── Numerics ────────────────────────────────────────────────

    /// Set an equation option from `(key, value)` strings.
    pub fn set_option(&mut self, equation: &str, key: &str, value: &str) -> Result<(), SetupError> {
        let key: OptionKey = key.parse()?;
        let opt = EquationOption::parse(key, value)?;
        self.set_equation_option(equation, opt)
    }

    /// Set a typed equation option.
    pub fn set_equation_option(
        &mut self,
        equation: &str,
        opt: EquationOption,
    ) -> Result<(), SetupError> {
        let eq = self.get_mut(equation)?;
        let warning = eq.params.apply(equation, opt)?;
        log::debug!("equation '{equation}': option {} set", opt.key());
        if let Some(w) = warning {
            self.warn(w);
        }
        Ok(())
    }
}

fn source_option_key(opt: &SourceTermOption) -> &'static str {
    match opt {
        SourceTermOption::Post(_) => "post",
        SourceTermOption::Quadrature(_) => "quadrature",
    }
}

fn reaction_option_key(opt: &ReactionTermOption) -> &'static str {
    match opt {
        ReactionTermOption::HodgeAlgo(_) => "hodge_algo",
        ReactionTermOption::HodgeCoef(_) => "hodge_coef",
        ReactionTermOption::Lumping(_) => "lumping",
        ReactionTermOption::InvertProperty(_) => "inv_pty",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advection::AdvectionRegistry;
    use crate::options::TimeScheme;
    use crate::property::{PropertyKind, PropertyRegistry};
    use condif_core::Value;
    use condif_eval::{Constant, ScalarFn};
    use condif_mesh::{LocationRegistry, Selection};
    use std::sync::Arc;

    struct Fixture {
        locations: LocationRegistry,
        properties: PropertyRegistry,
        advection: AdvectionRegistry,
        equations: EquationRegistry,
    }

    fn fixture() -> Fixture {
        let mut properties = PropertyRegistry::new();
        properties.add("propA", PropertyKind::Isotropic).unwrap();
        properties.add("propB", PropertyKind::Isotropic).unwrap();
        let mut advection = AdvectionRegistry::new();
        advection.add("adv_field").unwrap();
        let mut equations = EquationRegistry::new();
        equations
            .add("AdvDiff", "Potential", ValueShape::Scalar, DefaultBc::ZeroValue)
            .unwrap();
        Fixture {
            locations: LocationRegistry::new(),
            properties,
            advection,
            equations,
        }
    }

    fn unit_source() -> SourceDefinition {
        SourceDefinition::Analytic(Arc::new(Constant(Value::Scalar(1.0))))
    }

    #[test]
    fn relink_keeps_only_latest_target() {
        let mut f = fixture();
        let a = f.properties.get("propA").unwrap();
        let b = f.properties.get("propB").unwrap();
        f.equations
            .link("AdvDiff", Role::Diffusion, LinkTarget::Property(a))
            .unwrap();
        f.equations
            .link("AdvDiff", Role::Diffusion, LinkTarget::Property(b))
            .unwrap();
        let eq = f.equations.get("AdvDiff").unwrap();
        let diffusion = eq.links().diffusion.as_ref().unwrap();
        assert_eq!(diffusion.name, "propB");
        assert_eq!(diffusion.id, b.id());
        assert!(matches!(
            f.equations.warnings(),
            [SetupWarning::Relinked { previous, current, .. }]
                if previous == "propA" && current == "propB"
        ));
    }

    #[test]
    fn link_checks_target_kind() {
        let mut f = fixture();
        let prop = f.properties.get("propA").unwrap();
        let adv = f.advection.get("adv_field").unwrap();
        assert!(matches!(
            f.equations.link("AdvDiff", Role::Advection, LinkTarget::Property(prop)),
            Err(SetupError::RoleTargetMismatch { role: Role::Advection, .. })
        ));
        assert!(matches!(
            f.equations.link("AdvDiff", Role::Time, LinkTarget::Advection(adv)),
            Err(SetupError::RoleTargetMismatch { role: Role::Time, .. })
        ));
        assert!(matches!(
            f.equations.link("AdvDiff", Role::Reaction, LinkTarget::Property(prop)),
            Err(SetupError::InvalidOption { .. })
        ));
        f.equations
            .link("AdvDiff", Role::Advection, LinkTarget::Advection(adv))
            .unwrap();
        assert!(f.equations.warnings().is_empty());
    }

    #[test]
    fn source_quadrature_last_write_wins() {
        let mut f = fixture();
        let cells = f.locations.resolve("cells").unwrap();
        f.equations
            .add_source_term("AdvDiff", Some("SourceTerm"), cells, unit_source())
            .unwrap();
        f.equations
            .set_source_term_option("AdvDiff", Some("SourceTerm"), "quadrature", "bary")
            .unwrap();
        f.equations
            .set_source_term_option("AdvDiff", Some("SourceTerm"), "quadrature", "subdiv")
            .unwrap();
        let eq = f.equations.get("AdvDiff").unwrap();
        assert_eq!(eq.source_terms().len(), 1);
        assert_eq!(
            eq.source_term("SourceTerm").unwrap().quadrature,
            Quadrature::Subdiv
        );
    }

    #[test]
    fn unlabelled_option_broadcasts() {
        let mut f = fixture();
        let cells = f.locations.resolve("cells").unwrap();
        f.equations
            .add_source_term("AdvDiff", Some("a"), cells, unit_source())
            .unwrap();
        f.equations
            .add_source_term("AdvDiff", None, cells, SourceDefinition::User)
            .unwrap();
        f.equations
            .set_source_term_option("AdvDiff", None, "quadrature", "highest")
            .unwrap();
        let eq = f.equations.get("AdvDiff").unwrap();
        assert!(eq
            .source_terms()
            .iter()
            .all(|t| t.quadrature == Quadrature::Highest));
    }

    #[test]
    fn unknown_label_fails_and_is_remembered() {
        let mut f = fixture();
        let err = f
            .equations
            .set_source_term_option("AdvDiff", Some("missing"), "post", "10")
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::NotFound { class: EntityClass::SourceTerm, .. }
        ));
        let eq = f.equations.get("AdvDiff").unwrap();
        assert_eq!(eq.referenced_source_labels().collect::<Vec<_>>(), ["missing"]);
    }

    #[test]
    fn duplicate_source_label_rejected() {
        let mut f = fixture();
        let cells = f.locations.resolve("cells").unwrap();
        f.equations
            .add_source_term("AdvDiff", Some("st"), cells, unit_source())
            .unwrap();
        assert!(matches!(
            f.equations
                .add_source_term("AdvDiff", Some("st"), cells, unit_source()),
            Err(SetupError::DuplicateName { class: EntityClass::SourceTerm, .. })
        ));
    }

    #[test]
    fn source_term_needs_cells_and_matching_shape() {
        let mut f = fixture();
        let faces = f.locations.resolve("boundary_faces").unwrap();
        assert!(matches!(
            f.equations
                .add_source_term("AdvDiff", None, faces, unit_source()),
            Err(SetupError::EntityKindMismatch { .. })
        ));
        let cells = f.locations.resolve("cells").unwrap();
        assert!(matches!(
            f.equations.add_source_term(
                "AdvDiff",
                None,
                cells,
                SourceDefinition::Value(Value::Vector([1.0; 3])),
            ),
            Err(SetupError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn boundary_condition_shapes() {
        let mut f = fixture();
        f.locations
            .add("in", EntityKind::BoundaryFace, Selection::Criteria("x < 1e-5".into()))
            .unwrap();
        let faces = f.locations.resolve("boundary_faces").unwrap();
        let inlet = f.locations.resolve("in").unwrap();
        f.equations
            .add_boundary_condition(
                "AdvDiff",
                faces,
                BcType::Dirichlet,
                BcDefinition::Analytic(ScalarFn::shared(|_, x| 1.0 + x[0])),
            )
            .unwrap();
        f.equations
            .add_boundary_condition(
                "AdvDiff",
                inlet,
                BcType::Robin,
                BcDefinition::Value(Value::Vector([1.0, 0.0, 0.5])),
            )
            .unwrap();
        assert!(matches!(
            f.equations.add_boundary_condition(
                "AdvDiff",
                inlet,
                BcType::Neumann,
                BcDefinition::Value(Value::Vector([1.0, 0.0, 0.5])),
            ),
            Err(SetupError::ShapeMismatch { .. })
        ));
        let cells = f.locations.resolve("cells").unwrap();
        assert!(matches!(
            f.equations.add_boundary_condition(
                "AdvDiff",
                cells,
                BcType::Dirichlet,
                BcDefinition::Value(Value::Scalar(0.0)),
            ),
            Err(SetupError::EntityKindMismatch { .. })
        ));
        assert_eq!(f.equations.get("AdvDiff").unwrap().boundary_conditions().len(), 2);
    }

    #[test]
    fn robin_rejected_on_vector_equation() {
        let mut f = fixture();
        f.equations
            .add("Velocity", "u", ValueShape::Vector, DefaultBc::ZeroValue)
            .unwrap();
        let faces = f.locations.resolve("boundary_faces").unwrap();
        assert!(matches!(
            f.equations.add_boundary_condition(
                "Velocity",
                faces,
                BcType::Robin,
                BcDefinition::Value(Value::Vector([1.0, 0.0, 0.0])),
            ),
            Err(SetupError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn reaction_term_options() {
        let mut f = fixture();
        let a = f.properties.get("propA").unwrap();
        f.equations
            .add_reaction_term("AdvDiff", Some("decay"), a)
            .unwrap();
        f.equations
            .set_reaction_term_option("AdvDiff", Some("decay"), "hodge_algo", "cost")
            .unwrap();
        f.equations
            .set_reaction_term_option("AdvDiff", None, "lumping", "true")
            .unwrap();
        let term = f.equations.get("AdvDiff").unwrap().reaction_term("decay").unwrap();
        assert_eq!(term.hodge.algo, crate::options::HodgeAlgo::Cost);
        assert!(term.lumping);
        assert!(!term.invert_property);
    }

    #[test]
    fn theta_option_bounds() {
        let mut f = fixture();
        assert!(matches!(
            f.equations.set_option("AdvDiff", "time_theta", "1.5"),
            Err(SetupError::InvalidOption { .. })
        ));
        f.equations.set_option("AdvDiff", "time_theta", "0.5").unwrap();
        assert_eq!(
            f.equations.get("AdvDiff").unwrap().params().time_scheme,
            TimeScheme::Theta(0.5)
        );
    }

    #[test]
    fn unknown_equation_not_found() {
        let mut f = fixture();
        assert!(matches!(
            f.equations.set_option("Missing", "verbosity", "1"),
            Err(SetupError::NotFound { class: EntityClass::Equation, .. })
        ));
        assert!(matches!(
            f.equations.add("AdvDiff", "p", ValueShape::Scalar, DefaultBc::ZeroFlux),
            Err(SetupError::DuplicateName { .. })
        ));
    }
}
