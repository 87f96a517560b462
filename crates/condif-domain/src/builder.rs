//! The mutable setup facade and its single `finalize` step.

use indexmap::IndexSet;

use condif_core::{EntityClass, EntityKind, LocationId, Role, SetupError, Value, ValueShape};
use condif_mesh::{overlaps_static, EntitySelector, LocationRegistry, Selection, SelectionCache};
use condif_model::{
    check_model, AdvectionDefinition, AdvectionField, AdvectionRegistry, BcDefinition, BcType,
    DefaultBc, Equation, EquationOption, EquationRegistry, LinkTarget, Property,
    PropertyDefinition, PropertyKind, PropertyRegistry, ReactionTermOption, SetupWarning,
    SourceDefinition, SourceTermOption, UNITY,
};

use crate::boundary::{BoundaryClassification, BoundaryKind};
use crate::domain::{Domain, FinalizeError};
use crate::geometry::CellCenterAlgo;
use crate::predefined::PredefinedEquation;
use crate::time_step::TimeStepPolicy;

/// Name of the location created at finalization for faces left unclassified.
pub const DEFAULT_BOUNDARY: &str = "default_boundary";

/// Collects the whole problem setup, then freezes it into a [`Domain`].
///
/// Each call validates what it can see immediately and fails with a
/// [`SetupError`]. Checks spanning several registries run in
/// [`finalize`](Self::finalize), which reports every violation at once.
///
/// # Examples
///
/// ```
/// use condif_core::{Role, ValueShape};
/// use condif_domain::DomainBuilder;
/// use condif_model::{DefaultBc, PropertyDefinition, PropertyKind};
///
/// let mut b = DomainBuilder::new();
/// b.add_property("conductivity", PropertyKind::Isotropic).unwrap();
/// b.define_property(
///     "conductivity",
///     PropertyDefinition::parse_constant(PropertyKind::Isotropic, "2.5").unwrap(),
/// )
/// .unwrap();
/// b.add_equation("Heat", "Temperature", ValueShape::Scalar, DefaultBc::ZeroFlux)
///     .unwrap();
/// b.link("Heat", Role::Diffusion, "conductivity").unwrap();
/// let domain = b.finalize().unwrap();
/// assert_eq!(domain.equations().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DomainBuilder {
    locations: LocationRegistry,
    properties: PropertyRegistry,
    advection: AdvectionRegistry,
    equations: EquationRegistry,
    boundaries: BoundaryClassification,
    time_step: Option<TimeStepPolicy>,
    cell_center: CellCenterAlgo,
    predefined: IndexSet<PredefinedEquation>,
}

impl DomainBuilder {
    /// An empty setup with the predefined locations and the `unity` property.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mesh locations and boundaries ───────────────────────────

    /// Register a named mesh location.
    ///
    /// [`DEFAULT_BOUNDARY`] is reserved for the unclassified faces and is
    /// rejected with `InvalidOption`.
    pub fn add_mesh_location(
        &mut self,
        name: &str,
        kind: EntityKind,
        selection: Selection,
    ) -> Result<LocationId, SetupError> {
        if name.trim() == DEFAULT_BOUNDARY {
            return Err(SetupError::InvalidOption {
                key: "mesh_location".to_string(),
                value: name.to_string(),
                reason: "reserved for the unclassified boundary faces".to_string(),
            });
        }
        self.locations.add(name, kind, selection)
    }

    /// Registered mesh locations.
    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Kind of boundary faces not classified by [`add_boundary`](Self::add_boundary).
    pub fn set_default_boundary(&mut self, kind: BoundaryKind) -> Result<(), SetupError> {
        self.boundaries.set_default(kind)
    }

    /// Classify the boundary-face location `location`.
    pub fn add_boundary(&mut self, location: &str, kind: BoundaryKind) -> Result<(), SetupError> {
        let loc = self.locations.resolve(location)?;
        self.boundaries.add(loc, kind)
    }

    // ── Global settings ─────────────────────────────────────────

    /// Set the time-step policy. A later call replaces the policy.
    pub fn set_time_step(&mut self, policy: TimeStepPolicy) {
        log::debug!(
            "time step: {} steps, final time {}, {:?}",
            policy.max_steps(),
            policy.final_time(),
            policy.definition()
        );
        self.time_step = Some(policy);
    }

    /// Set the cell center algorithm.
    pub fn set_cell_center_algo(&mut self, algo: CellCenterAlgo) {
        self.cell_center = algo;
    }

    /// Register a predefined equation. Activating a tag twice does nothing.
    ///
    /// The wall-distance equation solves `-Δu = 1` with diffusion linked to
    /// `unity`. Its wall boundary conditions are added at finalization,
    /// once the boundary classification is complete.
    pub fn activate_predefined(&mut self, tag: PredefinedEquation) -> Result<(), SetupError> {
        if self.predefined.contains(&tag) {
            log::debug!("predefined equation {tag} already active");
            return Ok(());
        }
        let name = tag.equation_name();
        match tag {
            PredefinedEquation::WallDistance => {
                self.equations
                    .add(name, name, ValueShape::Scalar, DefaultBc::ZeroFlux)?;
                let unity = self.properties.get(UNITY)?;
                self.equations
                    .link(name, Role::Diffusion, LinkTarget::Property(unity))?;
                let cells = self.locations.resolve(condif_mesh::registry::CELLS)?;
                self.equations.add_source_term(
                    name,
                    None,
                    cells,
                    SourceDefinition::Value(Value::Scalar(1.0)),
                )?;
            }
        }
        log::debug!("activated predefined equation {tag}");
        self.predefined.insert(tag);
        Ok(())
    }

    // ── Properties and advection fields ─────────────────────────

    /// Register an undefined property.
    pub fn add_property(&mut self, name: &str, kind: PropertyKind) -> SetupResult {
        self.properties.add(name, kind).map(drop)
    }

    /// Give a property its definition.
    pub fn define_property(&mut self, name: &str, definition: PropertyDefinition) -> SetupResult {
        self.properties.define(name, definition)
    }

    /// Look a property up by name.
    pub fn property(&self, name: &str) -> Result<&Property, SetupError> {
        self.properties.get(name)
    }

    /// Register an undefined advection field.
    pub fn add_advection_field(&mut self, name: &str) -> SetupResult {
        self.advection.add(name).map(drop)
    }

    /// Give an advection field its definition.
    pub fn define_advection_field(
        &mut self,
        name: &str,
        definition: AdvectionDefinition,
    ) -> SetupResult {
        self.advection.define(name, definition)
    }

    /// Look an advection field up by name.
    pub fn advection_field(&self, name: &str) -> Result<&AdvectionField, SetupError> {
        self.advection.get(name)
    }

    // ── Equations ───────────────────────────────────────────────

    /// Register a user equation.
    pub fn add_equation(
        &mut self,
        name: &str,
        field_name: &str,
        shape: ValueShape,
        default_bc: DefaultBc,
    ) -> SetupResult {
        self.equations.add(name, field_name, shape, default_bc).map(drop)
    }

    /// Look an equation up by name.
    pub fn equation(&self, name: &str) -> Result<&Equation, SetupError> {
        self.equations.get(name)
    }

    /// Attach a boundary condition on the boundary-face location `location`.
    pub fn add_boundary_condition(
        &mut self,
        equation: &str,
        location: &str,
        bc_type: BcType,
        definition: BcDefinition,
    ) -> SetupResult {
        let loc = self.locations.resolve(location)?;
        self.equations
            .add_boundary_condition(equation, loc, bc_type, definition)
    }

    /// Attach a source term on a cell location, `cells` when `location` is
    /// `None`.
    pub fn add_source_term(
        &mut self,
        equation: &str,
        label: Option<&str>,
        location: Option<&str>,
        definition: SourceDefinition,
    ) -> SetupResult {
        let loc = self
            .locations
            .resolve(location.unwrap_or(condif_mesh::registry::CELLS))?;
        self.equations
            .add_source_term(equation, label, loc, definition)
    }

    /// Set a source-term option from strings. `None` targets every term.
    pub fn set_source_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        key: &str,
        value: &str,
    ) -> SetupResult {
        self.equations
            .set_source_term_option(equation, label, key, value)
    }

    /// Set a typed source-term option. `None` targets every term.
    pub fn apply_source_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        opt: SourceTermOption,
    ) -> SetupResult {
        self.equations
            .apply_source_term_option(equation, label, opt)
    }

    /// Attach a reaction term whose coefficient is the property `property`.
    pub fn add_reaction_term(
        &mut self,
        equation: &str,
        label: Option<&str>,
        property: &str,
    ) -> SetupResult {
        let prop = self.properties.get(property)?;
        self.equations.add_reaction_term(equation, label, prop)
    }

    /// Set a reaction-term option from strings. `None` targets every term.
    pub fn set_reaction_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        key: &str,
        value: &str,
    ) -> SetupResult {
        self.equations
            .set_reaction_term_option(equation, label, key, value)
    }

    /// Set a typed reaction-term option. `None` targets every term.
    pub fn apply_reaction_term_option(
        &mut self,
        equation: &str,
        label: Option<&str>,
        opt: ReactionTermOption,
    ) -> SetupResult {
        self.equations
            .apply_reaction_term_option(equation, label, opt)
    }

    /// Link a role of `equation` to the entity named `target`.
    ///
    /// The time and diffusion roles look `target` up among properties, the
    /// advection role among advection fields. A name that only exists in
    /// the other registry fails with `RoleTargetMismatch`.
    pub fn link(&mut self, equation: &str, role: Role, target: &str) -> SetupResult {
        let resolved = if role.wants_advection_field() {
            match self.advection.get(target) {
                Ok(field) => Ok(LinkTarget::Advection(field)),
                Err(not_found) => Err((self.properties.get(target).is_ok(), not_found)),
            }
        } else {
            match self.properties.get(target) {
                Ok(prop) => Ok(LinkTarget::Property(prop)),
                Err(not_found) => Err((self.advection.get(target).is_ok(), not_found)),
            }
        };
        match resolved {
            Ok(link_target) => self.equations.link(equation, role, link_target),
            Err((true, _)) => Err(SetupError::RoleTargetMismatch {
                equation: equation.to_string(),
                role,
                target: target.to_string(),
            }),
            Err((false, not_found)) => Err(not_found),
        }
    }

    /// Set an equation option from strings.
    pub fn set_option(&mut self, equation: &str, key: &str, value: &str) -> SetupResult {
        self.equations.set_option(equation, key, value)
    }

    /// Set a typed equation option.
    pub fn set_equation_option(&mut self, equation: &str, opt: EquationOption) -> SetupResult {
        self.equations.set_equation_option(equation, opt)
    }

    /// Warnings raised so far.
    pub fn warnings(&self) -> &[SetupWarning] {
        self.equations.warnings()
    }

    // ── Finalization ────────────────────────────────────────────

    /// Validate the setup and freeze it.
    ///
    /// Boundary-condition overlap is decided from the location selections
    /// alone; criteria expressions are treated as disjoint from each other.
    pub fn finalize(self) -> Result<Domain, FinalizeError> {
        self.freeze(None)
    }

    /// Like [`finalize`](Self::finalize), but resolve every location through
    /// `selector` so that boundary-condition overlap is exact.
    pub fn finalize_with(self, selector: &dyn EntitySelector) -> Result<Domain, FinalizeError> {
        self.freeze(Some(selector))
    }

    fn freeze(mut self, selector: Option<&dyn EntitySelector>) -> Result<Domain, FinalizeError> {
        let mut violations = Vec::new();

        if self.predefined.contains(&PredefinedEquation::WallDistance) {
            if let Err(e) = self.add_wall_distance_conditions() {
                violations.push(e);
            }
        }

        let check = check_model(&self.properties, &self.advection, &self.equations);
        violations.extend(check.violations);

        if self.time_step.is_none() {
            for eq in self.equations.iter().filter(|e| e.is_unsteady()) {
                violations.push(SetupError::InvalidOption {
                    key: "time_step".to_string(),
                    value: eq.name().to_string(),
                    reason: format!(
                        "equation '{}' has an unsteady term but no time step is set",
                        eq.name()
                    ),
                });
            }
        }

        let mut cache = selector.map(|s| SelectionCache::new(&self.locations, s));
        for eq in self.equations.iter() {
            detect_overlaps(eq, &self.locations, cache.as_mut(), &mut violations);
        }
        drop(cache);

        if !violations.is_empty() {
            log::error!("domain setup rejected with {} violation(s)", violations.len());
            return Err(FinalizeError { violations });
        }

        let mut warnings = self.equations.warnings().to_vec();
        warnings.extend(check.warnings);
        log::info!(
            "domain finalized: {} equations, {} properties, {} advection fields, {} locations, {} warnings",
            self.equations.len(),
            self.properties.len(),
            self.advection.len(),
            self.locations.len(),
            warnings.len()
        );
        Ok(Domain {
            locations: self.locations,
            properties: self.properties,
            advection: self.advection,
            equations: self.equations,
            boundaries: self.boundaries,
            time_step: self.time_step,
            cell_center: self.cell_center,
            predefined: self.predefined,
            warnings,
        })
    }

    /// Homogeneous Dirichlet on every wall zone, and on the unclassified
    /// faces when the default kind is wall.
    fn add_wall_distance_conditions(&mut self) -> SetupResult {
        let mut walls: Vec<LocationId> = self
            .boundaries
            .zones_of(BoundaryKind::Wall)
            .map(|z| z.location)
            .collect();
        if self.boundaries.default_kind() == BoundaryKind::Wall {
            let excluded = self.boundaries.zone_ids();
            walls.push(self.locations.add(
                DEFAULT_BOUNDARY,
                EntityKind::BoundaryFace,
                Selection::Remainder { excluded },
            )?);
        }
        for id in walls {
            let loc = self.locations.get(id).ok_or_else(|| SetupError::NotFound {
                class: EntityClass::MeshLocation,
                name: format!("#{id}"),
            })?;
            self.equations.add_boundary_condition(
                PredefinedEquation::WallDistance.equation_name(),
                loc,
                BcType::Dirichlet,
                BcDefinition::Value(Value::Scalar(0.0)),
            )?;
        }
        Ok(())
    }
}

/// Result of a setup call with nothing to return.
pub type SetupResult = Result<(), SetupError>;

fn detect_overlaps(
    eq: &Equation,
    locations: &LocationRegistry,
    mut cache: Option<&mut SelectionCache<'_>>,
    violations: &mut Vec<SetupError>,
) {
    let bcs = eq.boundary_conditions();
    for (i, first) in bcs.iter().enumerate() {
        for second in &bcs[i + 1..] {
            let overlap = match cache.as_deref_mut() {
                Some(cache) => cache.overlaps(first.location, second.location),
                None => match (locations.get(first.location), locations.get(second.location)) {
                    (Some(a), Some(b)) => Ok(overlaps_static(a, b)),
                    _ => Ok(false),
                },
            };
            match overlap {
                Ok(false) => {}
                Ok(true) => violations.push(SetupError::OverlappingBoundaryCondition {
                    equation: eq.name().to_string(),
                    first: first.location_name.clone(),
                    second: second.location_name.clone(),
                }),
                Err(e) => {
                    if !violations.contains(&e) {
                        violations.push(e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predefined::WALL_DISTANCE;
    use condif_eval::ScalarFn;
    use condif_model::options::{Quadrature, TimeScheme};

    fn scalar_equation() -> DomainBuilder {
        let mut b = DomainBuilder::new();
        b.add_equation("AdvDiff", "Potential", ValueShape::Scalar, DefaultBc::ZeroValue)
            .unwrap();
        b
    }

    fn violations(b: DomainBuilder) -> Vec<SetupError> {
        b.finalize().unwrap_err().violations
    }

    #[test]
    fn undefined_diffusion_property_is_rejected() {
        let mut b = scalar_equation();
        b.add_property("conductivity", PropertyKind::Anisotropic).unwrap();
        b.link("AdvDiff", Role::Diffusion, "conductivity").unwrap();
        assert_eq!(
            violations(b),
            vec![SetupError::UnlinkedRole {
                equation: "AdvDiff".into(),
                role: Role::Diffusion,
                target: "conductivity".into(),
            }]
        );
    }

    #[test]
    fn link_resolves_the_role_registry() {
        let mut b = scalar_equation();
        b.add_property("k", PropertyKind::Isotropic).unwrap();
        b.add_advection_field("beta").unwrap();
        assert!(matches!(
            b.link("AdvDiff", Role::Advection, "k"),
            Err(SetupError::RoleTargetMismatch { .. })
        ));
        assert!(matches!(
            b.link("AdvDiff", Role::Diffusion, "beta"),
            Err(SetupError::RoleTargetMismatch { .. })
        ));
        assert!(matches!(
            b.link("AdvDiff", Role::Time, "missing"),
            Err(SetupError::NotFound { class: EntityClass::Property, .. })
        ));
        b.link("AdvDiff", Role::Advection, "beta").unwrap();
        let links = b.equation("AdvDiff").unwrap().links();
        assert_eq!(links.advection.as_ref().map(|l| l.name.as_str()), Some("beta"));
    }

    #[test]
    fn relinking_keeps_only_the_last_target() {
        let mut b = scalar_equation();
        for name in ["propA", "propB"] {
            b.add_property(name, PropertyKind::Isotropic).unwrap();
            b.define_property(name, PropertyDefinition::Constant(Value::Scalar(1.0)))
                .unwrap();
        }
        b.link("AdvDiff", Role::Diffusion, "propA").unwrap();
        b.link("AdvDiff", Role::Diffusion, "propB").unwrap();
        let domain = b.finalize().unwrap();
        let eq = domain.equations().get("AdvDiff").unwrap();
        assert_eq!(eq.links().diffusion.as_ref().unwrap().name, "propB");
        assert!(domain.warnings().iter().any(|w| matches!(
            w,
            SetupWarning::Relinked { previous, current, .. }
                if previous == "propA" && current == "propB"
        )));
    }

    #[test]
    fn theta_must_lie_in_unit_interval() {
        let mut b = scalar_equation();
        assert!(matches!(
            b.set_option("AdvDiff", "time_theta", "1.5"),
            Err(SetupError::InvalidOption { .. })
        ));
        b.set_option("AdvDiff", "time_theta", "0.5").unwrap();
        assert_eq!(
            b.equation("AdvDiff").unwrap().params().time_scheme,
            TimeScheme::Theta(0.5)
        );
    }

    #[test]
    fn source_term_quadrature_last_write_wins() {
        let mut b = scalar_equation();
        b.add_source_term(
            "AdvDiff",
            Some("SourceTerm"),
            None,
            SourceDefinition::Analytic(ScalarFn::shared(|_, x| x[0])),
        )
        .unwrap();
        b.set_source_term_option("AdvDiff", Some("SourceTerm"), "quadrature", "bary")
            .unwrap();
        b.set_source_term_option("AdvDiff", Some("SourceTerm"), "quadrature", "subdiv")
            .unwrap();
        let eq = b.equation("AdvDiff").unwrap();
        assert_eq!(eq.source_terms().len(), 1);
        assert_eq!(eq.source_terms()[0].quadrature, Quadrature::Subdiv);
    }

    #[test]
    fn unknown_source_label_fails() {
        let mut b = scalar_equation();
        assert!(matches!(
            b.set_source_term_option("AdvDiff", Some("ghost"), "quadrature", "bary"),
            Err(SetupError::NotFound { class: EntityClass::SourceTerm, .. })
        ));
        // Reported again at finalization.
        assert!(violations(b)
            .iter()
            .any(|v| matches!(v, SetupError::NotFound { class: EntityClass::SourceTerm, .. })));
    }

    #[test]
    fn overlapping_boundary_conditions_are_reported() {
        let mut b = scalar_equation();
        b.add_mesh_location("left", EntityKind::BoundaryFace, Selection::Ids(vec![0, 1, 2]))
            .unwrap();
        b.add_mesh_location("bottom", EntityKind::BoundaryFace, Selection::Ids(vec![2, 3]))
            .unwrap();
        let zero = || BcDefinition::Value(Value::Scalar(0.0));
        b.add_boundary_condition("AdvDiff", "left", BcType::Dirichlet, zero())
            .unwrap();
        b.add_boundary_condition("AdvDiff", "bottom", BcType::Neumann, zero())
            .unwrap();
        assert_eq!(
            violations(b),
            vec![SetupError::OverlappingBoundaryCondition {
                equation: "AdvDiff".into(),
                first: "left".into(),
                second: "bottom".into(),
            }]
        );
    }

    #[test]
    fn disjoint_boundary_conditions_pass() {
        let mut b = scalar_equation();
        b.add_mesh_location("in", EntityKind::BoundaryFace, Selection::Criteria("x < 1e-6".into()))
            .unwrap();
        b.add_mesh_location("out", EntityKind::BoundaryFace, Selection::Criteria("x > 0.999".into()))
            .unwrap();
        let zero = || BcDefinition::Value(Value::Scalar(0.0));
        b.add_boundary_condition("AdvDiff", "in", BcType::Dirichlet, zero())
            .unwrap();
        b.add_boundary_condition("AdvDiff", "out", BcType::Dirichlet, zero())
            .unwrap();
        assert!(b.finalize().is_ok());
    }

    #[test]
    fn unsteady_equation_needs_a_time_step() {
        let mut b = scalar_equation();
        b.link("AdvDiff", Role::Time, UNITY).unwrap();
        assert!(matches!(
            violations(b).as_slice(),
            [SetupError::InvalidOption { key, .. }] if key == "time_step"
        ));

        let mut b = scalar_equation();
        b.link("AdvDiff", Role::Time, UNITY).unwrap();
        b.set_time_step(TimeStepPolicy::parse(100, 10.0, "value", "1").unwrap());
        assert!(b.finalize().is_ok());
    }

    #[test]
    fn wall_distance_activation_is_idempotent() {
        let mut b = DomainBuilder::new();
        b.activate_predefined(PredefinedEquation::WallDistance).unwrap();
        b.activate_predefined(PredefinedEquation::WallDistance).unwrap();
        assert_eq!(b.equations.len(), 1);
        assert_eq!(PredefinedEquation::WallDistance.equation_name(), WALL_DISTANCE);
        let eq = b.equation(WALL_DISTANCE).unwrap();
        assert_eq!(eq.source_terms().len(), 1);
        assert_eq!(eq.links().diffusion.as_ref().unwrap().name, UNITY);
    }

    #[test]
    fn wall_distance_gets_dirichlet_on_walls() {
        let mut b = DomainBuilder::new();
        b.add_mesh_location("in", EntityKind::BoundaryFace, Selection::Criteria("x < 1e-6".into()))
            .unwrap();
        b.add_mesh_location("top", EntityKind::BoundaryFace, Selection::Criteria("y > 0.999".into()))
            .unwrap();
        b.add_boundary("in", BoundaryKind::Inlet).unwrap();
        b.add_boundary("top", BoundaryKind::Wall).unwrap();
        b.activate_predefined(PredefinedEquation::WallDistance).unwrap();
        let domain = b.finalize().unwrap();
        let eq = domain.equations().get(WALL_DISTANCE).unwrap();
        let names: Vec<&str> = eq
            .boundary_conditions()
            .iter()
            .map(|bc| bc.location_name.as_str())
            .collect();
        assert_eq!(names, vec!["top", DEFAULT_BOUNDARY]);
        assert!(domain.is_active(PredefinedEquation::WallDistance));
        let remainder = domain.locations().resolve(DEFAULT_BOUNDARY).unwrap();
        assert_eq!(
            remainder.selection(),
            &Selection::Remainder {
                excluded: vec![LocationId(4), LocationId(5)]
            }
        );
    }

    #[test]
    fn reserved_location_name_is_rejected_up_front() {
        let mut b = DomainBuilder::new();
        let err = b
            .add_mesh_location(DEFAULT_BOUNDARY, EntityKind::BoundaryFace, Selection::All)
            .unwrap_err();
        assert!(matches!(
            err,
            SetupError::InvalidOption { ref key, ref value, .. }
                if key == "mesh_location" && value == DEFAULT_BOUNDARY
        ));
        assert!(!b.locations().contains(DEFAULT_BOUNDARY));

        b.activate_predefined(PredefinedEquation::WallDistance).unwrap();
        let domain = b.finalize().unwrap();
        assert!(domain.locations().contains(DEFAULT_BOUNDARY));
    }

    #[test]
    fn symmetry_default_adds_no_remainder() {
        let mut b = DomainBuilder::new();
        b.set_default_boundary(BoundaryKind::Symmetry).unwrap();
        b.activate_predefined(PredefinedEquation::WallDistance).unwrap();
        let domain = b.finalize().unwrap();
        assert!(domain
            .equations()
            .get(WALL_DISTANCE)
            .unwrap()
            .boundary_conditions()
            .is_empty());
        assert!(!domain.locations().contains(DEFAULT_BOUNDARY));
    }

    #[test]
    fn every_violation_is_collected() {
        let mut b = scalar_equation();
        b.add_property("k", PropertyKind::Isotropic).unwrap();
        b.add_advection_field("beta").unwrap();
        b.link("AdvDiff", Role::Diffusion, "k").unwrap();
        b.link("AdvDiff", Role::Advection, "beta").unwrap();
        b.link("AdvDiff", Role::Time, UNITY).unwrap();
        let zero = || BcDefinition::Value(Value::Scalar(0.0));
        b.add_boundary_condition("AdvDiff", "boundary_faces", BcType::Dirichlet, zero())
            .unwrap();
        b.add_boundary_condition("AdvDiff", "boundary_faces", BcType::Neumann, zero())
            .unwrap();
        let err = b.finalize().unwrap_err();
        assert_eq!(err.violations.len(), 4, "{err}");
    }
}
