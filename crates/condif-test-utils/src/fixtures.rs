//! The reference advection-diffusion setup.
//!
//! - [`reference_source`]: the manufactured source for
//!   `u = 1 + sin(πx)·sin(π(y+0.5))·sin(π(z+1/3))`.
//! - [`reference_case`]: a builder holding the full `AdvDiff` setup on a
//!   unit box, with inlet and outlet zones and the wall distance active.

use std::f64::consts::PI;
use std::sync::Arc;

use condif_core::{EntityKind, Evaluator, Role, Tensor3, Value, ValueShape};
use condif_domain::{BoundaryKind, DomainBuilder, PredefinedEquation, TimeStepPolicy};
use condif_eval::{Constant, ExactSolution, ManufacturedSource, SineProduct, VectorFn};
use condif_mesh::Selection;
use condif_model::{
    AdvectionDefinition, BcDefinition, BcType, DefaultBc, PropertyDefinition, PropertyKind,
    SourceDefinition, UNITY,
};

pub const EQUATION: &str = "AdvDiff";
pub const FIELD: &str = "Potential";
pub const SOURCE_LABEL: &str = "SourceTerm";
pub const REACTION_LABEL: &str = "Reaction";

pub const INLET_CRITERIA: &str = "x < 1e-5";
pub const OUTLET_CRITERIA: &str = "x > 0.9999";

pub const CONDUCTIVITY: Tensor3 = [[1.0, 0.5, 0.0], [0.5, 1.0, 0.5], [0.0, 0.5, 1.0]];
pub const CONDUCTIVITY_TEXT: &str = "1.0  0.5  0.0\n0.5  1.0  0.5\n0.0  0.5  1.0\n";

pub fn reference_solution() -> Arc<dyn ExactSolution> {
    Arc::new(SineProduct {
        offset: 1.0,
        wavenumber: PI,
        shifts: [0.0, 0.5, 1.0 / 3.0],
    })
}

/// `β = (y - 0.5, 0.5 - x, z)`.
pub fn reference_velocity() -> Arc<dyn Evaluator> {
    VectorFn::shared(|_, x| [x[1] - 0.5, 0.5 - x[0], x[2]])
}

/// Manufactured source with the reference `K` and `β`, plus `σ = 1` when
/// `with_reaction` is set.
pub fn reference_source(with_reaction: bool) -> ManufacturedSource {
    let mut b = ManufacturedSource::builder(reference_solution())
        .diffusion(Arc::new(Constant(Value::Tensor(CONDUCTIVITY))))
        .advection(reference_velocity());
    if with_reaction {
        b = b.reaction(Arc::new(Constant(Value::Scalar(1.0))));
    }
    match b.build() {
        Ok(src) => src,
        Err(e) => panic!("reference source rejected: {e}"),
    }
}

/// The complete reference setup, ready to finalize.
///
/// Panics if any setup call fails; the fixture is expected to be valid.
pub fn reference_case() -> DomainBuilder {
    let mut b = DomainBuilder::new();
    if let Err(e) = populate(&mut b) {
        panic!("reference case rejected: {e}");
    }
    b
}

fn populate(b: &mut DomainBuilder) -> Result<(), condif_core::SetupError> {
    b.add_mesh_location(
        "in",
        EntityKind::BoundaryFace,
        Selection::Criteria(INLET_CRITERIA.into()),
    )?;
    b.add_mesh_location(
        "out",
        EntityKind::BoundaryFace,
        Selection::Criteria(OUTLET_CRITERIA.into()),
    )?;

    b.set_default_boundary(BoundaryKind::Wall)?;
    b.add_boundary("in", BoundaryKind::Inlet)?;
    b.add_boundary("out", BoundaryKind::Outlet)?;
    b.set_time_step(TimeStepPolicy::parse(100, 10.0, "value", "1")?);
    b.activate_predefined(PredefinedEquation::WallDistance)?;

    b.add_equation(EQUATION, FIELD, ValueShape::Scalar, DefaultBc::ZeroValue)?;
    b.add_property("conductivity", PropertyKind::Anisotropic)?;
    b.add_property("rho.cp", PropertyKind::Isotropic)?;
    b.add_advection_field("adv_field")?;

    b.define_property(
        "conductivity",
        PropertyDefinition::parse_constant(PropertyKind::Anisotropic, CONDUCTIVITY_TEXT)?,
    )?;
    b.define_property(
        "rho.cp",
        PropertyDefinition::parse_constant(PropertyKind::Isotropic, "1.0")?,
    )?;
    b.define_advection_field("adv_field", AdvectionDefinition::Analytic(reference_velocity()))?;

    b.add_boundary_condition(
        EQUATION,
        "boundary_faces",
        BcType::Dirichlet,
        BcDefinition::Analytic(reference_source(true).exact_value()),
    )?;
    b.link(EQUATION, Role::Time, "rho.cp")?;
    b.link(EQUATION, Role::Diffusion, "conductivity")?;
    b.link(EQUATION, Role::Advection, "adv_field")?;
    b.add_reaction_term(EQUATION, Some(REACTION_LABEL), UNITY)?;

    b.add_source_term(
        EQUATION,
        Some(SOURCE_LABEL),
        Some("cells"),
        SourceDefinition::Analytic(Arc::new(reference_source(true))),
    )?;
    b.set_source_term_option(EQUATION, Some(SOURCE_LABEL), "quadrature", "bary")?;
    b.set_source_term_option(EQUATION, Some(SOURCE_LABEL), "quadrature", "subdiv")?;
    Ok(())
}
