//! End-to-end setup of the reference advection-diffusion case.

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use condif_core::{EntityKind, SetupError, Value};
use condif_domain::{DomainBuilder, PredefinedEquation, DEFAULT_BOUNDARY, WALL_DISTANCE};
use condif_mesh::Selection;
use condif_model::options::{Quadrature, TimeScheme};
use condif_model::{BcDefinition, BcType, DefaultBc, SourceDefinition};
use condif_test_utils::fixtures::{
    reference_case, CONDUCTIVITY, EQUATION, INLET_CRITERIA, OUTLET_CRITERIA, SOURCE_LABEL,
};
use condif_test_utils::MockSelector;

fn unit_box_selector() -> MockSelector {
    let mut sel = MockSelector::with_counts(64, 12);
    sel.set_criteria(EntityKind::BoundaryFace, INLET_CRITERIA, vec![0, 1]);
    sel.set_criteria(EntityKind::BoundaryFace, OUTLET_CRITERIA, vec![10, 11]);
    sel
}

#[test]
fn reference_case_finalizes_cleanly() {
    let domain = reference_case().finalize().unwrap();
    assert!(domain.warnings().is_empty(), "{:?}", domain.warnings());
    assert!(domain.is_active(PredefinedEquation::WallDistance));

    let eq = domain.equations().get(EQUATION).unwrap();
    assert!(eq.is_unsteady());
    assert_eq!(eq.params().time_scheme, TimeScheme::Implicit);
    assert_eq!(eq.boundary_conditions().len(), 1);
    let st = eq.source_term(SOURCE_LABEL).unwrap();
    assert_eq!(st.quadrature, Quadrature::Subdiv);
    assert_eq!(st.location_name, "cells");

    let k = domain
        .properties()
        .get("conductivity")
        .unwrap()
        .tensor_at(0.0, &[0.3, 0.2, 0.1], &[])
        .unwrap();
    assert_eq!(k, CONDUCTIVITY);
    let beta = domain
        .advection_fields()
        .get("adv_field")
        .unwrap()
        .velocity_at(0.0, &[0.0, 0.0, 0.0]);
    assert_eq!(beta, Some([-0.5, 0.5, 0.0]));

    let policy = domain.time_step().unwrap();
    assert_eq!(policy.dt(0, 0.0), Some(1.0));
    assert!(policy.should_stop(10, 10.0));
}

#[test]
fn reference_source_regression_value_at_origin() {
    let domain = reference_case().finalize().unwrap();
    let st = domain
        .equations()
        .get(EQUATION)
        .unwrap()
        .source_term(SOURCE_LABEL)
        .unwrap();
    let SourceDefinition::Analytic(f) = &st.definition else {
        panic!("expected an analytic source");
    };
    let value = f.evaluate(0.0, &[0.0, 0.0, 0.0]).as_scalar().unwrap();
    assert_abs_diff_eq!(value, 1.0 - PI * 3f64.sqrt() / 4.0, epsilon = 1e-12);
}

#[test]
fn wall_distance_uses_the_unclassified_faces() {
    let domain = reference_case().finalize().unwrap();
    let wd = domain.equations().get(WALL_DISTANCE).unwrap();
    assert_eq!(wd.default_bc(), DefaultBc::ZeroFlux);
    let names: Vec<&str> = wd
        .boundary_conditions()
        .iter()
        .map(|bc| bc.location_name.as_str())
        .collect();
    assert_eq!(names, vec![DEFAULT_BOUNDARY]);
}

#[test]
fn reference_case_passes_with_a_mesh_selector() {
    let domain = reference_case().finalize_with(&unit_box_selector()).unwrap();
    assert_eq!(domain.equations().len(), 2);
}

#[test]
fn selector_reveals_overlap_between_criteria() {
    let build = || {
        let mut b = DomainBuilder::new();
        b.add_equation("Heat", "T", condif_core::ValueShape::Scalar, DefaultBc::ZeroFlux)
            .unwrap();
        b.add_mesh_location("left", EntityKind::BoundaryFace, Selection::Criteria("x < 0.1".into()))
            .unwrap();
        b.add_mesh_location("low", EntityKind::BoundaryFace, Selection::Criteria("y < 0.1".into()))
            .unwrap();
        let zero = || BcDefinition::Value(Value::Scalar(0.0));
        b.add_boundary_condition("Heat", "left", BcType::Dirichlet, zero())
            .unwrap();
        b.add_boundary_condition("Heat", "low", BcType::Neumann, zero())
            .unwrap();
        b
    };

    // Criteria are opaque without a mesh.
    assert!(build().finalize().is_ok());

    let mut sel = MockSelector::with_counts(8, 8);
    sel.set_criteria(EntityKind::BoundaryFace, "x < 0.1", vec![0, 1, 2]);
    sel.set_criteria(EntityKind::BoundaryFace, "y < 0.1", vec![2, 3]);
    let err = build().finalize_with(&sel).unwrap_err();
    assert_eq!(
        err.violations,
        vec![SetupError::OverlappingBoundaryCondition {
            equation: "Heat".into(),
            first: "left".into(),
            second: "low".into(),
        }]
    );

    let mut sel = MockSelector::with_counts(8, 8);
    sel.set_criteria(EntityKind::BoundaryFace, "x < 0.1", vec![0, 1]);
    sel.set_criteria(EntityKind::BoundaryFace, "y < 0.1", vec![2, 3]);
    assert!(build().finalize_with(&sel).is_ok());
}

#[test]
fn unresolvable_criteria_are_reported() {
    let mut b = reference_case();
    let zero = || BcDefinition::Value(Value::Scalar(0.0));
    b.add_boundary_condition(WALL_DISTANCE, "in", BcType::Neumann, zero())
        .unwrap();
    b.add_boundary_condition(WALL_DISTANCE, "out", BcType::Neumann, zero())
        .unwrap();

    // Fully resolved, the zones are disjoint from each other and from the
    // remainder.
    assert!(b.finalize_with(&unit_box_selector()).is_ok());

    let mut b = reference_case();
    b.add_boundary_condition(WALL_DISTANCE, "in", BcType::Neumann, zero())
        .unwrap();
    b.add_boundary_condition(WALL_DISTANCE, "out", BcType::Neumann, zero())
        .unwrap();
    let mut sel = MockSelector::with_counts(64, 12);
    sel.set_criteria(EntityKind::BoundaryFace, INLET_CRITERIA, vec![0, 1]);
    let err = b.finalize_with(&sel).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| matches!(v, SetupError::SelectionFailed { location, .. } if location == "out")));
}
