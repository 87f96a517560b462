//! Build, finalize and inspect the reference advection-diffusion case.
//!
//! Demonstrates: register locations, properties and fields → define them →
//! attach terms and links → finalize → read the frozen domain.

use std::f64::consts::PI;

use condif_core::EntityKind;
use condif_domain::WALL_DISTANCE;
use condif_eval::verify::finite_difference_source;
use condif_test_utils::fixtures::{
    reference_case, reference_source, EQUATION, INLET_CRITERIA, OUTLET_CRITERIA,
};
use condif_test_utils::MockSelector;

fn main() {
    println!("=== condif reference setup ===\n");

    let mut selector = MockSelector::with_counts(1000, 600);
    selector.set_criteria(EntityKind::BoundaryFace, INLET_CRITERIA, (0..100).collect());
    selector.set_criteria(EntityKind::BoundaryFace, OUTLET_CRITERIA, (500..600).collect());

    let domain = match reference_case().finalize_with(&selector) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    for eq in domain.equations().iter() {
        println!(
            "equation '{}' on field '{}': {} BC(s), {} source term(s), {} reaction term(s)",
            eq.name(),
            eq.field_name(),
            eq.boundary_conditions().len(),
            eq.source_terms().len(),
            eq.reaction_terms().len(),
        );
        for bc in eq.boundary_conditions() {
            println!("  {} by {} on '{}'", bc.bc_type, bc.definition.method(), bc.location_name);
        }
    }
    for zone in domain.boundaries().zones() {
        println!("boundary '{}' is {}", zone.location_name, zone.kind);
    }
    println!("unclassified faces: {}", domain.boundaries().default_kind());
    println!(
        "wall distance active: {}",
        domain.equations().contains(WALL_DISTANCE)
    );

    if let Some(policy) = domain.time_step() {
        println!(
            "time step: {:?}, stop after {} steps or t = {}",
            policy.dt(0, 0.0),
            policy.max_steps(),
            policy.final_time()
        );
    }

    println!("\nManufactured source at the origin:");
    let src = reference_source(true);
    let x = [0.0, 0.0, 0.0];
    let closed = src.contributions(0.0, &x).total();
    println!("  closed form        {closed:.12}");
    println!("  1 - pi*sqrt(3)/4   {:.12}", 1.0 - PI * 3f64.sqrt() / 4.0);
    for h in [1e-2, 5e-3, 2.5e-3] {
        let fd = finite_difference_source(&src, 0.0, &x, h);
        println!("  FD h = {h:<8} {fd:.12}  (error {:.3e})", (fd - closed).abs());
    }

    for w in domain.warnings() {
        println!("warning: {w}");
    }
}
