//! Benchmark profiles and utilities for the condif setup layer.
//!
//! - [`sample_points`]: a deterministic point cloud in the unit box
//! - [`wide_setup`]: a builder with many equations and boundary zones, for
//!   finalization cost

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use condif_core::{EntityKind, Point3, Role, SetupError, Value, ValueShape};
use condif_domain::DomainBuilder;
use condif_mesh::Selection;
use condif_model::{BcDefinition, BcType, DefaultBc, PropertyDefinition, PropertyKind};

/// `n` points in `[0, 1)^3` from a fixed linear congruential sequence.
pub fn sample_points(n: usize) -> Vec<Point3> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n).map(|_| [next(), next(), next()]).collect()
}

/// A valid setup with `equations` scalar equations, each carrying one
/// Dirichlet condition on each of `zones` disjoint face groups.
pub fn wide_setup(equations: usize, zones: usize) -> Result<DomainBuilder, SetupError> {
    let mut b = DomainBuilder::new();
    b.add_property("k", PropertyKind::Isotropic)?;
    b.define_property("k", PropertyDefinition::Constant(Value::Scalar(1.0)))?;
    for z in 0..zones {
        let first = (z * 4) as u32;
        b.add_mesh_location(
            &format!("zone_{z}"),
            EntityKind::BoundaryFace,
            Selection::Ids((first..first + 4).collect()),
        )?;
    }
    for e in 0..equations {
        let name = format!("eq_{e}");
        b.add_equation(&name, &format!("field_{e}"), ValueShape::Scalar, DefaultBc::ZeroFlux)?;
        b.link(&name, Role::Diffusion, "k")?;
        for z in 0..zones {
            b.add_boundary_condition(
                &name,
                &format!("zone_{z}"),
                BcType::Dirichlet,
                BcDefinition::Value(Value::Scalar(z as f64)),
            )?;
        }
    }
    Ok(b)
}
