//! Manufactured-solution source terms.
//!
//! Given an assumed exact solution `u` with closed-form derivatives, a
//! diffusion tensor `K`, an advection field `β`, a reaction coefficient `σ`
//! and a mass coefficient `ρ`, [`ManufacturedSource`] evaluates
//!
//! ```text
//! f = ρ·∂u/∂t
//!   - (Σ_i K_ii·∂²u/∂x_i² + 2·Σ_{i<j} K_ij·∂²u/∂x_i∂x_j + d·∇u)
//!   + β·∇u
//!   + σ·u
//! ```
//!
//! where `d_j = Σ_i ∂K_ij/∂x_i` is the divergence of `K`, zero unless the
//! caller supplies one for a spatially varying tensor. Every term is
//! optional; an absent coefficient contributes nothing.

use std::fmt;
use std::sync::Arc;

use condif_core::{Evaluator, Point3, SetupError, Tensor3, Value, ValueShape, Vector3};

use crate::tensor::{contract_symmetric, dot};

/// An exact solution with closed-form first and second derivatives.
pub trait ExactSolution: Send + Sync {
    /// `u(t, x)`.
    fn value(&self, time: f64, x: &Point3) -> f64;

    /// `∇u(t, x)`.
    fn gradient(&self, time: f64, x: &Point3) -> Vector3;

    /// Symmetric Hessian `∂²u/∂x_i∂x_j`.
    fn hessian(&self, time: f64, x: &Point3) -> Tensor3;

    /// `∂u/∂t`. Steady solutions keep the default.
    fn time_derivative(&self, _time: f64, _x: &Point3) -> f64 {
        0.0
    }
}

/// `u = offset + Π_i sin(k·(x_i + shift_i))`, steady in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineProduct {
    /// Constant added to the product.
    pub offset: f64,
    /// Wavenumber `k`, shared by all three axes.
    pub wavenumber: f64,
    /// Per-axis phase shift.
    pub shifts: Vector3,
}

impl SineProduct {
    fn trig(&self, x: &Point3) -> (Vector3, Vector3) {
        let mut s = [0.0; 3];
        let mut c = [0.0; 3];
        for i in 0..3 {
            let arg = self.wavenumber * (x[i] + self.shifts[i]);
            s[i] = arg.sin();
            c[i] = arg.cos();
        }
        (s, c)
    }
}

impl ExactSolution for SineProduct {
    fn value(&self, _time: f64, x: &Point3) -> f64 {
        let (s, _) = self.trig(x);
        self.offset + s[0] * s[1] * s[2]
    }

    fn gradient(&self, _time: f64, x: &Point3) -> Vector3 {
        let (s, c) = self.trig(x);
        let k = self.wavenumber;
        [
            k * c[0] * s[1] * s[2],
            k * s[0] * c[1] * s[2],
            k * s[0] * s[1] * c[2],
        ]
    }

    fn hessian(&self, _time: f64, x: &Point3) -> Tensor3 {
        let (s, c) = self.trig(x);
        let k2 = self.wavenumber * self.wavenumber;
        let pure = -k2 * s[0] * s[1] * s[2];
        let xy = k2 * c[0] * c[1] * s[2];
        let xz = k2 * c[0] * s[1] * c[2];
        let yz = k2 * s[0] * c[1] * c[2];
        [[pure, xy, xz], [xy, pure, yz], [xz, yz, pure]]
    }
}

/// The individual terms of a manufactured source at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SourceContributions {
    /// `ρ·∂u/∂t`.
    pub time: f64,
    /// `-∇·(K∇u)`.
    pub diffusion: f64,
    /// `β·∇u`.
    pub advection: f64,
    /// `σ·u`.
    pub reaction: f64,
}

impl SourceContributions {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.time + self.diffusion + self.advection + self.reaction
    }
}

/// Source term that makes an [`ExactSolution`] exact for the
/// advection-diffusion-reaction operator.
///
/// Constructed via [`ManufacturedSource::builder`].
pub struct ManufacturedSource {
    solution: Arc<dyn ExactSolution>,
    diffusion: Option<Arc<dyn Evaluator>>,
    diffusion_divergence: Option<Arc<dyn Evaluator>>,
    advection: Option<Arc<dyn Evaluator>>,
    reaction: Option<Arc<dyn Evaluator>>,
    time: Option<Arc<dyn Evaluator>>,
}

/// Builder for [`ManufacturedSource`].
///
/// Only the exact solution is required; each coefficient defaults to absent.
pub struct ManufacturedSourceBuilder {
    solution: Arc<dyn ExactSolution>,
    diffusion: Option<Arc<dyn Evaluator>>,
    diffusion_divergence: Option<Arc<dyn Evaluator>>,
    advection: Option<Arc<dyn Evaluator>>,
    reaction: Option<Arc<dyn Evaluator>>,
    time: Option<Arc<dyn Evaluator>>,
}

impl ManufacturedSource {
    /// Start a builder for the given exact solution.
    pub fn builder(solution: Arc<dyn ExactSolution>) -> ManufacturedSourceBuilder {
        ManufacturedSourceBuilder {
            solution,
            diffusion: None,
            diffusion_divergence: None,
            advection: None,
            reaction: None,
            time: None,
        }
    }

    /// The exact solution this source was derived from.
    pub fn solution(&self) -> &Arc<dyn ExactSolution> {
        &self.solution
    }

    /// An evaluator for `u` itself, for use as a Dirichlet boundary value.
    pub fn exact_value(&self) -> Arc<dyn Evaluator> {
        Arc::new(ExactValue(Arc::clone(&self.solution)))
    }

    /// The diffusion tensor evaluator, if any.
    pub fn diffusion(&self) -> Option<&Arc<dyn Evaluator>> {
        self.diffusion.as_ref()
    }

    /// The advection field evaluator, if any.
    pub fn advection(&self) -> Option<&Arc<dyn Evaluator>> {
        self.advection.as_ref()
    }

    /// The reaction coefficient evaluator, if any.
    pub fn reaction(&self) -> Option<&Arc<dyn Evaluator>> {
        self.reaction.as_ref()
    }

    /// The mass coefficient evaluator, if any.
    pub fn time(&self) -> Option<&Arc<dyn Evaluator>> {
        self.time.as_ref()
    }

    /// Each term of the source at `(time, x)`.
    pub fn contributions(&self, time: f64, x: &Point3) -> SourceContributions {
        let mut out = SourceContributions::default();
        let needs_gradient =
            self.diffusion.is_some() || self.advection.is_some();
        let grad = if needs_gradient {
            self.solution.gradient(time, x)
        } else {
            [0.0; 3]
        };

        if let Some(k) = &self.diffusion {
            let k = k.evaluate(time, x).to_tensor();
            let h = self.solution.hessian(time, x);
            let mut second_order = contract_symmetric(&k, &h);
            if let Some(d) = &self.diffusion_divergence {
                let d = d.evaluate(time, x).as_vector().unwrap_or_default();
                second_order += dot(&d, &grad);
            }
            out.diffusion = -second_order;
        }
        if let Some(beta) = &self.advection {
            let beta = beta.evaluate(time, x).as_vector().unwrap_or_default();
            out.advection = dot(&beta, &grad);
        }
        if let Some(sigma) = &self.reaction {
            let sigma = sigma.evaluate(time, x).as_scalar().unwrap_or(0.0);
            out.reaction = sigma * self.solution.value(time, x);
        }
        if let Some(rho) = &self.time {
            let rho = rho.evaluate(time, x).as_scalar().unwrap_or(0.0);
            out.time = rho * self.solution.time_derivative(time, x);
        }
        out
    }
}

impl Evaluator for ManufacturedSource {
    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    fn evaluate(&self, time: f64, x: &Point3) -> Value {
        Value::Scalar(self.contributions(time, x).total())
    }
}

impl fmt::Debug for ManufacturedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManufacturedSource")
            .field("diffusion", &self.diffusion.is_some())
            .field("diffusion_divergence", &self.diffusion_divergence.is_some())
            .field("advection", &self.advection.is_some())
            .field("reaction", &self.reaction.is_some())
            .field("time", &self.time.is_some())
            .finish()
    }
}

fn require_shape(
    term: &str,
    ev: &Option<Arc<dyn Evaluator>>,
    expected: ValueShape,
) -> Result<(), SetupError> {
    match ev {
        Some(ev) if ev.shape() != expected => Err(SetupError::ShapeMismatch {
            entity: format!("manufactured source {term}"),
            expected: expected.to_string(),
            found: ev.shape().to_string(),
        }),
        _ => Ok(()),
    }
}

impl ManufacturedSourceBuilder {
    /// Diffusion coefficient; scalar, diagonal vector, or full tensor.
    ///
    /// For a spatially varying `K`, also pass its divergence through
    /// [`diffusion_divergence`](Self::diffusion_divergence). Without it the
    /// `d·∇u` term is left out and the source only holds for constant `K`.
    pub fn diffusion(mut self, k: Arc<dyn Evaluator>) -> Self {
        self.diffusion = Some(k);
        self
    }

    /// Divergence `d_j = Σ_i ∂K_ij/∂x_i` of a spatially varying `K`.
    /// Omitting it is the same as passing zero.
    pub fn diffusion_divergence(mut self, d: Arc<dyn Evaluator>) -> Self {
        self.diffusion_divergence = Some(d);
        self
    }

    /// Advection field `β`.
    pub fn advection(mut self, beta: Arc<dyn Evaluator>) -> Self {
        self.advection = Some(beta);
        self
    }

    /// Zero-order reaction coefficient `σ`.
    pub fn reaction(mut self, sigma: Arc<dyn Evaluator>) -> Self {
        self.reaction = Some(sigma);
        self
    }

    /// Mass coefficient `ρ` of the unsteady term.
    pub fn time(mut self, rho: Arc<dyn Evaluator>) -> Self {
        self.time = Some(rho);
        self
    }

    /// Validate coefficient shapes and build the source.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ShapeMismatch`] if the advection field or the
    /// divergence is not a vector, if the reaction or mass coefficient is not
    /// a scalar, or if a divergence is given without a diffusion tensor.
    pub fn build(self) -> Result<ManufacturedSource, SetupError> {
        require_shape("divergence", &self.diffusion_divergence, ValueShape::Vector)?;
        require_shape("advection", &self.advection, ValueShape::Vector)?;
        require_shape("reaction", &self.reaction, ValueShape::Scalar)?;
        require_shape("time", &self.time, ValueShape::Scalar)?;
        if self.diffusion_divergence.is_some() && self.diffusion.is_none() {
            return Err(SetupError::ShapeMismatch {
                entity: "manufactured source divergence".to_string(),
                expected: "diffusion tensor alongside".to_string(),
                found: "no diffusion tensor".to_string(),
            });
        }
        Ok(ManufacturedSource {
            solution: self.solution,
            diffusion: self.diffusion,
            diffusion_divergence: self.diffusion_divergence,
            advection: self.advection,
            reaction: self.reaction,
            time: self.time,
        })
    }
}

/// `u` itself, exposed as an [`Evaluator`].
struct ExactValue(Arc<dyn ExactSolution>);

impl Evaluator for ExactValue {
    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    fn evaluate(&self, time: f64, x: &Point3) -> Value {
        Value::Scalar(self.0.value(time, x))
    }
}
