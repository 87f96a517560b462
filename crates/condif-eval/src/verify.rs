//! Central-difference cross-checks for manufactured sources.
//!
//! These helpers sample only `u` and the coefficient evaluators; every
//! derivative, including the divergence of a varying `K`, is rebuilt with
//! second-order central differences. Agreement with
//! [`ManufacturedSource::evaluate`](condif_core::Evaluator::evaluate) to
//! `O(h²)` shows the closed-form derivatives and their contraction are right.

use condif_core::{Point3, Tensor3, Vector3};

use crate::manufactured::ManufacturedSource;
use crate::tensor::{contract_symmetric, dot};

fn shifted(x: &Point3, axis: usize, delta: f64) -> Point3 {
    let mut p = *x;
    p[axis] += delta;
    p
}

/// Central-difference gradient of `u` at `x`.
pub fn central_gradient<F>(u: F, x: &Point3, h: f64) -> Vector3
where
    F: Fn(&Point3) -> f64,
{
    let mut g = [0.0; 3];
    for (i, gi) in g.iter_mut().enumerate() {
        *gi = (u(&shifted(x, i, h)) - u(&shifted(x, i, -h))) / (2.0 * h);
    }
    g
}

/// Central-difference Hessian of `u` at `x`.
pub fn central_hessian<F>(u: F, x: &Point3, h: f64) -> Tensor3
where
    F: Fn(&Point3) -> f64,
{
    let mut hess = [[0.0; 3]; 3];
    let centre = u(x);
    for i in 0..3 {
        hess[i][i] =
            (u(&shifted(x, i, h)) - 2.0 * centre + u(&shifted(x, i, -h))) / (h * h);
        for j in (i + 1)..3 {
            let pp = u(&shifted(&shifted(x, i, h), j, h));
            let pm = u(&shifted(&shifted(x, i, h), j, -h));
            let mp = u(&shifted(&shifted(x, i, -h), j, h));
            let mm = u(&shifted(&shifted(x, i, -h), j, -h));
            let mixed = (pp - pm - mp + mm) / (4.0 * h * h);
            hess[i][j] = mixed;
            hess[j][i] = mixed;
        }
    }
    hess
}

/// Recompute the manufactured source at `(time, x)` by central differences
/// with step `h` in space and time.
pub fn finite_difference_source(src: &ManufacturedSource, time: f64, x: &Point3, h: f64) -> f64 {
    let solution = src.solution();
    let u = |p: &Point3| solution.value(time, p);
    let grad = central_gradient(u, x, h);
    let mut total = 0.0;

    if let Some(k) = src.diffusion() {
        let hess = central_hessian(u, x, h);
        let kx = k.evaluate(time, x).to_tensor();
        let mut divergence = [0.0; 3];
        for i in 0..3 {
            let plus = k.evaluate(time, &shifted(x, i, h)).to_tensor();
            let minus = k.evaluate(time, &shifted(x, i, -h)).to_tensor();
            for (j, dj) in divergence.iter_mut().enumerate() {
                *dj += (plus[i][j] - minus[i][j]) / (2.0 * h);
            }
        }
        total -= contract_symmetric(&kx, &hess) + dot(&divergence, &grad);
    }
    if let Some(beta) = src.advection() {
        let beta = beta.evaluate(time, x).as_vector().unwrap_or_default();
        total += dot(&beta, &grad);
    }
    if let Some(sigma) = src.reaction() {
        total += sigma.evaluate(time, x).as_scalar().unwrap_or(0.0) * solution.value(time, x);
    }
    if let Some(rho) = src.time() {
        let dudt = (solution.value(time + h, x) - solution.value(time - h, x)) / (2.0 * h);
        total += rho.evaluate(time, x).as_scalar().unwrap_or(0.0) * dudt;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::analytic::{Constant, ScalarFn, VectorFn};
    use crate::manufactured::{ExactSolution, SineProduct};
    use condif_core::{Evaluator, Value};
    use std::f64::consts::PI;
    use std::sync::Arc;

    fn reference_source() -> ManufacturedSource {
        ManufacturedSource::builder(Arc::new(SineProduct {
            offset: 1.0,
            wavenumber: PI,
            shifts: [0.0, 0.5, 1.0 / 3.0],
        }))
        .diffusion(Arc::new(Constant(Value::Tensor([
            [1.0, 0.5, 0.0],
            [0.5, 1.0, 0.5],
            [0.0, 0.5, 1.0],
        ]))))
        .advection(VectorFn::shared(|_, x| [x[1] - 0.5, 0.5 - x[0], x[2]]))
        .reaction(Arc::new(Constant(Value::Scalar(1.0))))
        .build()
        .unwrap()
    }

    const POINTS: [Point3; 5] = [
        [0.0, 0.0, 0.0],
        [0.3, 0.2, 0.7],
        [0.9, 0.1, 0.45],
        [0.5, 0.5, 0.5],
        [0.12, 0.87, 0.33],
    ];

    #[test]
    fn closed_form_agrees_with_differences() {
        let src = reference_source();
        for p in POINTS {
            let exact = src.evaluate(0.0, &p).as_scalar().unwrap();
            let fd = finite_difference_source(&src, 0.0, &p, 1e-3);
            assert_abs_diff_eq!(exact, fd, epsilon = 1e-4);
        }
    }

    #[test]
    fn difference_error_shrinks_quadratically() {
        let src = reference_source();
        let p = [0.3, 0.2, 0.7];
        let exact = src.evaluate(0.0, &p).as_scalar().unwrap();
        let coarse = (finite_difference_source(&src, 0.0, &p, 2e-2) - exact).abs();
        let fine = (finite_difference_source(&src, 0.0, &p, 1e-2) - exact).abs();
        // Halving h should cut an O(h²) error by about four.
        assert!(fine < coarse / 2.5, "coarse {coarse}, fine {fine}");
    }

    struct Quadratic;

    impl ExactSolution for Quadratic {
        fn value(&self, _: f64, x: &Point3) -> f64 {
            x[0] * x[0] + x[1] * x[2]
        }
        fn gradient(&self, _: f64, x: &Point3) -> Vector3 {
            [2.0 * x[0], x[2], x[1]]
        }
        fn hessian(&self, _: f64, _: &Point3) -> Tensor3 {
            [[2.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]
        }
    }

    fn varying_conductivity() -> Arc<dyn Evaluator> {
        ScalarFn::shared(|_, x| 1.0 + x[0] * x[0] + x[1])
    }

    #[test]
    fn varying_tensor_divergence_is_recovered() {
        let src = ManufacturedSource::builder(Arc::new(Quadratic))
            .diffusion(varying_conductivity())
            .diffusion_divergence(VectorFn::shared(|_, x| [2.0 * x[0], 1.0, 0.0]))
            .build()
            .unwrap();
        let p = [0.4, -0.2, 0.6];
        let exact = src.evaluate(0.0, &p).as_scalar().unwrap();
        let fd = finite_difference_source(&src, 0.0, &p, 1e-4);
        assert_abs_diff_eq!(exact, fd, epsilon = 1e-5);
    }

    #[test]
    fn missing_divergence_drops_its_term() {
        let src = ManufacturedSource::builder(Arc::new(Quadratic))
            .diffusion(varying_conductivity())
            .build()
            .unwrap();
        let p = [0.4, -0.2, 0.6];
        let closed = src.evaluate(0.0, &p).as_scalar().unwrap();
        let fd = finite_difference_source(&src, 0.0, &p, 1e-4);
        // d·∇u = [0.8, 1, 0]·[0.8, 0.6, -0.2]
        assert_abs_diff_eq!(closed - fd, 1.24, epsilon = 1e-5);
    }

    #[test]
    fn gradient_of_linear_function_is_exact() {
        let g = central_gradient(|p: &Point3| 2.0 * p[0] - p[1] + 0.5 * p[2], &[1.0, 2.0, 3.0], 0.1);
        for (gi, want) in g.iter().zip([2.0, -1.0, 0.5]) {
            assert!((gi - want).abs() < 1e-12);
        }
    }
}
