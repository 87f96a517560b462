//! Closure-backed and constant evaluators.
//!
//! The wrapper type fixes the value shape, so `evaluate` cannot return a
//! variant other than the one [`shape`](Evaluator::shape) declares.

use std::fmt;
use std::sync::Arc;

use condif_core::{Evaluator, Law, Point3, Tensor3, Value, ValueShape, Vector3};

/// An evaluator returning the same value everywhere, at all times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub Value);

impl Evaluator for Constant {
    fn shape(&self) -> ValueShape {
        self.0.shape()
    }

    fn evaluate(&self, _time: f64, _x: &Point3) -> Value {
        self.0
    }
}

/// A scalar-valued closure `f(t, x) -> f64`.
pub struct ScalarFn<F>(F);

impl<F> ScalarFn<F>
where
    F: Fn(f64, &Point3) -> f64 + Send + Sync + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }

    /// Wrap a closure and erase it behind a shared trait object.
    pub fn shared(f: F) -> Arc<dyn Evaluator> {
        Arc::new(Self(f))
    }
}

impl<F> Evaluator for ScalarFn<F>
where
    F: Fn(f64, &Point3) -> f64 + Send + Sync,
{
    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    fn evaluate(&self, time: f64, x: &Point3) -> Value {
        Value::Scalar((self.0)(time, x))
    }
}

impl<F> fmt::Debug for ScalarFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScalarFn")
    }
}

/// A vector-valued closure `f(t, x) -> [f64; 3]`.
pub struct VectorFn<F>(F);

impl<F> VectorFn<F>
where
    F: Fn(f64, &Point3) -> Vector3 + Send + Sync + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }

    /// Wrap a closure and erase it behind a shared trait object.
    pub fn shared(f: F) -> Arc<dyn Evaluator> {
        Arc::new(Self(f))
    }
}

impl<F> Evaluator for VectorFn<F>
where
    F: Fn(f64, &Point3) -> Vector3 + Send + Sync,
{
    fn shape(&self) -> ValueShape {
        ValueShape::Vector
    }

    fn evaluate(&self, time: f64, x: &Point3) -> Value {
        Value::Vector((self.0)(time, x))
    }
}

impl<F> fmt::Debug for VectorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VectorFn")
    }
}

/// A tensor-valued closure `f(t, x) -> [[f64; 3]; 3]`.
pub struct TensorFn<F>(F);

impl<F> TensorFn<F>
where
    F: Fn(f64, &Point3) -> Tensor3 + Send + Sync + 'static,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }

    /// Wrap a closure and erase it behind a shared trait object.
    pub fn shared(f: F) -> Arc<dyn Evaluator> {
        Arc::new(Self(f))
    }
}

impl<F> Evaluator for TensorFn<F>
where
    F: Fn(f64, &Point3) -> Tensor3 + Send + Sync,
{
    fn shape(&self) -> ValueShape {
        ValueShape::Tensor
    }

    fn evaluate(&self, time: f64, x: &Point3) -> Value {
        Value::Tensor((self.0)(time, x))
    }
}

impl<F> fmt::Debug for TensorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TensorFn")
    }
}

/// A scalar property law `f(t, x, state) -> f64` over named state inputs.
pub struct ScalarLaw<F> {
    inputs: Vec<String>,
    f: F,
}

impl<F> ScalarLaw<F>
where
    F: Fn(f64, &Point3, &[f64]) -> f64 + Send + Sync + 'static,
{
    /// Wrap a closure consuming the named state inputs, in order.
    pub fn new<I, S>(inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            f,
        }
    }

    /// Erase behind a shared trait object.
    pub fn into_shared(self) -> Arc<dyn Law> {
        Arc::new(self)
    }
}

impl<F> Law for ScalarLaw<F>
where
    F: Fn(f64, &Point3, &[f64]) -> f64 + Send + Sync,
{
    fn shape(&self) -> ValueShape {
        ValueShape::Scalar
    }

    fn inputs(&self) -> &[String] {
        &self.inputs
    }

    fn evaluate(&self, time: f64, x: &Point3, state: &[f64]) -> Value {
        Value::Scalar((self.f)(time, x, state))
    }
}
