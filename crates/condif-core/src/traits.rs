//! Evaluation traits behind analytic definitions.

use std::fmt;

use crate::value::{Point3, Value, ValueShape};

/// A closed-form function of `(time, position)`.
///
/// Implementations must be pure: the same inputs always produce the same
/// value, and evaluation reads no shared mutable state. The solver core
/// relies on this to call evaluators concurrently across quadrature points
/// without locking, which is why `Send + Sync` are supertraits.
///
/// The declared [`shape`](Evaluator::shape) is checked against the owning
/// entity when the evaluator is registered. `evaluate` must return a value
/// of that shape and never fails; a non-finite result is a caller bug.
pub trait Evaluator: Send + Sync {
    /// Shape of every value this evaluator returns.
    fn shape(&self) -> ValueShape;

    /// Evaluate at `time` and position `x`.
    fn evaluate(&self, time: f64, x: &Point3) -> Value;
}

/// A property law: a closed-form function that also depends on solver state.
///
/// `inputs` names the state quantities the law consumes, in the order the
/// solver core must pass them in `state`.
pub trait Law: Send + Sync {
    /// Shape of every value this law returns.
    fn shape(&self) -> ValueShape;

    /// Names of the state inputs, in `state` order.
    fn inputs(&self) -> &[String];

    /// Evaluate at `time`, position `x`, and the given state inputs.
    fn evaluate(&self, time: f64, x: &Point3, state: &[f64]) -> Value;
}

impl fmt::Debug for dyn Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("shape", &self.shape())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for dyn Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Law")
            .field("shape", &self.shape())
            .field("inputs", &self.inputs())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Unit;
    impl Evaluator for Unit {
        fn shape(&self) -> ValueShape {
            ValueShape::Scalar
        }
        fn evaluate(&self, _time: f64, _x: &Point3) -> Value {
            Value::Scalar(1.0)
        }
    }

    #[test]
    fn trait_objects_are_shareable_and_debuggable() {
        let ev: Arc<dyn Evaluator> = Arc::new(Unit);
        let clone = Arc::clone(&ev);
        let handle = std::thread::spawn(move || clone.evaluate(0.0, &[0.0; 3]));
        assert_eq!(handle.join().unwrap(), Value::Scalar(1.0));
        assert!(format!("{ev:?}").contains("Scalar"));
    }
}
