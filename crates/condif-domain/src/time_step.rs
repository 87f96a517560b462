//! Time-stepping limits and step size.

use std::fmt;
use std::sync::Arc;

use condif_core::SetupError;

/// A time-step size as a function of `(step, time)`.
pub type TimeFunc = Arc<dyn Fn(u64, f64) -> f64 + Send + Sync>;

/// How the step size is obtained.
#[derive(Clone)]
pub enum TimeStepDefinition {
    /// Constant step.
    Value(f64),
    /// Step computed from `(step, time)`.
    TimeFunc(TimeFunc),
    /// Chosen by the solver driver.
    User,
}

impl fmt::Debug for TimeStepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(dt) => f.debug_tuple("Value").field(dt).finish(),
            Self::TimeFunc(_) => f.write_str("TimeFunc(..)"),
            Self::User => f.write_str("User"),
        }
    }
}

/// When to stop and how far to advance each step.
///
/// The run stops at whichever limit is hit first.
#[derive(Clone, Debug)]
pub struct TimeStepPolicy {
    max_steps: u64,
    final_time: f64,
    definition: TimeStepDefinition,
}

fn invalid(key: &str, value: impl fmt::Display, reason: &str) -> SetupError {
    SetupError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl TimeStepPolicy {
    /// A validated policy.
    ///
    /// `max_steps` must be at least 1. `final_time` and a constant step
    /// must be positive and finite.
    pub fn new(
        max_steps: u64,
        final_time: f64,
        definition: TimeStepDefinition,
    ) -> Result<Self, SetupError> {
        if max_steps == 0 {
            return Err(invalid("max_steps", max_steps, "expected at least one step"));
        }
        if !(final_time.is_finite() && final_time > 0.0) {
            return Err(invalid("final_time", final_time, "expected a positive finite time"));
        }
        if let TimeStepDefinition::Value(dt) = definition {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(invalid("time_step", dt, "expected a positive finite step"));
            }
        }
        Ok(Self {
            max_steps,
            final_time,
            definition,
        })
    }

    /// A policy from a definition keyword and its textual payload.
    ///
    /// `method` is `value` or `user`. A `time_func` step needs a closure and
    /// is built with [`new`](Self::new).
    pub fn parse(
        max_steps: u64,
        final_time: f64,
        method: &str,
        payload: &str,
    ) -> Result<Self, SetupError> {
        let definition = match method.trim() {
            "value" => {
                let dt = payload
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid("time_step", payload.trim(), "expected a number"))?;
                TimeStepDefinition::Value(dt)
            }
            "user" => TimeStepDefinition::User,
            "time_func" => {
                return Err(invalid(
                    "time_step_method",
                    "time_func",
                    "a time function cannot be given as text",
                ));
            }
            other => {
                return Err(invalid(
                    "time_step_method",
                    other,
                    "expected value, time_func or user",
                ));
            }
        };
        Self::new(max_steps, final_time, definition)
    }

    /// Maximum number of steps.
    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Physical time at which the run ends.
    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    /// Step-size definition.
    pub fn definition(&self) -> &TimeStepDefinition {
        &self.definition
    }

    /// Whether the run is over after `step` steps at time `time`.
    pub fn should_stop(&self, step: u64, time: f64) -> bool {
        step >= self.max_steps || time >= self.final_time
    }

    /// Step size for the step starting at `(step, time)`, `None` when the
    /// driver chooses it.
    pub fn dt(&self, step: u64, time: f64) -> Option<f64> {
        match &self.definition {
            TimeStepDefinition::Value(dt) => Some(*dt),
            TimeStepDefinition::TimeFunc(f) => Some(f(step, time)),
            TimeStepDefinition::User => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_limit_wins() {
        let policy = TimeStepPolicy::parse(100, 10.0, "value", "1").unwrap();
        assert_eq!(policy.dt(0, 0.0), Some(1.0));
        assert!(!policy.should_stop(9, 9.0));
        assert!(policy.should_stop(10, 10.0));
        assert!(policy.should_stop(100, 0.5));
    }

    #[test]
    fn time_func_is_evaluated() {
        let policy = TimeStepPolicy::new(
            1000,
            1.0,
            TimeStepDefinition::TimeFunc(Arc::new(|step, _| 0.1 / (step + 1) as f64)),
        )
        .unwrap();
        assert_eq!(policy.dt(0, 0.0), Some(0.1));
        assert_eq!(policy.dt(1, 0.1), Some(0.05));
    }

    #[test]
    fn user_step_is_left_to_the_driver() {
        let policy = TimeStepPolicy::parse(5, 1.0, "user", "").unwrap();
        assert_eq!(policy.dt(0, 0.0), None);
    }

    #[test]
    fn bad_values_rejected() {
        assert!(TimeStepPolicy::parse(10, 1.0, "value", "0").is_err());
        assert!(TimeStepPolicy::parse(10, 1.0, "value", "abc").is_err());
        assert!(TimeStepPolicy::parse(10, -1.0, "value", "0.1").is_err());
        assert!(TimeStepPolicy::parse(10, 1.0, "time_func", "t").is_err());
        assert!(TimeStepPolicy::parse(10, 1.0, "adaptive", "1").is_err());
    }

    #[test]
    fn zero_step_limit_rejected() {
        match TimeStepPolicy::new(0, 1.0, TimeStepDefinition::User) {
            Err(SetupError::InvalidOption { key, .. }) => assert_eq!(key, "max_steps"),
            other => panic!("expected InvalidOption, got {other:?}"),
        }
        assert!(TimeStepPolicy::parse(1, 1.0, "value", "0.5").is_ok());
    }
}
