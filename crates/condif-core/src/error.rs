//! Setup-phase error types.
//!
//! Every registration, linking, and option call returns these errors
//! synchronously. None of them is recoverable at this layer: the driver is
//! expected to report them and stop before the solve phase.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::value::EntityKind;

/// Namespace an entity name lives in, used to give errors context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// A named mesh location.
    MeshLocation,
    /// A material property.
    Property,
    /// An advection field.
    AdvectionField,
    /// An equation.
    Equation,
    /// A labelled source term of an equation.
    SourceTerm,
    /// A labelled reaction term of an equation.
    ReactionTerm,
    /// A boundary classification entry of the domain.
    Boundary,
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeshLocation => write!(f, "mesh location"),
            Self::Property => write!(f, "property"),
            Self::AdvectionField => write!(f, "advection field"),
            Self::Equation => write!(f, "equation"),
            Self::SourceTerm => write!(f, "source term"),
            Self::ReactionTerm => write!(f, "reaction term"),
            Self::Boundary => write!(f, "boundary"),
        }
    }
}

/// Term of an equation a property or advection field is linked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Unsteady (mass) term; links a property.
    Time,
    /// Diffusion term; links a property.
    Diffusion,
    /// Advection term; links an advection field.
    Advection,
    /// Zero-order reaction term; links a property.
    Reaction,
}

impl Role {
    /// Whether this role expects an advection field rather than a property.
    pub fn wants_advection_field(&self) -> bool {
        matches!(self, Self::Advection)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Diffusion => write!(f, "diffusion"),
            Self::Advection => write!(f, "advection"),
            Self::Reaction => write!(f, "reaction"),
        }
    }
}

impl FromStr for Role {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Self::Time),
            "diffusion" => Ok(Self::Diffusion),
            "advection" => Ok(Self::Advection),
            "reaction" => Ok(Self::Reaction),
            other => Err(SetupError::InvalidOption {
                key: "role".to_string(),
                value: other.to_string(),
                reason: "expected time, diffusion, advection or reaction".to_string(),
            }),
        }
    }
}

/// Errors detected while building a domain configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupError {
    /// A name is already registered in this namespace.
    DuplicateName {
        /// Namespace of the clash.
        class: EntityClass,
        /// The clashing name.
        name: String,
    },
    /// A referenced name or label is not registered.
    NotFound {
        /// Namespace that was searched.
        class: EntityClass,
        /// The missing name.
        name: String,
    },
    /// A value's shape does not match what the entity requires.
    ShapeMismatch {
        /// Entity the value was given to.
        entity: String,
        /// Shape the entity requires.
        expected: String,
        /// Shape that was supplied.
        found: String,
    },
    /// Unknown option key or out-of-range option value.
    InvalidOption {
        /// Option key.
        key: String,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A linked role points at an entity that was never defined.
    UnlinkedRole {
        /// Equation owning the role.
        equation: String,
        /// The role.
        role: Role,
        /// Name of the undefined property or advection field.
        target: String,
    },
    /// Two boundary conditions of one equation cover the same entities.
    OverlappingBoundaryCondition {
        /// Equation owning both conditions.
        equation: String,
        /// Location of the earlier condition.
        first: String,
        /// Location of the later condition.
        second: String,
    },
    /// A property or advection field was given a second definition.
    AlreadyDefined {
        /// Namespace of the entity.
        class: EntityClass,
        /// Entity name.
        name: String,
    },
    /// A property was linked to the advection role, or an advection field
    /// to a property role.
    RoleTargetMismatch {
        /// Equation being linked.
        equation: String,
        /// Requested role.
        role: Role,
        /// Name of the rejected target.
        target: String,
    },
    /// A location of the wrong entity kind was used.
    EntityKindMismatch {
        /// Location name.
        location: String,
        /// Kind the use site requires.
        expected: EntityKind,
        /// Kind of the location.
        found: EntityKind,
    },
    /// The external entity selector could not resolve a location.
    SelectionFailed {
        /// Location name.
        location: String,
        /// Selector's explanation.
        reason: String,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { class, name } => {
                write!(f, "{class} '{name}' is already registered")
            }
            Self::NotFound { class, name } => write!(f, "{class} '{name}' not found"),
            Self::ShapeMismatch {
                entity,
                expected,
                found,
            } => {
                write!(f, "'{entity}' requires a {expected} value, got {found}")
            }
            Self::InvalidOption { key, value, reason } => {
                write!(f, "invalid value '{value}' for option '{key}': {reason}")
            }
            Self::UnlinkedRole {
                equation,
                role,
                target,
            } => {
                write!(
                    f,
                    "equation '{equation}' links '{target}' to its {role} term \
                     but '{target}' has no definition"
                )
            }
            Self::OverlappingBoundaryCondition {
                equation,
                first,
                second,
            } => {
                write!(
                    f,
                    "equation '{equation}' has overlapping boundary conditions \
                     on '{first}' and '{second}'"
                )
            }
            Self::AlreadyDefined { class, name } => {
                write!(f, "{class} '{name}' already has a definition")
            }
            Self::RoleTargetMismatch {
                equation,
                role,
                target,
            } => {
                let wanted = if role.wants_advection_field() {
                    "an advection field"
                } else {
                    "a property"
                };
                write!(
                    f,
                    "equation '{equation}': the {role} term requires {wanted}, '{target}' is not one"
                )
            }
            Self::EntityKindMismatch {
                location,
                expected,
                found,
            } => {
                write!(
                    f,
                    "mesh location '{location}' selects {found} entities, {expected} entities required"
                )
            }
            Self::SelectionFailed { location, reason } => {
                write!(f, "could not resolve mesh location '{location}': {reason}")
            }
        }
    }
}

impl Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_entity_context() {
        let err = SetupError::UnlinkedRole {
            equation: "AdvDiff".to_string(),
            role: Role::Diffusion,
            target: "conductivity".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("AdvDiff"));
        assert!(msg.contains("diffusion"));
        assert!(msg.contains("conductivity"));
    }

    #[test]
    fn invalid_option_names_key_and_value() {
        let err = SetupError::InvalidOption {
            key: "time_theta".to_string(),
            value: "1.5".to_string(),
            reason: "must lie in [0, 1]".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("time_theta"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn role_mismatch_says_what_was_wanted() {
        let err = SetupError::RoleTargetMismatch {
            equation: "eq".to_string(),
            role: Role::Advection,
            target: "rho.cp".to_string(),
        };
        assert!(err.to_string().contains("an advection field"));
    }

    #[test]
    fn role_keywords_parse() {
        assert_eq!("time".parse::<Role>().unwrap(), Role::Time);
        assert_eq!("advection".parse::<Role>().unwrap(), Role::Advection);
        assert!(matches!(
            "convection".parse::<Role>(),
            Err(SetupError::InvalidOption { .. })
        ));
    }
}
