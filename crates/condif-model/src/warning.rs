//! Non-fatal setup diagnostics.

use std::fmt;

use condif_core::{EntityClass, Role};

/// A configuration that is accepted but probably not what was meant.
///
/// Each warning is also emitted through `log::warn!` when it is recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum SetupWarning {
    /// A role was linked again; the later link replaced the earlier one.
    Relinked {
        /// Equation owning the role.
        equation: String,
        /// The relinked role.
        role: Role,
        /// Target that was replaced.
        previous: String,
        /// Target now linked.
        current: String,
    },
    /// An option was set that the current configuration never reads.
    IneffectiveOption {
        /// Equation the option belongs to.
        equation: String,
        /// Option key.
        key: String,
        /// Why the option has no effect.
        reason: String,
    },
    /// A property or advection field was registered but never defined or
    /// linked.
    UnusedUndefined {
        /// Namespace of the entity.
        class: EntityClass,
        /// Entity name.
        name: String,
    },
}

impl SetupWarning {
    /// Emit through the `log` facade.
    pub fn log(&self) {
        log::warn!("{self}");
    }
}

impl fmt::Display for SetupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relinked {
                equation,
                role,
                previous,
                current,
            } => write!(
                f,
                "equation '{equation}': {role} term relinked from '{previous}' to '{current}'"
            ),
            Self::IneffectiveOption {
                equation,
                key,
                reason,
            } => write!(f, "equation '{equation}': option '{key}' has no effect ({reason})"),
            Self::UnusedUndefined { class, name } => {
                write!(f, "{class} '{name}' is never defined nor linked")
            }
        }
    }
}
