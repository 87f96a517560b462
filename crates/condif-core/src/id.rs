//! Strongly-typed registry identifiers.
//!
//! Every registry hands out sequential IDs in declaration order.
//! `PropertyId(n)` is the n-th property registered in a domain, and so on.
//! IDs are only meaningful for the registry that issued them.

use std::fmt;

/// Identifies a mesh location within a domain.
///
/// The four predefined locations always occupy IDs 0 through 3
/// (`cells`, `interior_faces`, `boundary_faces`, `vertices`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub u32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LocationId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a material property within a domain.
///
/// `PropertyId(0)` is always the predefined `unity` property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PropertyId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an advection field within a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdvectionId(pub u32);

impl fmt::Display for AdvectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AdvectionId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an equation within a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquationId(pub u32);

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EquationId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
