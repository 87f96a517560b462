//! Equations the domain knows how to set up by itself.

use std::fmt;
use std::str::FromStr;

use condif_core::SetupError;

/// Name of the wall-distance equation and of its field.
pub const WALL_DISTANCE: &str = "WallDistance";

/// A predefined equation tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredefinedEquation {
    /// Distance to the nearest wall, from `-Δu = 1` with `u = 0` on walls.
    WallDistance,
}

impl PredefinedEquation {
    /// Name of the equation this tag registers.
    pub fn equation_name(&self) -> &'static str {
        match self {
            Self::WallDistance => WALL_DISTANCE,
        }
    }
}

impl FromStr for PredefinedEquation {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wall_distance" => Ok(Self::WallDistance),
            other => Err(SetupError::InvalidOption {
                key: "predefined_equation".to_string(),
                value: other.to_string(),
                reason: "expected wall_distance".to_string(),
            }),
        }
    }
}

impl fmt::Display for PredefinedEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WallDistance => "wall_distance",
        })
    }
}
