//! Physical classification of the domain boundary.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use condif_core::{EntityClass, EntityKind, LocationId, SetupError};
use condif_mesh::MeshLocation;

/// Physical nature of a boundary zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Solid wall.
    #[default]
    Wall,
    /// Inflow.
    Inlet,
    /// Outflow.
    Outlet,
    /// Symmetry plane.
    Symmetry,
}

impl BoundaryKind {
    /// Whether the kind may be used as the default for unclassified faces.
    pub fn is_valid_default(&self) -> bool {
        matches!(self, Self::Wall | Self::Symmetry)
    }
}

impl FromStr for BoundaryKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "wall" => Ok(Self::Wall),
            "inlet" => Ok(Self::Inlet),
            "outlet" => Ok(Self::Outlet),
            "symmetry" => Ok(Self::Symmetry),
            other => Err(SetupError::InvalidOption {
                key: "boundary".to_string(),
                value: other.to_string(),
                reason: "expected wall, inlet, outlet or symmetry".to_string(),
            }),
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wall => "wall",
            Self::Inlet => "inlet",
            Self::Outlet => "outlet",
            Self::Symmetry => "symmetry",
        })
    }
}

/// A classified boundary zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryZone {
    /// Location of the zone.
    pub location: LocationId,
    /// Name of that location.
    pub location_name: String,
    /// Physical kind.
    pub kind: BoundaryKind,
}

/// Default kind plus explicit per-location overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    default_kind: BoundaryKind,
    zones: IndexMap<LocationId, BoundaryZone>,
}

impl BoundaryClassification {
    /// Every face is a wall until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of faces not covered by any zone.
    pub fn default_kind(&self) -> BoundaryKind {
        self.default_kind
    }

    /// Set the default kind. Only `wall` and `symmetry` are accepted.
    pub fn set_default(&mut self, kind: BoundaryKind) -> Result<(), SetupError> {
        if !kind.is_valid_default() {
            return Err(SetupError::InvalidOption {
                key: "default_boundary".to_string(),
                value: kind.to_string(),
                reason: "the default boundary must be wall or symmetry".to_string(),
            });
        }
        self.default_kind = kind;
        Ok(())
    }

    /// Classify a boundary-face location. A location is classified once.
    pub fn add(&mut self, location: &MeshLocation, kind: BoundaryKind) -> Result<(), SetupError> {
        if location.kind() != EntityKind::BoundaryFace {
            return Err(SetupError::EntityKindMismatch {
                location: location.name().to_string(),
                expected: EntityKind::BoundaryFace,
                found: location.kind(),
            });
        }
        if self.zones.contains_key(&location.id()) {
            return Err(SetupError::DuplicateName {
                class: EntityClass::Boundary,
                name: location.name().to_string(),
            });
        }
        log::debug!("boundary zone '{}' classified as {kind}", location.name());
        self.zones.insert(
            location.id(),
            BoundaryZone {
                location: location.id(),
                location_name: location.name().to_string(),
                kind,
            },
        );
        Ok(())
    }

    /// Kind of the zone on `location`, if classified.
    pub fn kind_of(&self, location: LocationId) -> Option<BoundaryKind> {
        self.zones.get(&location).map(|z| z.kind)
    }

    /// Classified zones in declaration order.
    pub fn zones(&self) -> impl Iterator<Item = &BoundaryZone> {
        self.zones.values()
    }

    /// Zones of the given kind.
    pub fn zones_of(&self, kind: BoundaryKind) -> impl Iterator<Item = &BoundaryZone> {
        self.zones.values().filter(move |z| z.kind == kind)
    }

    pub(crate) fn zone_ids(&self) -> Vec<LocationId> {
        self.zones.keys().copied().collect()
    }
}
