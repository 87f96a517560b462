//! Geometric settings handed to the mesh quantities builder.

use std::fmt;
use std::str::FromStr;

use condif_core::SetupError;

/// How cell centers are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellCenterAlgo {
    /// Mean of the cell vertices.
    MeanVertices,
    /// Barycenter of the cell volume.
    #[default]
    Barycenter,
    /// The finite-volume kernel's own centers.
    Saturne,
    /// Centers favouring orthogonality with face normals.
    Orthogonal,
}

impl FromStr for CellCenterAlgo {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mean_vertices" => Ok(Self::MeanVertices),
            "barycenter" => Ok(Self::Barycenter),
            "saturne" => Ok(Self::Saturne),
            "orthogonal" => Ok(Self::Orthogonal),
            other => Err(SetupError::InvalidOption {
                key: "cell_center".to_string(),
                value: other.to_string(),
                reason: "expected mean_vertices, barycenter, saturne or orthogonal".to_string(),
            }),
        }
    }
}

impl fmt::Display for CellCenterAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MeanVertices => "mean_vertices",
            Self::Barycenter => "barycenter",
            Self::Saturne => "saturne",
            Self::Orthogonal => "orthogonal",
        })
    }
}
