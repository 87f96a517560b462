//! Value shapes, tagged values, and mesh entity kinds.

use std::fmt;
use std::str::FromStr;

/// A position in physical space `(x, y, z)`.
pub type Point3 = [f64; 3];

/// A 3-component vector (advection velocity, gradient, orthotropic diagonal).
pub type Vector3 = [f64; 3];

/// A 3×3 tensor stored row-major.
pub type Tensor3 = [[f64; 3]; 3];

/// Relative tolerance used when checking tensor symmetry.
const SYMMETRY_TOL: f64 = 1e-12;

/// Shape of the value an entity produces at a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// One real number.
    Scalar,
    /// Three real numbers.
    Vector,
    /// A 3×3 tensor.
    Tensor,
}

impl ValueShape {
    /// Number of real components a value of this shape carries.
    pub fn components(&self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector => 3,
            Self::Tensor => 9,
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Vector => write!(f, "vector"),
            Self::Tensor => write!(f, "tensor"),
        }
    }
}

impl FromStr for ValueShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scalar" => Ok(Self::Scalar),
            "vector" => Ok(Self::Vector),
            "tensor" => Ok(Self::Tensor),
            other => Err(format!(
                "unknown value shape '{other}' (expected scalar, vector or tensor)"
            )),
        }
    }
}

/// A value produced by an evaluator, tagged with its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// A single real number.
    Scalar(f64),
    /// A 3-vector.
    Vector(Vector3),
    /// A row-major 3×3 tensor.
    Tensor(Tensor3),
}

impl Value {
    /// The shape tag of this value.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Scalar(_) => ValueShape::Scalar,
            Self::Vector(_) => ValueShape::Vector,
            Self::Tensor(_) => ValueShape::Tensor,
        }
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// The vector payload, if this is a vector.
    pub fn as_vector(&self) -> Option<Vector3> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The tensor payload, if this is a tensor.
    pub fn as_tensor(&self) -> Option<Tensor3> {
        match self {
            Self::Tensor(t) => Some(*t),
            _ => None,
        }
    }

    /// Expand to a full tensor: `s·I` for a scalar, `diag(v)` for a vector.
    pub fn to_tensor(&self) -> Tensor3 {
        match self {
            Self::Scalar(s) => [[*s, 0.0, 0.0], [0.0, *s, 0.0], [0.0, 0.0, *s]],
            Self::Vector(v) => [[v[0], 0.0, 0.0], [0.0, v[1], 0.0], [0.0, 0.0, v[2]]],
            Self::Tensor(t) => *t,
        }
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|c| c.is_finite())
    }

    /// Whether the tensor expansion of this value is symmetric.
    ///
    /// Scalars and vectors are trivially symmetric.
    pub fn is_symmetric(&self) -> bool {
        let t = match self {
            Self::Tensor(t) => t,
            _ => return true,
        };
        for i in 0..3 {
            for j in (i + 1)..3 {
                let scale = t[i][j].abs().max(t[j][i].abs()).max(1.0);
                if (t[i][j] - t[j][i]).abs() > SYMMETRY_TOL * scale {
                    return false;
                }
            }
        }
        true
    }

    /// Flat components in row-major order.
    pub fn components(&self) -> Vec<f64> {
        match self {
            Self::Scalar(s) => vec![*s],
            Self::Vector(v) => v.to_vec(),
            Self::Tensor(t) => t.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    /// Build a value from 1, 3, or 9 flat components.
    pub fn from_components(c: &[f64]) -> Option<Self> {
        match c.len() {
            1 => Some(Self::Scalar(c[0])),
            3 => Some(Self::Vector([c[0], c[1], c[2]])),
            9 => Some(Self::Tensor([
                [c[0], c[1], c[2]],
                [c[3], c[4], c[5]],
                [c[6], c[7], c[8]],
            ])),
            _ => None,
        }
    }

    /// Parse whitespace-separated numbers (newlines allowed between rows).
    ///
    /// `"1.0"` yields a scalar, `"0.5 0.1 1."` a vector, and nine numbers
    /// a row-major tensor.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut comps = Vec::with_capacity(9);
        for token in text.split_whitespace() {
            let v: f64 = token
                .parse()
                .map_err(|_| format!("'{token}' is not a real number"))?;
            if !v.is_finite() {
                return Err(format!("'{token}' is not finite"));
            }
            comps.push(v);
        }
        Self::from_components(&comps).ok_or_else(|| {
            format!(
                "expected 1, 3 or 9 numbers, got {}",
                comps.len()
            )
        })
    }
}

/// Kind of mesh entity a location selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Mesh cells.
    Cell,
    /// Faces shared by two cells.
    InteriorFace,
    /// Faces on the domain boundary.
    BoundaryFace,
    /// Mesh vertices.
    Vertex,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::InteriorFace => write!(f, "interior_face"),
            Self::BoundaryFace => write!(f, "boundary_face"),
            Self::Vertex => write!(f, "vertex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn expanded_diagonals_are_symmetric(a in -1e6f64..1e6, b in -1e6f64..1e6, c in -1e6f64..1e6) {
            prop_assert!(Value::Tensor(Value::Vector([a, b, c]).to_tensor()).is_symmetric());
            prop_assert!(Value::Tensor(Value::Scalar(a).to_tensor()).is_symmetric());
        }
    }

    #[test]
    fn scalar_expands_to_isotropic_tensor() {
        let t = Value::Scalar(2.0).to_tensor();
        assert_eq!(t, [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
    }

    #[test]
    fn vector_expands_to_diagonal_tensor() {
        let t = Value::Vector([0.5, 0.1, 1.0]).to_tensor();
        assert_eq!(t[0][0], 0.5);
        assert_eq!(t[1][1], 0.1);
        assert_eq!(t[2][2], 1.0);
        assert_eq!(t[0][1], 0.0);
    }

    #[test]
    fn parse_counts_select_shape() {
        assert_eq!(Value::parse("1.0").unwrap(), Value::Scalar(1.0));
        assert_eq!(
            Value::parse("0.5 0.1 1.").unwrap(),
            Value::Vector([0.5, 0.1, 1.0])
        );
        let t = Value::parse("1.0  0.5  0.0\n0.5  1.0  0.5\n0.0  0.5  1.0\n").unwrap();
        assert_eq!(t.shape(), ValueShape::Tensor);
        assert!(t.is_symmetric());
    }

    #[test]
    fn parse_rejects_bad_counts_and_tokens() {
        assert!(Value::parse("").is_err());
        assert!(Value::parse("1 2").is_err());
        assert!(Value::parse("1 two 3").is_err());
        assert!(Value::parse("inf").is_err());
    }

    #[test]
    fn asymmetric_tensor_detected() {
        let t = Value::Tensor([[1.0, 0.2, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(!t.is_symmetric());
    }

    #[test]
    fn shape_round_trips_through_keyword() {
        for shape in [ValueShape::Scalar, ValueShape::Vector, ValueShape::Tensor] {
            assert_eq!(shape.to_string().parse::<ValueShape>().unwrap(), shape);
        }
        assert!("matrix".parse::<ValueShape>().is_err());
    }

    #[test]
    fn components_match_shape() {
        for v in [
            Value::Scalar(1.0),
            Value::Vector([1.0; 3]),
            Value::Tensor([[1.0; 3]; 3]),
        ] {
            assert_eq!(v.components().len(), v.shape().components());
        }
    }
}
