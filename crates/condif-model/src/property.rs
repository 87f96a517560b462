//! Material properties and their registry.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use condif_core::{
    EntityClass, Evaluator, Law, Point3, PropertyId, SetupError, Tensor3, Value, ValueShape,
};

/// Name of the predefined isotropic property equal to 1 everywhere.
pub const UNITY: &str = "unity";

/// Anisotropy class of a property, fixing the shape of its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// One scalar, expanded to `s·I`.
    Isotropic,
    /// Three diagonal entries.
    Orthotropic,
    /// A full symmetric 3×3 tensor.
    Anisotropic,
}

impl PropertyKind {
    /// Shape every value of this kind must have.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Isotropic => ValueShape::Scalar,
            Self::Orthotropic => ValueShape::Vector,
            Self::Anisotropic => ValueShape::Tensor,
        }
    }
}

impl FromStr for PropertyKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "isotropic" => Ok(Self::Isotropic),
            "orthotropic" => Ok(Self::Orthotropic),
            "anisotropic" => Ok(Self::Anisotropic),
            other => Err(SetupError::InvalidOption {
                key: "property_kind".to_string(),
                value: other.to_string(),
                reason: "expected isotropic, orthotropic or anisotropic".to_string(),
            }),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isotropic => write!(f, "isotropic"),
            Self::Orthotropic => write!(f, "orthotropic"),
            Self::Anisotropic => write!(f, "anisotropic"),
        }
    }
}

/// How a property's values are obtained.
#[derive(Clone, Debug)]
pub enum PropertyDefinition {
    /// A uniform, constant value.
    Constant(Value),
    /// A closed-form function of `(time, position)`.
    Analytic(Arc<dyn Evaluator>),
    /// A function of `(time, position)` and solver state.
    Law(Arc<dyn Law>),
}

impl PropertyDefinition {
    /// Parse a constant from whitespace-separated numbers and check it
    /// against `kind`.
    pub fn parse_constant(kind: PropertyKind, text: &str) -> Result<Self, SetupError> {
        let value = Value::parse(text).map_err(|reason| SetupError::InvalidOption {
            key: "value".to_string(),
            value: text.trim().to_string(),
            reason,
        })?;
        if value.shape() != kind.shape() {
            return Err(SetupError::ShapeMismatch {
                entity: format!("{kind} property"),
                expected: kind.shape().to_string(),
                found: value.shape().to_string(),
            });
        }
        Ok(Self::Constant(value))
    }

    /// Shape of the values this definition produces.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Constant(v) => v.shape(),
            Self::Analytic(e) => e.shape(),
            Self::Law(l) => l.shape(),
        }
    }

    /// Definition method keyword: `value`, `analytic` or `law`.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Constant(_) => "value",
            Self::Analytic(_) => "analytic",
            Self::Law(_) => "law",
        }
    }
}

/// A named material coefficient.
#[derive(Clone, Debug)]
pub struct Property {
    id: PropertyId,
    name: String,
    kind: PropertyKind,
    definition: Option<PropertyDefinition>,
}

impl Property {
    /// Registry id.
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Anisotropy class.
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The definition, once set.
    pub fn definition(&self) -> Option<&PropertyDefinition> {
        self.definition.as_ref()
    }

    /// Whether a definition has been set.
    pub fn is_defined(&self) -> bool {
        self.definition.is_some()
    }

    /// Value at `(time, x)`. `state` is read only by laws.
    ///
    /// `None` while undefined.
    pub fn value_at(&self, time: f64, x: &Point3, state: &[f64]) -> Option<Value> {
        Some(match self.definition.as_ref()? {
            PropertyDefinition::Constant(v) => *v,
            PropertyDefinition::Analytic(e) => e.evaluate(time, x),
            PropertyDefinition::Law(l) => l.evaluate(time, x, state),
        })
    }

    /// Value at `(time, x)` expanded to a full 3×3 tensor.
    pub fn tensor_at(&self, time: f64, x: &Point3, state: &[f64]) -> Option<Tensor3> {
        self.value_at(time, x, state).map(|v| v.to_tensor())
    }
}

/// Properties in declaration order.
///
/// `PropertyId(0)` is always [`UNITY`], isotropic and defined as 1.
#[derive(Clone, Debug)]
pub struct PropertyRegistry {
    properties: IndexMap<String, Property>,
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyRegistry {
    /// A registry holding only `unity`.
    pub fn new() -> Self {
        let mut properties = IndexMap::new();
        properties.insert(
            UNITY.to_string(),
            Property {
                id: PropertyId(0),
                name: UNITY.to_string(),
                kind: PropertyKind::Isotropic,
                definition: Some(PropertyDefinition::Constant(Value::Scalar(1.0))),
            },
        );
        Self { properties }
    }

    /// Register an undefined property. Fails with `DuplicateName`.
    pub fn add(&mut self, name: &str, kind: PropertyKind) -> Result<PropertyId, SetupError> {
        if self.properties.contains_key(name) {
            return Err(SetupError::DuplicateName {
                class: EntityClass::Property,
                name: name.to_string(),
            });
        }
        let id = PropertyId(self.properties.len() as u32);
        self.properties.insert(
            name.to_string(),
            Property {
                id,
                name: name.to_string(),
                kind,
                definition: None,
            },
        );
        log::debug!("registered {kind} property '{name}'");
        Ok(id)
    }

    /// Give a property its single definition.
    ///
    /// Fails with `NotFound` for an unknown name, `AlreadyDefined` on a
    /// second definition, `ShapeMismatch` when the definition's shape is
    /// not the kind's (or a constant tensor is not symmetric), and
    /// `InvalidOption` for a non-finite constant.
    pub fn define(&mut self, name: &str, definition: PropertyDefinition) -> Result<(), SetupError> {
        let prop = self
            .properties
            .get_mut(name)
            .ok_or_else(|| SetupError::NotFound {
                class: EntityClass::Property,
                name: name.to_string(),
            })?;
        if prop.definition.is_some() {
            return Err(SetupError::AlreadyDefined {
                class: EntityClass::Property,
                name: name.to_string(),
            });
        }
        let expected = prop.kind.shape();
        if definition.shape() != expected {
            return Err(SetupError::ShapeMismatch {
                entity: name.to_string(),
                expected: expected.to_string(),
                found: definition.shape().to_string(),
            });
        }
        if let PropertyDefinition::Constant(v) = &definition {
            if !v.is_finite() {
                return Err(SetupError::InvalidOption {
                    key: "value".to_string(),
                    value: format!("{:?}", v.components()),
                    reason: format!("property '{name}' must have finite components"),
                });
            }
            if !v.is_symmetric() {
                return Err(SetupError::ShapeMismatch {
                    entity: name.to_string(),
                    expected: "symmetric tensor".to_string(),
                    found: "asymmetric tensor".to_string(),
                });
            }
        }
        log::debug!("defined property '{name}' by {}", definition.method());
        prop.definition = Some(definition);
        Ok(())
    }

    /// Look a property up by name.
    pub fn get(&self, name: &str) -> Result<&Property, SetupError> {
        self.properties.get(name).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::Property,
            name: name.to_string(),
        })
    }

    /// Look a property up by id.
    pub fn by_id(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get_index(id.0 as usize).map(|(_, p)| p)
    }

    /// Number of properties, `unity` included.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Always false: `unity` is never absent.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }
}
