//! Advection fields and their registry.

use std::sync::Arc;

use indexmap::IndexMap;

use condif_core::{AdvectionId, EntityClass, Evaluator, Point3, SetupError, Value, ValueShape, Vector3};

/// How an advection field's velocity is obtained.
#[derive(Clone, Debug)]
pub enum AdvectionDefinition {
    /// A uniform velocity.
    Constant(Vector3),
    /// A closed-form, vector-valued function of `(time, position)`.
    Analytic(Arc<dyn Evaluator>),
}

impl AdvectionDefinition {
    /// Parse a uniform velocity from three whitespace-separated numbers.
    pub fn parse_constant(text: &str) -> Result<Self, SetupError> {
        match Value::parse(text) {
            Ok(Value::Vector(v)) => Ok(Self::Constant(v)),
            Ok(other) => Err(SetupError::ShapeMismatch {
                entity: "advection field".to_string(),
                expected: ValueShape::Vector.to_string(),
                found: other.shape().to_string(),
            }),
            Err(reason) => Err(SetupError::InvalidOption {
                key: "value".to_string(),
                value: text.trim().to_string(),
                reason,
            }),
        }
    }

    fn shape(&self) -> ValueShape {
        match self {
            Self::Constant(_) => ValueShape::Vector,
            Self::Analytic(e) => e.shape(),
        }
    }
}

/// A named transport velocity field.
#[derive(Clone, Debug)]
pub struct AdvectionField {
    id: AdvectionId,
    name: String,
    definition: Option<AdvectionDefinition>,
}

impl AdvectionField {
    /// Registry id.
    pub fn id(&self) -> AdvectionId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition, once set.
    pub fn definition(&self) -> Option<&AdvectionDefinition> {
        self.definition.as_ref()
    }

    /// Whether a definition has been set.
    pub fn is_defined(&self) -> bool {
        self.definition.is_some()
    }

    /// Velocity at `(time, x)`, `None` while undefined.
    pub fn velocity_at(&self, time: f64, x: &Point3) -> Option<Vector3> {
        match self.definition.as_ref()? {
            AdvectionDefinition::Constant(v) => Some(*v),
            AdvectionDefinition::Analytic(e) => e.evaluate(time, x).as_vector(),
        }
    }
}

/// Advection fields in declaration order.
#[derive(Clone, Debug, Default)]
pub struct AdvectionRegistry {
    fields: IndexMap<String, AdvectionField>,
}

impl AdvectionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an undefined field. Fails with `DuplicateName`.
    pub fn add(&mut self, name: &str) -> Result<AdvectionId, SetupError> {
        if self.fields.contains_key(name) {
            return Err(SetupError::DuplicateName {
                class: EntityClass::AdvectionField,
                name: name.to_string(),
            });
        }
        let id = AdvectionId(self.fields.len() as u32);
        self.fields.insert(
            name.to_string(),
            AdvectionField {
                id,
                name: name.to_string(),
                definition: None,
            },
        );
        log::debug!("registered advection field '{name}'");
        Ok(id)
    }

    /// Give a field its single, vector-valued definition.
    pub fn define(&mut self, name: &str, definition: AdvectionDefinition) -> Result<(), SetupError> {
        let field = self.fields.get_mut(name).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::AdvectionField,
            name: name.to_string(),
        })?;
        if field.definition.is_some() {
            return Err(SetupError::AlreadyDefined {
                class: EntityClass::AdvectionField,
                name: name.to_string(),
            });
        }
        if definition.shape() != ValueShape::Vector {
            return Err(SetupError::ShapeMismatch {
                entity: name.to_string(),
                expected: ValueShape::Vector.to_string(),
                found: definition.shape().to_string(),
            });
        }
        if let AdvectionDefinition::Constant(v) = &definition {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(SetupError::InvalidOption {
                    key: "value".to_string(),
                    value: format!("{v:?}"),
                    reason: format!("advection field '{name}' must have finite components"),
                });
            }
        }
        log::debug!("defined advection field '{name}'");
        field.definition = Some(definition);
        Ok(())
    }

    /// Look a field up by name.
    pub fn get(&self, name: &str) -> Result<&AdvectionField, SetupError> {
        self.fields.get(name).ok_or_else(|| SetupError::NotFound {
            class: EntityClass::AdvectionField,
            name: name.to_string(),
        })
    }

    /// Look a field up by id.
    pub fn by_id(&self, id: AdvectionId) -> Option<&AdvectionField> {
        self.fields.get_index(id.0 as usize).map(|(_, f)| f)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AdvectionField> {
        self.fields.values()
    }
}
