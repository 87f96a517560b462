//! Equations and the terms attached to them.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexSet;
use smallvec::SmallVec;

use condif_core::{
    AdvectionId, EquationId, Evaluator, LocationId, Point3, PropertyId, SetupError, Value,
    ValueShape,
};

use crate::options::{
    check_post_freq, invalid, parse_bool, parse_post_freq, EquationParams, HodgeAlgo, HodgeCoef,
    HodgeParams, Quadrature,
};

/// Boundary condition applied where no explicit one is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefaultBc {
    /// Homogeneous Dirichlet.
    ZeroValue,
    /// Homogeneous Neumann.
    ZeroFlux,
}

impl FromStr for DefaultBc {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero_value" => Ok(Self::ZeroValue),
            "zero_flux" => Ok(Self::ZeroFlux),
            other => Err(invalid("default_bc", other, "expected zero_value or zero_flux")),
        }
    }
}

impl fmt::Display for DefaultBc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroValue => write!(f, "zero_value"),
            Self::ZeroFlux => write!(f, "zero_flux"),
        }
    }
}

/// Type of a boundary condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BcType {
    /// Prescribed value.
    Dirichlet,
    /// Prescribed normal flux.
    Neumann,
    /// Mixed condition `-K∇u·n = alpha·(u - u0) + g`.
    Robin,
}

impl FromStr for BcType {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dirichlet" => Ok(Self::Dirichlet),
            "neumann" => Ok(Self::Neumann),
            "robin" => Ok(Self::Robin),
            other => Err(invalid("bc_type", other, "expected dirichlet, neumann or robin")),
        }
    }
}

impl fmt::Display for BcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dirichlet => write!(f, "dirichlet"),
            Self::Neumann => write!(f, "neumann"),
            Self::Robin => write!(f, "robin"),
        }
    }
}

/// Definition method keyword of a boundary condition or source term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionMethod {
    /// A constant value.
    Value,
    /// A closed-form function of `(time, position)`.
    Analytic,
    /// Computed by the solver driver. Source terms only.
    User,
}

impl FromStr for DefinitionMethod {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(Self::Value),
            "analytic" => Ok(Self::Analytic),
            "user" => Ok(Self::User),
            other => Err(invalid("definition", other, "expected value, analytic or user")),
        }
    }
}

impl fmt::Display for DefinitionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::Analytic => write!(f, "analytic"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Payload of a boundary condition.
#[derive(Clone, Debug)]
pub enum BcDefinition {
    /// A uniform value.
    Value(Value),
    /// A function of `(time, position)`.
    Analytic(Arc<dyn Evaluator>),
}

impl BcDefinition {
    /// Shape of the payload.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::Value(v) => v.shape(),
            Self::Analytic(e) => e.shape(),
        }
    }

    /// Definition method of the payload.
    pub fn method(&self) -> DefinitionMethod {
        match self {
            Self::Value(_) => DefinitionMethod::Value,
            Self::Analytic(_) => DefinitionMethod::Analytic,
        }
    }

    /// Payload at `(time, x)`.
    pub fn value_at(&self, time: f64, x: &Point3) -> Value {
        match self {
            Self::Value(v) => *v,
            Self::Analytic(e) => e.evaluate(time, x),
        }
    }
}

/// A boundary condition scoped to a boundary-face location.
#[derive(Clone, Debug)]
pub struct BoundaryCondition {
    /// Location the condition applies to.
    pub location: LocationId,
    /// Name of that location.
    pub location_name: String,
    /// Condition type.
    pub bc_type: BcType,
    /// Payload.
    pub definition: BcDefinition,
}

/// Payload of a source term.
#[derive(Clone, Debug)]
pub enum SourceDefinition {
    /// A uniform density.
    Value(Value),
    /// A function of `(time, position)`.
    Analytic(Arc<dyn Evaluator>),
    /// Supplied by the solver driver at assembly time.
    User,
}

impl SourceDefinition {
    /// Shape of the payload, `None` for driver-supplied terms.
    pub fn shape(&self) -> Option<ValueShape> {
        match self {
            Self::Value(v) => Some(v.shape()),
            Self::Analytic(e) => Some(e.shape()),
            Self::User => None,
        }
    }

    /// Definition method of the payload.
    pub fn method(&self) -> DefinitionMethod {
        match self {
            Self::Value(_) => DefinitionMethod::Value,
            Self::Analytic(_) => DefinitionMethod::Analytic,
            Self::User => DefinitionMethod::User,
        }
    }
}

/// A source term over a cell location.
#[derive(Clone, Debug)]
pub struct SourceTerm {
    /// Optional label, the lookup key of per-term options.
    pub label: Option<String>,
    /// Location the source is applied on.
    pub location: LocationId,
    /// Name of that location.
    pub location_name: String,
    /// Payload.
    pub definition: SourceDefinition,
    /// Integration rule. Default: `bary`.
    pub quadrature: Quadrature,
    /// Post-processing period. Default: -1 (never).
    pub post_freq: i32,
}

/// A per-source-term setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceTermOption {
    /// `post`: post-processing period.
    Post(i32),
    /// `quadrature`: integration rule.
    Quadrature(Quadrature),
}

impl SourceTermOption {
    /// Parse a `(key, value)` pair.
    pub fn parse(key: &str, value: &str) -> Result<Self, SetupError> {
        match key {
            "post" => Ok(Self::Post(parse_post_freq(key, value)?)),
            "quadrature" => Ok(Self::Quadrature(value.parse()?)),
            other => Err(invalid(other, value, "unknown source term option key")),
        }
    }

    pub(crate) fn apply(&self, term: &mut SourceTerm) -> Result<(), SetupError> {
        match *self {
            Self::Post(n) => term.post_freq = check_post_freq("post", n)?,
            Self::Quadrature(q) => term.quadrature = q,
        }
        Ok(())
    }
}

/// A zero-order term `σ·u` whose coefficient is a property.
#[derive(Clone, Debug)]
pub struct ReactionTerm {
    /// Optional label, the lookup key of per-term options.
    pub label: Option<String>,
    /// Coefficient property.
    pub property: PropertyId,
    /// Name of that property.
    pub property_name: String,
    /// Hodge operator. Default: `voronoi`.
    pub hodge: HodgeParams,
    /// Lump the mass matrix.
    pub lumping: bool,
    /// Use the inverse of the property value.
    pub invert_property: bool,
}

/// A per-reaction-term setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReactionTermOption {
    /// `hodge_algo`.
    HodgeAlgo(HodgeAlgo),
    /// `hodge_coef`.
    HodgeCoef(HodgeCoef),
    /// `lumping`.
    Lumping(bool),
    /// `inv_pty`.
    InvertProperty(bool),
}

impl ReactionTermOption {
    /// Parse a `(key, value)` pair.
    pub fn parse(key: &str, value: &str) -> Result<Self, SetupError> {
        match key {
            "hodge_algo" => Ok(Self::HodgeAlgo(value.parse()?)),
            "hodge_coef" => Ok(Self::HodgeCoef(value.parse()?)),
            "lumping" => Ok(Self::Lumping(parse_bool(key, value)?)),
            "inv_pty" => Ok(Self::InvertProperty(parse_bool(key, value)?)),
            other => Err(invalid(other, value, "unknown reaction term option key")),
        }
    }

    pub(crate) fn apply(&self, term: &mut ReactionTerm) -> Result<(), SetupError> {
        match *self {
            Self::HodgeAlgo(a) => term.hodge.algo = a,
            Self::HodgeCoef(c) => term.hodge.explicit_coef = Some(HodgeCoef::new(c.value())?),
            Self::Lumping(b) => term.lumping = b,
            Self::InvertProperty(b) => term.invert_property = b,
        }
        Ok(())
    }
}

/// A linked role target: registry id plus name for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link<I> {
    /// Registry id of the target.
    pub id: I,
    /// Name of the target.
    pub name: String,
}

/// Targets of the linked roles of an equation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Links {
    /// Property of the unsteady term.
    pub time: Option<Link<PropertyId>>,
    /// Property of the diffusion term.
    pub diffusion: Option<Link<PropertyId>>,
    /// Field of the advection term.
    pub advection: Option<Link<AdvectionId>>,
}

/// A named unknown with its terms and numerical settings.
#[derive(Clone, Debug)]
pub struct Equation {
    pub(crate) id: EquationId,
    pub(crate) name: String,
    pub(crate) field_name: String,
    pub(crate) shape: ValueShape,
    pub(crate) default_bc: DefaultBc,
    pub(crate) params: EquationParams,
    pub(crate) links: Links,
    pub(crate) boundary_conditions: SmallVec<[BoundaryCondition; 4]>,
    pub(crate) source_terms: SmallVec<[SourceTerm; 2]>,
    pub(crate) reaction_terms: SmallVec<[ReactionTerm; 2]>,
    pub(crate) source_labels_used: IndexSet<String>,
    pub(crate) reaction_labels_used: IndexSet<String>,
}

impl Equation {
    pub(crate) fn new(
        id: EquationId,
        name: &str,
        field_name: &str,
        shape: ValueShape,
        default_bc: DefaultBc,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            field_name: field_name.to_string(),
            shape,
            default_bc,
            params: EquationParams::default(),
            links: Links::default(),
            boundary_conditions: SmallVec::new(),
            source_terms: SmallVec::new(),
            reaction_terms: SmallVec::new(),
            source_labels_used: IndexSet::new(),
            reaction_labels_used: IndexSet::new(),
        }
    }

    /// Registry id.
    pub fn id(&self) -> EquationId {
        self.id
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the solved field.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Shape of the unknown.
    pub fn shape(&self) -> ValueShape {
        self.shape
    }

    /// Boundary condition where none is given.
    pub fn default_bc(&self) -> DefaultBc {
        self.default_bc
    }

    /// Numerical settings.
    pub fn params(&self) -> &EquationParams {
        &self.params
    }

    /// Linked roles.
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Boundary conditions in declaration order.
    pub fn boundary_conditions(&self) -> &[BoundaryCondition] {
        &self.boundary_conditions
    }

    /// Source terms in declaration order.
    pub fn source_terms(&self) -> &[SourceTerm] {
        &self.source_terms
    }

    /// Reaction terms in declaration order.
    pub fn reaction_terms(&self) -> &[ReactionTerm] {
        &self.reaction_terms
    }

    /// Source term with the given label.
    pub fn source_term(&self, label: &str) -> Option<&SourceTerm> {
        self.source_terms
            .iter()
            .find(|t| t.label.as_deref() == Some(label))
    }

    /// Reaction term with the given label.
    pub fn reaction_term(&self, label: &str) -> Option<&ReactionTerm> {
        self.reaction_terms
            .iter()
            .find(|t| t.label.as_deref() == Some(label))
    }

    /// Whether the equation has an unsteady term.
    pub fn is_unsteady(&self) -> bool {
        self.links.time.is_some()
    }

    /// Labels that per-term options were addressed to.
    pub fn referenced_source_labels(&self) -> impl Iterator<Item = &str> {
        self.source_labels_used.iter().map(String::as_str)
    }

    /// Labels that per-reaction-term options were addressed to.
    pub fn referenced_reaction_labels(&self) -> impl Iterator<Item = &str> {
        self.reaction_labels_used.iter().map(String::as_str)
    }
}
