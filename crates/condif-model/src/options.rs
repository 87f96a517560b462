//! Closed option enumerations for equation numerics.
//!
//! Every concern is its own type with a `FromStr` impl accepting the
//! configuration keywords and a `Display` impl printing the canonical one.
//! [`OptionKey`] and [`EquationOption`] carry the string-keyed surface: a
//! key parses first, then its value parses into the matching typed variant.

use std::fmt;
use std::str::FromStr;

use condif_core::SetupError;

use crate::warning::SetupWarning;

pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> SetupError {
    SetupError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, SetupError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

pub(crate) fn parse_post_freq(key: &str, value: &str) -> Result<i32, SetupError> {
    let n: i32 = value
        .parse()
        .map_err(|_| invalid(key, value, "expected an integer"))?;
    check_post_freq(key, n)
}

pub(crate) fn check_post_freq(key: &str, n: i32) -> Result<i32, SetupError> {
    if n < -1 {
        return Err(invalid(
            key,
            &n.to_string(),
            "must be -1 (never), 0 (initial state) or a positive period",
        ));
    }
    Ok(n)
}

// ── Space discretization ────────────────────────────────────────

/// Space discretization scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpaceScheme {
    /// CDO vertex-based scheme.
    #[default]
    VertexBased,
    /// CDO face-based scheme.
    FaceBased,
}

impl FromStr for SpaceScheme {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cdo_vb" | "vertex_based" => Ok(Self::VertexBased),
            "cdo_fb" | "face_based" => Ok(Self::FaceBased),
            other => Err(invalid("space_scheme", other, "expected cdo_vb or cdo_fb")),
        }
    }
}

impl fmt::Display for SpaceScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexBased => write!(f, "cdo_vb"),
            Self::FaceBased => write!(f, "cdo_fb"),
        }
    }
}

// ── Discrete Hodge operators ─────────────────────────────────────

/// Construction of a discrete Hodge operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HodgeAlgo {
    /// Diagonal operator, consistent on orthogonal meshes only.
    Voronoi,
    /// Consistency plus stabilization; requires a [`HodgeCoef`].
    Cost,
    /// Whitney barycentric subdivision.
    WhitneyBary,
}

impl FromStr for HodgeAlgo {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voronoi" => Ok(Self::Voronoi),
            "cost" => Ok(Self::Cost),
            "wbs" | "whitney_bary" => Ok(Self::WhitneyBary),
            other => Err(invalid("hodge_algo", other, "expected voronoi, cost or wbs")),
        }
    }
}

impl fmt::Display for HodgeAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voronoi => write!(f, "voronoi"),
            Self::Cost => write!(f, "cost"),
            Self::WhitneyBary => write!(f, "wbs"),
        }
    }
}

/// Stabilization coefficient of the `cost` Hodge algorithm.
///
/// Always strictly positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HodgeCoef(f64);

impl HodgeCoef {
    /// The DGA coefficient, 1/3.
    pub const DGA: Self = Self(1.0 / 3.0);
    /// The SUSHI coefficient, 1/√3.
    pub const SUSHI: Self = Self(0.577_350_269_189_625_8);
    /// The GCR coefficient, 1.
    pub const GCR: Self = Self(1.0);

    /// A numeric coefficient. Fails unless `value` is finite and positive.
    pub fn new(value: f64) -> Result<Self, SetupError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(
                "hodge_coef",
                &value.to_string(),
                "must be strictly positive and finite",
            ));
        }
        Ok(Self(value))
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for HodgeCoef {
    fn default() -> Self {
        Self::DGA
    }
}

impl FromStr for HodgeCoef {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dga" => Ok(Self::DGA),
            "sushi" => Ok(Self::SUSHI),
            "gcr" => Ok(Self::GCR),
            other => {
                let v: f64 = other.parse().map_err(|_| {
                    invalid("hodge_coef", other, "expected dga, sushi, gcr or a positive number")
                })?;
                Self::new(v)
            }
        }
    }
}

impl fmt::Display for HodgeCoef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::DGA {
            write!(f, "dga")
        } else if *self == Self::SUSHI {
            write!(f, "sushi")
        } else if *self == Self::GCR {
            write!(f, "gcr")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Settings of one discrete Hodge operator.
///
/// `coef` is `None` until set explicitly; [`coef`](Self::coef) then
/// reports the DGA default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HodgeParams {
    /// Construction algorithm.
    pub algo: HodgeAlgo,
    /// Explicitly set `cost` coefficient.
    pub explicit_coef: Option<HodgeCoef>,
}

impl HodgeParams {
    /// Default for diffusion terms: `cost` with the DGA coefficient.
    pub const DIFFUSION: Self = Self {
        algo: HodgeAlgo::Cost,
        explicit_coef: None,
    };
    /// Default for time and reaction terms: `voronoi`.
    pub const MASS: Self = Self {
        algo: HodgeAlgo::Voronoi,
        explicit_coef: None,
    };

    /// Effective `cost` coefficient.
    pub fn coef(&self) -> HodgeCoef {
        self.explicit_coef.unwrap_or_default()
    }

    /// Whether a coefficient was set that the algorithm will not read.
    pub fn has_ineffective_coef(&self) -> bool {
        self.explicit_coef.is_some() && self.algo != HodgeAlgo::Cost
    }
}

// ── Linear solver ───────────────────────────────────────────────

/// Linear-algebra backend family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SolverFamily {
    /// Built-in solvers.
    #[default]
    Native,
    /// PETSc solvers.
    Petsc,
}

impl FromStr for SolverFamily {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cs" => Ok(Self::Native),
            "petsc" => Ok(Self::Petsc),
            "newton" => Err(invalid("solver_family", s, "the newton family is not supported")),
            other => Err(invalid("solver_family", other, "expected cs or petsc")),
        }
    }
}

impl fmt::Display for SolverFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "cs"),
            Self::Petsc => write!(f, "petsc"),
        }
    }
}

/// Iterative linear solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IterativeMethod {
    /// Conjugate gradient.
    #[default]
    Cg,
    /// BiCGStab2, for non-symmetric systems.
    BiCg,
    /// Restarted GMRES.
    Gmres,
    /// Algebraic multigrid.
    Amg,
}

impl FromStr for IterativeMethod {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cg" => Ok(Self::Cg),
            "bicg" => Ok(Self::BiCg),
            "gmres" => Ok(Self::Gmres),
            "amg" => Ok(Self::Amg),
            other => Err(invalid("itsol", other, "expected cg, bicg, gmres or amg")),
        }
    }
}

impl fmt::Display for IterativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cg => write!(f, "cg"),
            Self::BiCg => write!(f, "bicg"),
            Self::Gmres => write!(f, "gmres"),
            Self::Amg => write!(f, "amg"),
        }
    }
}

/// Preconditioner of the iterative solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Preconditioner {
    /// Diagonal scaling.
    #[default]
    Jacobi,
    /// Neumann polynomial of order 1.
    Poly1,
    /// Symmetric successive over-relaxation. PETSc only.
    Ssor,
    /// Incomplete LU factorization.
    Ilu0,
    /// Incomplete Cholesky factorization.
    Icc0,
    /// Algebraic multigrid.
    Amg,
    /// Additive Schwarz.
    AdditiveSchwarz,
}

impl Preconditioner {
    /// Whether this preconditioner needs the PETSc family.
    pub fn requires_petsc(&self) -> bool {
        matches!(self, Self::Ssor)
    }
}

impl FromStr for Preconditioner {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jacobi" => Ok(Self::Jacobi),
            "poly1" => Ok(Self::Poly1),
            "ssor" => Ok(Self::Ssor),
            "ilu0" => Ok(Self::Ilu0),
            "icc0" => Ok(Self::Icc0),
            "amg" => Ok(Self::Amg),
            "as" => Ok(Self::AdditiveSchwarz),
            other => Err(invalid(
                "precond",
                other,
                "expected jacobi, poly1, ssor, ilu0, icc0, amg or as",
            )),
        }
    }
}

impl fmt::Display for Preconditioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jacobi => write!(f, "jacobi"),
            Self::Poly1 => write!(f, "poly1"),
            Self::Ssor => write!(f, "ssor"),
            Self::Ilu0 => write!(f, "ilu0"),
            Self::Icc0 => write!(f, "icc0"),
            Self::Amg => write!(f, "amg"),
            Self::AdditiveSchwarz => write!(f, "as"),
        }
    }
}

/// Linear solver settings of one equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverParams {
    /// Backend family. Default: `cs`.
    pub family: SolverFamily,
    /// Iterative method. Default: `cg`.
    pub method: IterativeMethod,
    /// Preconditioner. Default: `jacobi`.
    pub precond: Preconditioner,
    /// Iteration cap. Default: 2500.
    pub max_iter: u32,
    /// Convergence tolerance. Default: 1e-12.
    pub eps: f64,
    /// Normalize the residual before the convergence test. Default: true.
    pub resnorm: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            family: SolverFamily::Native,
            method: IterativeMethod::Cg,
            precond: Preconditioner::Jacobi,
            max_iter: 2500,
            eps: 1e-12,
            resnorm: true,
        }
    }
}

// ── Boundary conditions and quadrature ──────────────────────────

/// How Dirichlet conditions are imposed on the linear system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BcEnforcement {
    /// Remove the constrained unknowns.
    #[default]
    Strong,
    /// Weak enforcement by a large penalty coefficient.
    Penalization,
    /// Nitsche's method.
    WeakNitsche,
    /// Symmetric Nitsche's method.
    WeakSymNitsche,
}

impl FromStr for BcEnforcement {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(Self::Strong),
            "penalization" => Ok(Self::Penalization),
            "weak" | "nitsche" | "weak_nitsche" => Ok(Self::WeakNitsche),
            "weak_sym" | "sym_nitsche" | "weak_sym_nitsche" => Ok(Self::WeakSymNitsche),
            other => Err(invalid(
                "bc_enforcement",
                other,
                "expected strong, penalization, weak or weak_sym",
            )),
        }
    }
}

impl fmt::Display for BcEnforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => write!(f, "strong"),
            Self::Penalization => write!(f, "penalization"),
            Self::WeakNitsche => write!(f, "weak_nitsche"),
            Self::WeakSymNitsche => write!(f, "weak_sym_nitsche"),
        }
    }
}

/// Integration rule for analytic terms over a mesh entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Quadrature {
    /// Subdivide into tetrahedra.
    Subdiv,
    /// Barycenter approximation.
    #[default]
    Bary,
    /// Four Gauss points per tetrahedron.
    Higher,
    /// Five Gauss points per tetrahedron.
    Highest,
}

impl Quadrature {
    /// Whether the rule integrates over a tetrahedral subdivision.
    pub fn subdivides(&self) -> bool {
        !matches!(self, Self::Bary)
    }
}

impl FromStr for Quadrature {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subdiv" => Ok(Self::Subdiv),
            "bary" => Ok(Self::Bary),
            "higher" => Ok(Self::Higher),
            "highest" => Ok(Self::Highest),
            other => Err(invalid(
                "quadrature",
                other,
                "expected subdiv, bary, higher or highest",
            )),
        }
    }
}

impl fmt::Display for Quadrature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subdiv => write!(f, "subdiv"),
            Self::Bary => write!(f, "bary"),
            Self::Higher => write!(f, "higher"),
            Self::Highest => write!(f, "highest"),
        }
    }
}

// ── Time discretization ─────────────────────────────────────────

/// Time discretization scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimeScheme {
    /// Backward Euler, θ = 1.
    #[default]
    Implicit,
    /// Forward Euler, θ = 0.
    Explicit,
    /// Crank-Nicolson, θ = 1/2.
    CrankNicolson,
    /// Generic θ-scheme, θ in [0, 1].
    Theta(f64),
}

impl TimeScheme {
    /// The implicitation weight θ.
    pub fn theta(&self) -> f64 {
        match self {
            Self::Implicit => 1.0,
            Self::Explicit => 0.0,
            Self::CrankNicolson => 0.5,
            Self::Theta(t) => *t,
        }
    }

    /// A θ-scheme. Fails unless `theta` lies in [0, 1].
    pub fn with_theta(theta: f64) -> Result<Self, SetupError> {
        if !(0.0..=1.0).contains(&theta) {
            return Err(invalid("time_theta", &theta.to_string(), "must lie in [0, 1]"));
        }
        Ok(Self::Theta(theta))
    }
}

impl FromStr for TimeScheme {
    type Err = SetupError;

    /// `theta_scheme` parses to θ = 1 here. As an equation option it
    /// parses to [`EquationOption::ThetaScheme`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implicit" => Ok(Self::Implicit),
            "explicit" => Ok(Self::Explicit),
            "crank_nicolson" => Ok(Self::CrankNicolson),
            "theta_scheme" | "theta" => Ok(Self::Theta(1.0)),
            other => Err(invalid(
                "time_scheme",
                other,
                "expected implicit, explicit, crank_nicolson or theta_scheme",
            )),
        }
    }
}

impl fmt::Display for TimeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => write!(f, "implicit"),
            Self::Explicit => write!(f, "explicit"),
            Self::CrankNicolson => write!(f, "crank_nicolson"),
            Self::Theta(t) => write!(f, "theta_scheme({t})"),
        }
    }
}

// ── Post-processing and advection ───────────────────────────────

/// A derived quantity to post-process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostFlag {
    /// Cell Péclet number estimate.
    Peclet,
    /// Upwinding coefficient for the estimated Péclet number.
    UpwindCoef,
}

impl FromStr for PostFlag {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peclet" => Ok(Self::Peclet),
            "upwind_coef" => Ok(Self::UpwindCoef),
            other => Err(invalid("post", other, "expected peclet or upwind_coef")),
        }
    }
}

impl fmt::Display for PostFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peclet => write!(f, "peclet"),
            Self::UpwindCoef => write!(f, "upwind_coef"),
        }
    }
}

/// Accumulated post-processing flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostFlags {
    /// Post-process the Péclet number.
    pub peclet: bool,
    /// Post-process the upwinding coefficient.
    pub upwind_coef: bool,
}

impl PostFlags {
    /// Turn one flag on. Flags are never cleared.
    pub fn insert(&mut self, flag: PostFlag) {
        match flag {
            PostFlag::Peclet => self.peclet = true,
            PostFlag::UpwindCoef => self.upwind_coef = true,
        }
    }
}

/// Weighting of the advective flux.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AdvectionWeight {
    /// Full upwinding.
    #[default]
    Upwind,
    /// Centered weights.
    Centered,
    /// Samarskii weights.
    Samarskii,
    /// Scharfetter-Gummel weights.
    Sg,
    /// D10G5 weights.
    D10g5,
}

impl FromStr for AdvectionWeight {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upwind" => Ok(Self::Upwind),
            "centered" => Ok(Self::Centered),
            "samarskii" => Ok(Self::Samarskii),
            "sg" => Ok(Self::Sg),
            "d10g5" => Ok(Self::D10g5),
            other => Err(invalid(
                "adv_weight",
                other,
                "expected upwind, centered, samarskii, sg or d10g5",
            )),
        }
    }
}

impl fmt::Display for AdvectionWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upwind => write!(f, "upwind"),
            Self::Centered => write!(f, "centered"),
            Self::Samarskii => write!(f, "samarskii"),
            Self::Sg => write!(f, "sg"),
            Self::D10g5 => write!(f, "d10g5"),
        }
    }
}

/// Criterion evaluating the local Péclet number for the weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeightCriterion {
    /// Evaluate at the edge-face centre.
    #[default]
    Xexc,
    /// Use the advective flux.
    Flux,
}

impl FromStr for WeightCriterion {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xexc" => Ok(Self::Xexc),
            "flux" => Ok(Self::Flux),
            other => Err(invalid("adv_weight_criterion", other, "expected xexc or flux")),
        }
    }
}

impl fmt::Display for WeightCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xexc => write!(f, "xexc"),
            Self::Flux => write!(f, "flux"),
        }
    }
}

// ── Keyed option surface ────────────────────────────────────────

/// A recognised equation option key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `space_scheme`.
    SpaceScheme,
    /// `verbosity`.
    Verbosity,
    /// `hodge_diff_algo`.
    HodgeDiffAlgo,
    /// `hodge_time_algo`.
    HodgeTimeAlgo,
    /// `hodge_diff_coef`.
    HodgeDiffCoef,
    /// `hodge_time_coef`.
    HodgeTimeCoef,
    /// `solver_family`.
    SolverFamily,
    /// `itsol`.
    Itsol,
    /// `precond`.
    Precond,
    /// `itsol_max_iter`.
    ItsolMaxIter,
    /// `itsol_eps`.
    ItsolEps,
    /// `itsol_resnorm`.
    ItsolResnorm,
    /// `bc_enforcement`.
    BcEnforcement,
    /// `bc_quadrature`.
    BcQuadrature,
    /// `time_scheme`.
    TimeScheme,
    /// `time_theta`.
    TimeTheta,
    /// `post_freq`.
    PostFreq,
    /// `post`.
    Post,
    /// `adv_weight`.
    AdvWeight,
    /// `adv_weight_criterion`.
    AdvWeightCriterion,
}

impl OptionKey {
    /// Canonical keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpaceScheme => "space_scheme",
            Self::Verbosity => "verbosity",
            Self::HodgeDiffAlgo => "hodge_diff_algo",
            Self::HodgeTimeAlgo => "hodge_time_algo",
            Self::HodgeDiffCoef => "hodge_diff_coef",
            Self::HodgeTimeCoef => "hodge_time_coef",
            Self::SolverFamily => "solver_family",
            Self::Itsol => "itsol",
            Self::Precond => "precond",
            Self::ItsolMaxIter => "itsol_max_iter",
            Self::ItsolEps => "itsol_eps",
            Self::ItsolResnorm => "itsol_resnorm",
            Self::BcEnforcement => "bc_enforcement",
            Self::BcQuadrature => "bc_quadrature",
            Self::TimeScheme => "time_scheme",
            Self::TimeTheta => "time_theta",
            Self::PostFreq => "post_freq",
            Self::Post => "post",
            Self::AdvWeight => "adv_weight",
            Self::AdvWeightCriterion => "adv_weight_criterion",
        }
    }
}

impl FromStr for OptionKey {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "space_scheme" | "scheme_space" => Self::SpaceScheme,
            "verbosity" => Self::Verbosity,
            "hodge_diff_algo" => Self::HodgeDiffAlgo,
            "hodge_time_algo" => Self::HodgeTimeAlgo,
            "hodge_diff_coef" => Self::HodgeDiffCoef,
            "hodge_time_coef" => Self::HodgeTimeCoef,
            "solver_family" => Self::SolverFamily,
            "itsol" => Self::Itsol,
            "precond" => Self::Precond,
            "itsol_max_iter" => Self::ItsolMaxIter,
            "itsol_eps" => Self::ItsolEps,
            "itsol_resnorm" => Self::ItsolResnorm,
            "bc_enforcement" => Self::BcEnforcement,
            "bc_quadrature" => Self::BcQuadrature,
            "time_scheme" => Self::TimeScheme,
            "time_theta" => Self::TimeTheta,
            "post_freq" => Self::PostFreq,
            "post" => Self::Post,
            "adv_weight" => Self::AdvWeight,
            "adv_weight_criterion" => Self::AdvWeightCriterion,
            other => return Err(invalid(other, "", "unknown equation option key")),
        })
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed equation option setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EquationOption {
    /// Space discretization.
    SpaceScheme(SpaceScheme),
    /// Log verbosity of the solver core.
    Verbosity(u32),
    /// Hodge algorithm of the diffusion term.
    HodgeDiffAlgo(HodgeAlgo),
    /// Hodge algorithm of the time term.
    HodgeTimeAlgo(HodgeAlgo),
    /// `cost` coefficient of the diffusion term.
    HodgeDiffCoef(HodgeCoef),
    /// `cost` coefficient of the time term.
    HodgeTimeCoef(HodgeCoef),
    /// Linear solver family.
    SolverFamily(SolverFamily),
    /// Iterative method.
    Itsol(IterativeMethod),
    /// Preconditioner.
    Precond(Preconditioner),
    /// Iteration cap, positive.
    ItsolMaxIter(u32),
    /// Solver tolerance, positive and finite.
    ItsolEps(f64),
    /// Residual normalization.
    ItsolResnorm(bool),
    /// Boundary condition enforcement.
    BcEnforcement(BcEnforcement),
    /// Boundary condition quadrature.
    BcQuadrature(Quadrature),
    /// Time scheme. A `Theta` scheme sets its own θ.
    TimeScheme(TimeScheme),
    /// Switch to the θ-scheme, keeping the current θ. This is what the
    /// `theta_scheme` keyword parses to.
    ThetaScheme,
    /// θ of the θ-scheme, in [0, 1].
    TimeTheta(f64),
    /// Post-processing period, at least -1.
    PostFreq(i32),
    /// Post-processing flag, accumulated.
    Post(PostFlag),
    /// Advective flux weighting.
    AdvWeight(AdvectionWeight),
    /// Péclet criterion of the weighting.
    AdvWeightCriterion(WeightCriterion),
}

impl EquationOption {
    /// Parse `value` for `key`.
    pub fn parse(key: OptionKey, value: &str) -> Result<Self, SetupError> {
        let k = key.as_str();
        let opt = match key {
            OptionKey::SpaceScheme => Self::SpaceScheme(value.parse()?),
            OptionKey::Verbosity => Self::Verbosity(
                value
                    .parse()
                    .map_err(|_| invalid(k, value, "expected a non-negative integer"))?,
            ),
            OptionKey::HodgeDiffAlgo => Self::HodgeDiffAlgo(value.parse().map_err(|_| {
                invalid(k, value, "expected voronoi, cost or wbs")
            })?),
            OptionKey::HodgeTimeAlgo => Self::HodgeTimeAlgo(value.parse().map_err(|_| {
                invalid(k, value, "expected voronoi, cost or wbs")
            })?),
            OptionKey::HodgeDiffCoef => Self::HodgeDiffCoef(value.parse().map_err(|_| {
                invalid(k, value, "expected dga, sushi, gcr or a positive number")
            })?),
            OptionKey::HodgeTimeCoef => Self::HodgeTimeCoef(value.parse().map_err(|_| {
                invalid(k, value, "expected dga, sushi, gcr or a positive number")
            })?),
            OptionKey::SolverFamily => Self::SolverFamily(value.parse()?),
            OptionKey::Itsol => Self::Itsol(value.parse()?),
            OptionKey::Precond => Self::Precond(value.parse()?),
            OptionKey::ItsolMaxIter => Self::ItsolMaxIter(
                value
                    .parse()
                    .map_err(|_| invalid(k, value, "expected a positive integer"))?,
            ),
            OptionKey::ItsolEps => Self::ItsolEps(
                value
                    .parse()
                    .map_err(|_| invalid(k, value, "expected a positive real number"))?,
            ),
            OptionKey::ItsolResnorm => Self::ItsolResnorm(parse_bool(k, value)?),
            OptionKey::BcEnforcement => Self::BcEnforcement(value.parse()?),
            OptionKey::BcQuadrature => Self::BcQuadrature(value.parse().map_err(|_| {
                invalid(k, value, "expected subdiv, bary, higher or highest")
            })?),
            OptionKey::TimeScheme => match value {
                "theta_scheme" | "theta" => Self::ThetaScheme,
                _ => Self::TimeScheme(value.parse()?),
            },
            OptionKey::TimeTheta => Self::TimeTheta(
                value
                    .parse()
                    .map_err(|_| invalid(k, value, "expected a real number in [0, 1]"))?,
            ),
            OptionKey::PostFreq => Self::PostFreq(parse_post_freq(k, value)?),
            OptionKey::Post => Self::Post(value.parse()?),
            OptionKey::AdvWeight => Self::AdvWeight(value.parse()?),
            OptionKey::AdvWeightCriterion => Self::AdvWeightCriterion(value.parse()?),
        };
        opt.validate()?;
        Ok(opt)
    }

    /// The key this setting belongs to.
    pub fn key(&self) -> OptionKey {
        match self {
            Self::SpaceScheme(_) => OptionKey::SpaceScheme,
            Self::Verbosity(_) => OptionKey::Verbosity,
            Self::HodgeDiffAlgo(_) => OptionKey::HodgeDiffAlgo,
            Self::HodgeTimeAlgo(_) => OptionKey::HodgeTimeAlgo,
            Self::HodgeDiffCoef(_) => OptionKey::HodgeDiffCoef,
            Self::HodgeTimeCoef(_) => OptionKey::HodgeTimeCoef,
            Self::SolverFamily(_) => OptionKey::SolverFamily,
            Self::Itsol(_) => OptionKey::Itsol,
            Self::Precond(_) => OptionKey::Precond,
            Self::ItsolMaxIter(_) => OptionKey::ItsolMaxIter,
            Self::ItsolEps(_) => OptionKey::ItsolEps,
            Self::ItsolResnorm(_) => OptionKey::ItsolResnorm,
            Self::BcEnforcement(_) => OptionKey::BcEnforcement,
            Self::BcQuadrature(_) => OptionKey::BcQuadrature,
            Self::TimeScheme(_) | Self::ThetaScheme => OptionKey::TimeScheme,
            Self::TimeTheta(_) => OptionKey::TimeTheta,
            Self::PostFreq(_) => OptionKey::PostFreq,
            Self::Post(_) => OptionKey::Post,
            Self::AdvWeight(_) => OptionKey::AdvWeight,
            Self::AdvWeightCriterion(_) => OptionKey::AdvWeightCriterion,
        }
    }

    /// Check numeric ranges. Typed values built in code pass through here
    /// as well as parsed ones.
    pub fn validate(&self) -> Result<(), SetupError> {
        let k = self.key().as_str();
        match *self {
            Self::ItsolMaxIter(0) => Err(invalid(k, "0", "must be at least 1")),
            Self::ItsolEps(eps) if !eps.is_finite() || eps <= 0.0 => {
                Err(invalid(k, &eps.to_string(), "must be strictly positive and finite"))
            }
            Self::TimeTheta(theta) => TimeScheme::with_theta(theta).map(|_| ()),
            Self::TimeScheme(TimeScheme::Theta(theta)) => {
                TimeScheme::with_theta(theta).map(|_| ())
            }
            Self::HodgeDiffCoef(c) | Self::HodgeTimeCoef(c) => HodgeCoef::new(c.value()).map(|_| ()),
            Self::PostFreq(n) => check_post_freq(k, n).map(|_| ()),
            _ => Ok(()),
        }
    }
}

/// Numerical settings of one equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EquationParams {
    /// Space discretization. Default: vertex-based.
    pub space_scheme: SpaceScheme,
    /// Verbosity of the solver core. Default: 0.
    pub verbosity: u32,
    /// Hodge operator of the diffusion term. Default: `cost`.
    pub hodge_diffusion: HodgeParams,
    /// Hodge operator of the time term. Default: `voronoi`.
    pub hodge_time: HodgeParams,
    /// Linear solver.
    pub solver: SolverParams,
    /// Dirichlet enforcement. Default: strong.
    pub bc_enforcement: BcEnforcement,
    /// Quadrature of analytic boundary values. Default: `bary`.
    pub bc_quadrature: Quadrature,
    /// Time scheme. Default: implicit.
    pub time_scheme: TimeScheme,
    /// Post-processing period. Default: -1 (never).
    pub post_freq: i32,
    /// Accumulated post-processing flags.
    pub post: PostFlags,
    /// Advective flux weighting. Default: upwind.
    pub adv_weight: AdvectionWeight,
    /// Péclet criterion. Default: `xexc`.
    pub adv_weight_criterion: WeightCriterion,
}

impl Default for EquationParams {
    fn default() -> Self {
        Self {
            space_scheme: SpaceScheme::default(),
            verbosity: 0,
            hodge_diffusion: HodgeParams::DIFFUSION,
            hodge_time: HodgeParams::MASS,
            solver: SolverParams::default(),
            bc_enforcement: BcEnforcement::default(),
            bc_quadrature: Quadrature::default(),
            time_scheme: TimeScheme::default(),
            post_freq: -1,
            post: PostFlags::default(),
            adv_weight: AdvectionWeight::default(),
            adv_weight_criterion: WeightCriterion::default(),
        }
    }
}

impl EquationParams {
    /// Apply one validated setting. Later settings of the same key replace
    /// earlier ones, except `post` flags, which accumulate.
    ///
    /// [`EquationOption::ThetaScheme`] keeps the current θ. Returns a
    /// warning when a θ set through `time_theta` is discarded by a non-θ
    /// scheme.
    pub fn apply(
        &mut self,
        equation: &str,
        opt: EquationOption,
    ) -> Result<Option<SetupWarning>, SetupError> {
        opt.validate()?;
        let mut warning = None;
        match opt {
            EquationOption::SpaceScheme(s) => self.space_scheme = s,
            EquationOption::Verbosity(v) => self.verbosity = v,
            EquationOption::HodgeDiffAlgo(a) => self.hodge_diffusion.algo = a,
            EquationOption::HodgeTimeAlgo(a) => self.hodge_time.algo = a,
            EquationOption::HodgeDiffCoef(c) => self.hodge_diffusion.explicit_coef = Some(c),
            EquationOption::HodgeTimeCoef(c) => self.hodge_time.explicit_coef = Some(c),
            EquationOption::SolverFamily(f) => self.solver.family = f,
            EquationOption::Itsol(m) => self.solver.method = m,
            EquationOption::Precond(p) => self.solver.precond = p,
            EquationOption::ItsolMaxIter(n) => self.solver.max_iter = n,
            EquationOption::ItsolEps(e) => self.solver.eps = e,
            EquationOption::ItsolResnorm(b) => self.solver.resnorm = b,
            EquationOption::BcEnforcement(e) => self.bc_enforcement = e,
            EquationOption::BcQuadrature(q) => self.bc_quadrature = q,
            EquationOption::ThetaScheme => {
                self.time_scheme = TimeScheme::Theta(self.time_scheme.theta());
            }
            EquationOption::TimeScheme(TimeScheme::Theta(theta)) => {
                self.time_scheme = TimeScheme::Theta(theta);
            }
            EquationOption::TimeScheme(s) => {
                if let TimeScheme::Theta(theta) = self.time_scheme {
                    if theta != s.theta() {
                        warning = Some(SetupWarning::IneffectiveOption {
                            equation: equation.to_string(),
                            key: OptionKey::TimeTheta.as_str().to_string(),
                            reason: format!("θ = {theta} replaced by the {s} scheme"),
                        });
                    }
                }
                self.time_scheme = s;
            }
            EquationOption::TimeTheta(theta) => self.time_scheme = TimeScheme::Theta(theta),
            EquationOption::PostFreq(n) => self.post_freq = n,
            EquationOption::Post(flag) => self.post.insert(flag),
            EquationOption::AdvWeight(w) => self.adv_weight = w,
            EquationOption::AdvWeightCriterion(c) => self.adv_weight_criterion = c,
        }
        Ok(warning)
    }
}
