//! Errors for model configuration and the steady-state search.
//!
//! This module defines [`ParamError`] for ill-posed [`Par`] values and
//! [`ModelError`], the single error surface of `prepare_hh_ss`, the
//! equilibrium evaluator, and `find_ss`.
//!
//! ## Conventions
//! - Domain violations name the offending quantity (`"Q"`, `"Z_L"`,
//!   `"cost_share_N"`, ...) using the model's variable names.
//! - Household and root-finder errors are wrapped, not flattened, so the
//!   inner cause stays inspectable.
//! - A `ModelError` sent through `argmin` as `argmin::core::Error` is
//!   recovered by downcast in `From<argmin::core::Error>`.
//!
//! [`Par`]: crate::model::params::Par
use argmin::core::Error;
#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyRuntimeError, PyValueError},
};

use crate::{grids::errors::GridError, household::errors::HouseholdError, optimization::errors::OptError};

/// Result alias for parameter validation.
pub type ParamResult<T> = Result<T, ParamError>;

/// Result alias for model-level operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Invalid model configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A scalar parameter is outside its admissible range.
    InvalidValue { name: &'static str, value: f64, reason: &'static str },

    /// A count (grid size, horizon, number of types) is too small.
    InvalidCount { name: &'static str, value: usize, reason: &'static str },

    /// Asset grid bounds are not ordered.
    InvalidAssetBounds { a_min: f64, a_max: f64 },

    /// A tolerance is not positive and finite.
    InvalidTolerance { name: &'static str, tol: f64 },

    /// An iteration cap is zero.
    InvalidMaxIter { name: &'static str, max_iter: usize },

    /// Overrides could not be parsed into parameters.
    Parse { text: String },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::InvalidValue { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            ParamError::InvalidCount { name, value, reason } => {
                write!(f, "Invalid {name} = {value}: {reason}")
            }
            ParamError::InvalidAssetBounds { a_min, a_max } => {
                write!(f, "Invalid asset bounds: a_min = {a_min} must be below a_max = {a_max}")
            }
            ParamError::InvalidTolerance { name, tol } => {
                write!(f, "Invalid tolerance {name} = {tol}: must be finite and > 0")
            }
            ParamError::InvalidMaxIter { name, max_iter } => {
                write!(f, "Invalid iteration cap {name} = {max_iter}: must be positive")
            }
            ParamError::Parse { text } => {
                write!(f, "Could not parse parameters: {text}")
            }
        }
    }
}

impl From<serde_json::Error> for ParamError {
    fn from(err: serde_json::Error) -> Self {
        ParamError::Parse { text: err.to_string() }
    }
}

/// Error surface of the steady-state machinery.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Configuration ----
    Param(ParamError),
    Grid(GridError),

    // ---- Evaluation ----
    /// A closed-form equation would leave its valid domain.
    DomainViolation { variable: &'static str, value: f64 },

    /// The trial unknowns vector has the wrong length or a non-finite entry.
    InvalidUnknowns { index: usize, value: f64, reason: &'static str },

    /// `find_ss` or the evaluator was called before `prepare_hh_ss`.
    NotPrepared,

    // ---- Inner and outer loops ----
    Household(HouseholdError),
    Opt(OptError),

    /// The root search ended without all residuals inside the tolerance.
    RootNotConverged { max_abs_residual: f64, tol: f64, iterations: u64, status: String },
}

impl ModelError {
    /// Whether this error marks a trial point outside the model's domain
    /// (as opposed to a configuration or convergence failure).
    pub fn is_domain_violation(&self) -> bool {
        matches!(self, ModelError::DomainViolation { .. })
    }
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            ModelError::Param(err) => write!(f, "{err}"),
            ModelError::Grid(err) => write!(f, "{err}"),

            // ---- Evaluation ----
            ModelError::DomainViolation { variable, value } => {
                write!(f, "Domain violation: {variable} = {value} is outside its valid range")
            }
            ModelError::InvalidUnknowns { index, value, reason } => {
                write!(f, "Invalid unknown at index {index}: {value}: {reason}")
            }
            ModelError::NotPrepared => {
                write!(f, "Household block not prepared; call prepare_hh_ss first")
            }

            // ---- Inner and outer loops ----
            ModelError::Household(err) => write!(f, "{err}"),
            ModelError::Opt(err) => write!(f, "{err}"),
            ModelError::RootNotConverged { max_abs_residual, tol, iterations, status } => {
                write!(
                    f,
                    "Steady state not found after {iterations} iterations ({status}): \
                     max |residual| = {max_abs_residual:e} > tol {tol:e}"
                )
            }
        }
    }
}

impl From<ParamError> for ModelError {
    fn from(err: ParamError) -> Self {
        ModelError::Param(err)
    }
}

impl From<GridError> for ModelError {
    fn from(err: GridError) -> Self {
        ModelError::Grid(err)
    }
}

impl From<HouseholdError> for ModelError {
    fn from(err: HouseholdError) -> Self {
        ModelError::Household(err)
    }
}

impl From<OptError> for ModelError {
    fn from(err: OptError) -> Self {
        ModelError::Opt(err)
    }
}

impl From<Error> for ModelError {
    fn from(err: Error) -> Self {
        match err.downcast::<ModelError>() {
            Ok(model_err) => model_err,
            Err(err) => ModelError::Opt(OptError::from(err)),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        match err {
            ModelError::Household(_) | ModelError::RootNotConverged { .. } => {
                PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
