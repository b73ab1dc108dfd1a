//! Errors for grid and Markov-chain construction.
//!
//! This module defines [`GridError`], returned by the asset-grid builder and
//! the AR(1) discretizers when their inputs are outside the region where the
//! construction is well defined.
//!
//! ## Conventions
//! - Persistence must lie strictly inside `(-1, 1)`.
//! - A chain needs at least two states and a grid at least two points.
//! - Failures of the ergodic iteration are reported with the last sup-norm
//!   change so callers can judge how far off the distribution is.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::{BinomialError, NormalError};

/// Result alias for grid and chain construction.
pub type GridResult<T> = Result<T, GridError>;

/// Error conditions raised while building grids and Markov chains.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    // ---- Asset grid ----
    /// Too few grid points requested.
    TooFewPoints { n: usize },

    /// Lower bound is not strictly below the upper bound, or a bound is non-finite.
    InvalidBounds { lower: f64, upper: f64 },

    // ---- Markov chain ----
    /// AR(1) persistence outside the open unit interval.
    InvalidPersistence { rho: f64 },

    /// Innovation standard deviation must be finite and > 0.
    InvalidStd { sigma: f64 },

    /// Too few states requested for the discretization.
    TooFewStates { n: usize },

    /// Tauchen grid width must be finite and > 0.
    InvalidWidth { width: f64 },

    /// A transition row does not sum to one or has a negative entry.
    InvalidTransitionRow { row: usize, sum: f64 },

    /// Power iteration for the stationary distribution did not settle.
    ErgodicNotConverged { iterations: usize, diff: f64 },

    /// Error reported by the `statrs` distribution constructors.
    Distribution { text: String },

    // ---- Storage ----
    /// A built grid does not fit the storage allocated for it.
    ShapeMismatch { what: &'static str, expected: usize, found: usize },
}

impl std::error::Error for GridError {}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Asset grid ----
            GridError::TooFewPoints { n } => {
                write!(f, "Grid needs at least 2 points, got {n}")
            }
            GridError::InvalidBounds { lower, upper } => {
                write!(f, "Invalid grid bounds [{lower}, {upper}]: need finite lower < upper")
            }

            // ---- Markov chain ----
            GridError::InvalidPersistence { rho } => {
                write!(f, "Invalid AR(1) persistence {rho}: must lie in (-1, 1)")
            }
            GridError::InvalidStd { sigma } => {
                write!(f, "Invalid innovation std {sigma}: must be finite and > 0")
            }
            GridError::TooFewStates { n } => {
                write!(f, "Markov chain needs at least 2 states, got {n}")
            }
            GridError::InvalidWidth { width } => {
                write!(f, "Invalid Tauchen width {width}: must be finite and > 0")
            }
            GridError::InvalidTransitionRow { row, sum } => {
                write!(f, "Transition row {row} is not a probability vector (sum = {sum})")
            }
            GridError::ErgodicNotConverged { iterations, diff } => {
                write!(
                    f,
                    "Ergodic distribution did not converge after {iterations} iterations \
                     (last change {diff:e})"
                )
            }
            GridError::Distribution { text } => {
                write!(f, "Distribution error: {text}")
            }

            // ---- Storage ----
            GridError::ShapeMismatch { what, expected, found } => {
                write!(f, "Length mismatch for {what}: expected {expected}, found {found}")
            }
        }
    }
}

impl From<BinomialError> for GridError {
    fn from(err: BinomialError) -> Self {
        GridError::Distribution { text: err.to_string() }
    }
}

impl From<NormalError> for GridError {
    fn from(err: NormalError) -> Self {
        GridError::Distribution { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GridError> for PyErr {
    fn from(err: GridError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
