//! Errors for the household block (backward iteration, distribution
//! propagation, and aggregation).
//!
//! Non-convergence of either inner loop is an error, never a silently stale
//! result: the variants carry the iteration cap and the last sup-norm change
//! so the caller can see how close the loop came.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyRuntimeError};

/// Result alias for household-block operations.
pub type HouseholdResult<T> = Result<T, HouseholdError>;

/// Failure modes of the household solver and simulator.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseholdError {
    // ---- Convergence ----
    /// Backward iteration hit `max_iter_solve` before the policy settled.
    SolveNotConverged { iterations: usize, diff: f64, tol: f64 },

    /// Distribution propagation hit `max_iter_simulate` before settling.
    SimulateNotConverged { iterations: usize, diff: f64, tol: f64 },

    /// The intratemporal consumption/labor condition could not be solved.
    IntratemporalNotConverged { cash: f64, residual: f64 },

    // ---- Numerical ----
    /// A policy or marginal value became NaN/±inf.
    NonFiniteValue { stage: &'static str, fix: usize, z: usize, a: usize, value: f64 },

    /// A price handed to the household block is outside its domain.
    InvalidPrice { name: &'static str, value: f64, reason: &'static str },

    /// Total distribution mass drifted away from one.
    MassNotConserved { mass: f64 },
}

impl std::error::Error for HouseholdError {}

impl std::fmt::Display for HouseholdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Convergence ----
            HouseholdError::SolveNotConverged { iterations, diff, tol } => {
                write!(
                    f,
                    "Household problem not solved after {iterations} iterations: \
                     policy change {diff:e} > tol {tol:e}"
                )
            }
            HouseholdError::SimulateNotConverged { iterations, diff, tol } => {
                write!(
                    f,
                    "Household distribution not converged after {iterations} iterations: \
                     change {diff:e} > tol {tol:e}"
                )
            }
            HouseholdError::IntratemporalNotConverged { cash, residual } => {
                write!(
                    f,
                    "Intratemporal condition unsolved for cash-on-hand {cash}: residual {residual:e}"
                )
            }

            // ---- Numerical ----
            HouseholdError::NonFiniteValue { stage, fix, z, a, value } => {
                write!(f, "Non-finite {stage} at (fix={fix}, z={z}, a={a}): {value}")
            }
            HouseholdError::InvalidPrice { name, value, reason } => {
                write!(f, "Invalid household price {name} = {value}: {reason}")
            }
            HouseholdError::MassNotConserved { mass } => {
                write!(f, "Distribution mass not conserved: total mass {mass}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<HouseholdError> for PyErr {
    fn from(err: HouseholdError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
