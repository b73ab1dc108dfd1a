//! Errors for the root-finding layer.
//!
//! [`OptError`] covers configuration mistakes in [`RootOptions`], numerical
//! failures inside the hybrid solver (non-finite residuals or Jacobians,
//! singular steps), and normalized `argmin` backend errors.
//!
//! [`RootOptions`]: crate::optimization::root_finder::RootOptions
use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for root-finder operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- RootOptions ----
    /// Residual tolerance needs to be positive and finite.
    InvalidTolResidual { tol: f64, reason: &'static str },
    /// Step (x) tolerance needs to be positive and finite.
    InvalidTolX { tol: f64, reason: &'static str },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    /// Initial trust-region factor needs to be positive and finite.
    InvalidTrustFactor { factor: f64, reason: &'static str },
    /// Finite-difference step needs to be positive and finite.
    InvalidFdStep { step: f64, reason: &'static str },

    // ---- Residual function ----
    /// Residual vector length does not match the unknowns.
    DimMismatch { expected: usize, found: usize },
    /// Residuals at the starting point are not finite.
    NonFiniteResidual { index: usize, value: f64 },

    // ---- Jacobian ----
    /// Neither a forward nor a backward step gave finite residuals.
    JacobianStepFailed { column: usize },
    /// Jacobian entry is not finite.
    InvalidJacobian { row: usize, col: usize, value: f64 },

    // ---- Solver state ----
    /// Solver was run without an initial parameter vector.
    MissingInitialGuess,

    /// Solver finished without a finite best point.
    NonFiniteSolution { index: usize, value: f64 },

    // ---- argmin backend ----
    /// An `argmin::core::ArgminError`, tagged with its kind.
    Backend { kind: &'static str, text: String },
    /// Any other error carried through `argmin::core::Error`.
    External { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- RootOptions ----
            OptError::InvalidTolResidual { tol, reason } => {
                write!(f, "Invalid residual tolerance {tol}: {reason}")
            }
            OptError::InvalidTolX { tol, reason } => {
                write!(f, "Invalid step tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::InvalidTrustFactor { factor, reason } => {
                write!(f, "Invalid trust-region factor {factor}: {reason}")
            }
            OptError::InvalidFdStep { step, reason } => {
                write!(f, "Invalid finite-difference step {step}: {reason}")
            }

            // ---- Residual function ----
            OptError::DimMismatch { expected, found } => {
                write!(f, "Residual dimension mismatch: expected {expected}, found {found}")
            }
            OptError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite residual at index {index}: {value}")
            }

            // ---- Jacobian ----
            OptError::JacobianStepFailed { column } => {
                write!(f, "Finite-difference step failed in both directions for column {column}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Solver state ----
            OptError::MissingInitialGuess => {
                write!(f, "Root finder started without an initial guess")
            }
            OptError::NonFiniteSolution { index, value } => {
                write!(f, "Solution coordinate {index} is not finite: {value}")
            }

            // ---- argmin backend ----
            OptError::Backend { kind, text } => write!(f, "argmin {kind}: {text}"),
            OptError::External { text } => write!(f, "{text}"),

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let argmin_err = match err.downcast::<ArgminError>() {
            Ok(argmin_err) => argmin_err,
            Err(err) => return OptError::External { text: err.to_string() },
        };
        let (kind, text) = match argmin_err {
            ArgminError::InvalidParameter { text } => ("invalid parameter", text),
            ArgminError::NotImplemented { text } => ("not implemented", text),
            ArgminError::NotInitialized { text } => ("not initialized", text),
            ArgminError::ConditionViolated { text } => ("condition violated", text),
            ArgminError::CheckpointNotFound { text } => ("checkpoint not found", text),
            ArgminError::PotentialBug { text } => ("potential bug", text),
            ArgminError::ImpossibleError { text } => ("impossible error", text),
            _ => return OptError::UnknownError,
        };
        OptError::Backend { kind, text }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside the solver survives the trip through
    // `argmin::core::Error` unchanged.
    //
    // Given
    // -----
    // - `OptError::JacobianStepFailed { column: 2 }` converted into an argmin error.
    //
    // Expect
    // ------
    // - Converting back yields the identical variant.
    fn opt_error_round_trips_through_argmin_error() {
        // Arrange
        let err: Error = OptError::JacobianStepFailed { column: 2 }.into();

        // Act
        let back = OptError::from(err);

        // Assert
        assert_eq!(back, OptError::JacobianStepFailed { column: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Native argmin errors keep their kind and message.
    //
    // Given
    // -----
    // - `ArgminError::NotInitialized` with a message.
    //
    // Expect
    // ------
    // - `OptError::Backend` tagged "not initialized", carrying the same text.
    fn argmin_errors_map_to_backend_variant() {
        let err: Error = ArgminError::NotInitialized { text: "no param".to_string() }.into();

        assert_eq!(
            OptError::from(err),
            OptError::Backend { kind: "not initialized", text: "no param".to_string() }
        );
    }
}
