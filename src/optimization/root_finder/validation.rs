//! Validation helpers for the root finder.
//!
//! - **Tolerance checks**: [`verify_tol_residual`], [`verify_tol_x`].
//! - **Residual checks**: [`validate_residuals`] enforces dimension and
//!   finiteness at points where a residual must exist (the start point).
//! - **Jacobian checks**: [`validate_jacobian`].
//! - **Solutions**: [`validate_x_hat`] ensures a best point exists and is
//!   finite.
use crate::optimization::{
    errors::{OptError, OptResult},
    root_finder::types::{Jacobian, Point, Residuals},
};

/// Validate the residual tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolResidual`] if `tol` is non-finite or ≤ 0.
pub fn verify_tol_residual(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTolResidual { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTolResidual { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate the step (x) tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolX`] if `tol` is non-finite or ≤ 0.
pub fn verify_tol_x(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidTolX { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidTolX { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate a residual vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::DimMismatch`] if `f.len() != dim`.
/// - [`OptError::NonFiniteResidual`] for the first NaN/±inf entry.
pub fn validate_residuals(f: &Residuals, dim: usize) -> OptResult<()> {
    if f.len() != dim {
        return Err(OptError::DimMismatch { expected: dim, found: f.len() });
    }
    if let Some((index, &value)) = f.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::NonFiniteResidual { index, value });
    }
    Ok(())
}

/// Validate a Jacobian for shape `dim × dim` and finite entries.
///
/// # Errors
/// - [`OptError::DimMismatch`] if the matrix is not `dim × dim`.
/// - [`OptError::InvalidJacobian`] for the first non-finite entry.
pub fn validate_jacobian(jac: &Jacobian, dim: usize) -> OptResult<()> {
    let (rows, cols) = jac.dim();
    if rows != dim || cols != dim {
        return Err(OptError::DimMismatch { expected: dim, found: rows.max(cols) });
    }
    if let Some(((row, col), &value)) = jac.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidJacobian { row, col, value });
    }
    Ok(())
}

/// Ensure the solver produced a finite best point.
///
/// # Errors
/// - [`OptError::MissingInitialGuess`] if `x_hat` is `None`.
/// - [`OptError::NonFiniteSolution`] if a coordinate is not finite.
pub fn validate_x_hat(x_hat: Option<Point>) -> OptResult<Point> {
    let x_hat = x_hat.ok_or(OptError::MissingInitialGuess)?;
    if let Some((index, &value)) = x_hat.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::NonFiniteSolution { index, value });
    }
    Ok(x_hat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and positive.
    //
    // Given
    // -----
    // - tol in {0, -1, NaN, 1e-8}.
    //
    // Expect
    // ------
    // - Only 1e-8 is accepted.
    fn tolerances_must_be_positive_and_finite() {
        for bad in [0.0, -1.0, f64::NAN] {
            assert!(verify_tol_residual(bad).is_err());
            assert!(verify_tol_x(bad).is_err());
        }
        assert!(verify_tol_residual(1e-8).is_ok());
        assert!(verify_tol_x(1e-8).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Residual and Jacobian checks report the first offending entry.
    //
    // Given
    // -----
    // - f = [0, NaN, 1]; a 2×2 Jacobian with +inf at (1, 0).
    //
    // Expect
    // ------
    // - NonFiniteResidual { index: 1 } and InvalidJacobian { row: 1, col: 0 }.
    fn checks_report_first_offending_entry() {
        let f = array![0.0, f64::NAN, 1.0];
        let mut jac = Array2::<f64>::eye(2);
        jac[[1, 0]] = f64::INFINITY;

        assert!(matches!(validate_residuals(&f, 3), Err(OptError::NonFiniteResidual { index: 1, .. })));
        assert!(matches!(
            validate_jacobian(&jac, 2),
            Err(OptError::InvalidJacobian { row: 1, col: 0, .. })
        ));
        assert_eq!(validate_residuals(&f, 2), Err(OptError::DimMismatch { expected: 2, found: 3 }));
    }
}
