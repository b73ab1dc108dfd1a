//! root_finder::finite_diff: finite-difference Jacobian with a backward
//! fallback.
//!
//! Purpose
//! -------
//! Approximate `J[i, j] = ∂f_i/∂x_j` column by column for systems that may
//! be undefined on part of the space around `x`, without exposing the
//! `finitediff` API to the rest of the root finder.
//!
//! Key behaviors
//! -------------
//! - Each column is a `finitediff` directional difference
//!   `(f(x + ε_j e_j) - f(x)) / ε_j` with `ε_j = step · max(|x_j|, 1)`.
//! - If the forward trial returns any non-finite residual (including a
//!   point flagged out of domain), the column is retried along `-e_j`.
//! - Errors raised by `eval` inside the `finitediff` closure are parked in
//!   a `closure_err` cell and returned once the difference completes.
//!
//! Invariants & assumptions
//! ------------------------
//! - `finitediff` scales the direction by `√ε`; the direction passed in is
//!   pre-scaled so the effective step is `ε_j`.
//! - The returned matrix satisfies [`validate_jacobian`].
//!
//! Conventions
//! -----------
//! - Errors other than non-finite residuals propagate; a column that fails
//!   in both directions is `OptError::JacobianStepFailed`.
use std::cell::RefCell;

use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array1;

use crate::optimization::{
    errors::OptError,
    root_finder::{
        types::{Jacobian, Point, Residuals},
        validation::validate_jacobian,
    },
};

/// Forward-difference Jacobian of `eval` at `x`, with backward fallback.
///
/// Parameters
/// ----------
/// - `x`: point of differentiation.
/// - `fx`: `eval(x)`, already computed and finite; fixes the row count.
/// - `rel_step`: relative step size (typically `√ε`).
/// - `eval`: residual function; non-finite outputs mark a failed trial.
///
/// Errors
/// ------
/// - Any error returned by `eval`.
/// - `OptError::JacobianStepFailed { column }` if both directions fail.
/// - `OptError::DimMismatch` / `OptError::InvalidJacobian` from the final
///   validation.
pub fn forward_jacobian<F>(
    x: &Point, fx: &Residuals, rel_step: f64, eval: F,
) -> Result<Jacobian, Error>
where
    F: Fn(&Point) -> Result<Residuals, Error>,
{
    let n = x.len();
    let m = fx.len();
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let func = |p: &Point| -> Residuals {
        match eval(p) {
            Ok(f) => f,
            Err(err) => {
                closure_err.borrow_mut().get_or_insert(err);
                Array1::from_elem(m, f64::NAN)
            }
        }
    };

    let mut jac = Jacobian::zeros((m, n));
    for j in 0..n {
        let scale = rel_step * x[j].abs().max(1.0) / f64::EPSILON.sqrt();
        let mut dir = Array1::zeros(n);

        dir[j] = scale;
        let fwd = directional_diff(x, &dir, &func, &closure_err)?;
        let column = if all_finite(&fwd) {
            fwd / scale
        } else {
            dir[j] = -scale;
            let bwd = directional_diff(x, &dir, &func, &closure_err)?;
            if !all_finite(&bwd) {
                return Err(OptError::JacobianStepFailed { column: j }.into());
            }
            bwd / -scale
        };
        if column.len() != m {
            return Err(OptError::DimMismatch { expected: m, found: column.len() }.into());
        }
        jac.column_mut(j).assign(&column);
    }

    validate_jacobian(&jac, n)?;
    Ok(jac)
}

/// One `finitediff` Jacobian-vector product, surfacing any parked error.
fn directional_diff<G: Fn(&Point) -> Residuals>(
    x: &Point, dir: &Point, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Residuals, Error> {
    closure_err.replace(None);
    let jvp = x.forward_jacobian_vec_prod(func, dir);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    Ok(jvp)
}

fn all_finite(f: &Residuals) -> bool {
    f.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    fn system(x: &Point) -> Result<Residuals, Error> {
        Ok(array![x[0] * x[0] + x[1], x[0] * x[1].exp()])
    }

    #[test]
    // Purpose
    // -------
    // Forward differences match the analytic Jacobian.
    //
    // Given
    // -----
    // - f(x) = [x0² + x1, x0 e^{x1}] at x = (1.5, -0.5).
    //
    // Expect
    // ------
    // - Entries within 1e-6 of [[2 x0, 1], [e^{x1}, x0 e^{x1}]].
    fn forward_jacobian_matches_analytic() {
        // Arrange
        let x = array![1.5, -0.5];
        let fx = system(&x).unwrap();

        // Act
        let jac = forward_jacobian(&x, &fx, f64::EPSILON.sqrt(), system).unwrap();

        // Assert
        let e = (-0.5_f64).exp();
        assert_abs_diff_eq!(jac[[0, 0]], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[[0, 1]], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[[1, 0]], e, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[[1, 1]], 1.5 * e, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A domain boundary just above x triggers the backward step.
    //
    // Given
    // -----
    // - f(x) = [x0²], undefined (NaN) for x0 > 2, evaluated at x0 = 2.
    //
    // Expect
    // ------
    // - J ≈ 4 from the backward difference.
    fn backward_step_is_used_at_domain_boundary() {
        let x = array![2.0];
        let eval = |p: &Point| -> Result<Residuals, Error> {
            if p[0] > 2.0 { Ok(Array1::from_elem(1, f64::NAN)) } else { Ok(array![p[0] * p[0]]) }
        };
        let fx = eval(&x).unwrap();

        let jac = forward_jacobian(&x, &fx, 1e-7, eval).unwrap();

        assert_abs_diff_eq!(jac[[0, 0]], 4.0, epsilon = 1e-5);
    }

    #[test]
    // Purpose
    // -------
    // A column undefined in both directions is reported, not filled with NaN.
    //
    // Given
    // -----
    // - f(x) = NaN everywhere except exactly at x.
    //
    // Expect
    // ------
    // - `JacobianStepFailed { column: 0 }`.
    fn failure_in_both_directions_is_reported() {
        let x = array![0.3];
        let eval = |p: &Point| -> Result<Residuals, Error> {
            if p[0] == 0.3 { Ok(array![1.0]) } else { Ok(array![f64::NAN]) }
        };
        let fx = eval(&x).unwrap();

        let err = forward_jacobian(&x, &fx, 1e-7, eval).unwrap_err();

        assert_eq!(OptError::from(err), OptError::JacobianStepFailed { column: 0 });
    }

    #[test]
    // Purpose
    // -------
    // Errors raised inside the difference closure reach the caller intact.
    //
    // Given
    // -----
    // - f(x) = [x0] at x, failing with `MissingInitialGuess` at any other point.
    //
    // Expect
    // ------
    // - `forward_jacobian` returns that error, not a NaN column.
    fn closure_errors_propagate() {
        let x = array![0.5];
        let eval = |p: &Point| -> Result<Residuals, Error> {
            if p[0] == 0.5 { Ok(array![0.5]) } else { Err(OptError::MissingInitialGuess.into()) }
        };
        let fx = eval(&x).unwrap();

        let err = forward_jacobian(&x, &fx, 1e-7, eval).unwrap_err();

        assert_eq!(OptError::from(err), OptError::MissingInitialGuess);
    }
}
