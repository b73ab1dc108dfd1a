//! High-level entry point for solving a [`ResidualSystem`].
use crate::optimization::root_finder::{
    adapter::RootAdapter,
    run::run_hybrid,
    traits::{ResidualSystem, RootOptions, RootOutcome},
    types::Point,
};
use crate::optimization::errors::OptError;

/// Find a root of `system` starting from `x0`.
///
/// # Behavior
/// - Checks `x0` has `system.dim()` entries.
/// - Wraps the system in a [`RootAdapter`] and runs the Powell hybrid solver
///   via [`run_hybrid`].
/// - Errors raised inside the solver are converted back into `S::Error`,
///   which recovers the system's own errors by downcast.
///
/// A returned outcome may be unconverged (`converged == false`), e.g. when
/// the trust region collapses or `max_iter` is hit; callers decide whether
/// that is acceptable.
///
/// # Errors
/// - `OptError::DimMismatch` (as `S::Error`) for a wrongly sized `x0`.
/// - Any error from the system that is not an out-of-domain marker.
/// - Solver failures (non-finite residual at `x0`, failed Jacobian).
pub fn solve_root<S: ResidualSystem>(
    system: &mut S, x0: Point, opts: &RootOptions,
) -> Result<RootOutcome, S::Error> {
    let dim = system.dim();
    if x0.len() != dim {
        let err: argmin::core::Error = OptError::DimMismatch { expected: dim, found: x0.len() }.into();
        return Err(S::Error::from(err));
    }
    let problem = RootAdapter::new(system, opts.fd_step);
    run_hybrid(x0, opts, problem).map_err(S::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::root_finder::types::Residuals;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// Powell's badly scaled function.
    struct PowellBadlyScaled;

    impl ResidualSystem for PowellBadlyScaled {
        type Error = OptError;

        fn dim(&self) -> usize {
            2
        }

        fn residuals(&mut self, x: &Point) -> Result<Residuals, OptError> {
            Ok(array![1e4 * x[0] * x[1] - 1.0, (-x[0]).exp() + (-x[1]).exp() - 1.0001])
        }
    }

    /// Square-root system, undefined for `x0 < 0`.
    struct Guarded;

    impl ResidualSystem for Guarded {
        type Error = OptError;

        fn dim(&self) -> usize {
            2
        }

        fn residuals(&mut self, x: &Point) -> Result<Residuals, OptError> {
            if x[0] < 0.0 {
                return Err(OptError::NonFiniteResidual { index: 0, value: x[0] });
            }
            Ok(array![x[0].sqrt() + x[1] - 3.0, x[0] - x[1] * x[1] - 2.0])
        }

        fn is_out_of_domain(err: &OptError) -> bool {
            matches!(err, OptError::NonFiniteResidual { .. })
        }
    }

    #[test]
    // Purpose
    // -------
    // The solver handles a badly scaled classic test problem.
    //
    // Given
    // -----
    // - Powell's badly scaled function from (0, 1).
    //
    // Expect
    // ------
    // - Converged, with residuals below the tolerance.
    fn solves_powell_badly_scaled() {
        // Arrange
        let mut system = PowellBadlyScaled;
        let opts = RootOptions { max_iter: 500, ..RootOptions::default() };

        // Act
        let out = solve_root(&mut system, array![0.0, 1.0], &opts).unwrap();

        // Assert
        assert!(out.converged, "status: {}", out.status);
        let f = system.residuals(&out.x_hat).unwrap();
        assert!(f.iter().all(|v| v.abs() <= 1e-8));
    }

    #[test]
    // Purpose
    // -------
    // Out-of-domain trial points are rejected steps, not fatal errors.
    //
    // Given
    // -----
    // - sqrt(x0) + x1 = 3, x0 - x1² = 2, starting close to the x0 = 0 edge
    //   with a large trust radius.
    //
    // Expect
    // ------
    // - Converges to the unique root (121/36, 7/6).
    fn out_of_domain_trials_are_rejected_steps() {
        let mut system = Guarded;
        let opts = RootOptions { trust_factor: 100.0, max_iter: 200, ..RootOptions::default() };

        let out = solve_root(&mut system, array![0.5, 0.5], &opts).unwrap();

        assert!(out.converged, "status: {}", out.status);
        let f = system.residuals(&out.x_hat).unwrap();
        assert_abs_diff_eq!(f[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.x_hat[0], 121.0 / 36.0, epsilon = 1e-8);
    }

    #[test]
    // Purpose
    // -------
    // A wrongly sized start vector is rejected up front.
    //
    // Given
    // -----
    // - A 2-D system and x0 of length 3.
    //
    // Expect
    // ------
    // - `DimMismatch { expected: 2, found: 3 }`.
    fn wrong_start_dimension_is_rejected() {
        let err = solve_root(&mut PowellBadlyScaled, array![0.0, 1.0, 2.0], &RootOptions::default())
            .unwrap_err();

        assert_eq!(err, OptError::DimMismatch { expected: 2, found: 3 });
    }
}
