//! Public API surface for nonlinear root finding.
//!
//! - [`ResidualSystem`]: trait callers implement for a square system
//!   `f(x) = 0`.
//! - [`RootOptions`]: validated solver configuration.
//! - [`RootOutcome`]: normalized result returned by [`solve_root`].
//!
//! [`solve_root`]: crate::optimization::root_finder::solve_root
use argmin::core::{Error, TerminationReason, TerminationStatus};

use crate::optimization::{
    errors::{OptError, OptResult},
    root_finder::{
        types::{FnEvalMap, Point, Residuals},
        validation::{validate_x_hat, verify_tol_residual, verify_tol_x},
    },
};

/// A square nonlinear system `f: Rⁿ → Rⁿ`.
///
/// Evaluation takes `&mut self`: systems may warm-start inner solvers from
/// the previous call, so call order can matter for speed but must not
/// matter for the value.
///
/// - `type Error`: the caller's error type. It must absorb argmin errors so
///   failures raised inside the solver come back out in the caller's terms.
///
/// Required:
/// - `dim()`: number of unknowns and equations.
/// - `residuals(x)`: evaluate `f(x)`.
///
/// Optional:
/// - `is_out_of_domain(err)`: mark errors that only mean "this trial point is
///   outside the region where `f` is defined". The solver treats such points
///   as rejected steps instead of aborting. Defaults to `false`.
pub trait ResidualSystem {
    type Error: std::error::Error + Send + Sync + 'static + From<Error>;

    fn dim(&self) -> usize;
    fn residuals(&mut self, x: &Point) -> Result<Residuals, Self::Error>;

    fn is_out_of_domain(_err: &Self::Error) -> bool {
        false
    }
}

/// Root-finder configuration.
///
/// Fields:
/// - `tol_residual`: converged once `max |f_i| ≤ tol_residual`.
/// - `tol_x`: stop once the trust radius falls below
///   `tol_x · max(‖x‖, tol_x)`.
/// - `max_iter`: hard cap on solver iterations.
/// - `trust_factor`: initial trust radius is `trust_factor · ‖x₀‖`
///   (or `trust_factor` when `x₀ = 0`).
/// - `fd_step`: relative forward-difference step for the Jacobian.
/// - `verbose`: attach the slog observer (feature `obs_slog`).
///
/// Default:
/// - `tol_residual = 1e-10`, `tol_x = 1e-11`, `max_iter = 100`,
///   `trust_factor = 1`, `fd_step = √ε`, `verbose = false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub tol_residual: f64,
    pub tol_x: f64,
    pub max_iter: usize,
    pub trust_factor: f64,
    pub fd_step: f64,
    pub verbose: bool,
}

impl RootOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidTolResidual`] / [`OptError::InvalidTolX`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    /// - [`OptError::InvalidTrustFactor`] / [`OptError::InvalidFdStep`] for
    ///   non-finite or non-positive values.
    pub fn new(
        tol_residual: f64, tol_x: f64, max_iter: usize, trust_factor: f64, fd_step: f64,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_tol_residual(tol_residual)?;
        verify_tol_x(tol_x)?;
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        if !trust_factor.is_finite() || trust_factor <= 0.0 {
            return Err(OptError::InvalidTrustFactor {
                factor: trust_factor,
                reason: "Trust-region factor must be finite and positive.",
            });
        }
        if !fd_step.is_finite() || fd_step <= 0.0 {
            return Err(OptError::InvalidFdStep {
                step: fd_step,
                reason: "Finite-difference step must be finite and positive.",
            });
        }
        Ok(Self { tol_residual, tol_x, max_iter, trust_factor, fd_step, verbose })
    }
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            tol_residual: 1e-10,
            tol_x: 1e-11,
            max_iter: 100,
            trust_factor: 1.0,
            fd_step: f64::EPSILON.sqrt(),
            verbose: false,
        }
    }
}

/// Canonical result of a root search.
///
/// - `x_hat`: best point found (smallest `½ ‖f‖²`).
/// - `cost`: `½ ‖f(x_hat)‖²`.
/// - `converged`: `true` only if the residual tolerance was met.
/// - `status`: human-readable termination status.
/// - `iterations`: solver iterations performed.
/// - `fn_evals`: argmin's evaluation counters.
#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub x_hat: Point,
    pub cost: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: u64,
    pub fn_evals: FnEvalMap,
}

impl RootOutcome {
    /// Build a validated [`RootOutcome`] from the final solver state.
    ///
    /// # Errors
    /// - Propagates [`validate_x_hat`] failures.
    pub fn new(
        x_hat: Option<Point>, cost: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let x_hat = validate_x_hat(x_hat)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {
                (true, "Solver converged".to_string())
            }
            TerminationStatus::Terminated(reason) => (false, format!("{reason:?}")),
        };
        Ok(Self { x_hat, cost, converged, status, iterations, fn_evals })
    }
}
