//! Outer steady-state search.
//!
//! Purpose
//! -------
//! Drive the three equilibrium residuals to zero over `[Z_L, beta, Q]` with
//! the Powell hybrid root finder, then leave the model at the root.
//!
//! Key behaviors
//! -------------
//! - [`HankModel`] implements [`ResidualSystem`]. Domain violations are
//!   marked out of domain, so the solver treats them as rejected steps.
//!   Household non-convergence and every other error abort the search.
//! - After the solver stops, the model is evaluated once more at the best
//!   point so the record reflects it and not the last trial.
//! - The root is accepted only if `max |f| ≤ tol_ss_residual` at that final
//!   evaluation; otherwise `ModelError::RootNotConverged` is returned,
//!   whatever `do_print` says.
//!
//! Conventions
//! -----------
//! - Solver settings come from `Par`: `tol_broyden` (residual),
//!   `tol_ss` (step), and `max_iter_broyden`.
use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::{
    equilibrium::{evaluate::objective_ss, report::SteadyStateReport},
    household::backward::HouseholdBackward,
    model::{
        calibration::{N_UNKNOWNS, Unknowns},
        errors::{ModelError, ModelResult},
        hank::HankModel,
    },
    optimization::root_finder::{
        ResidualSystem, RootOptions, solve_root,
        types::{FnEvalMap, Point, Residuals},
    },
};

/// Result of a successful steady-state search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SteadyStateOutcome {
    /// Root `[Z_L, beta, Q]` after projection.
    pub unknowns: Unknowns,
    /// Residuals at the root.
    pub residuals: [f64; 3],
    /// Root-finder iterations.
    pub iterations: u64,
    /// Root-finder termination status.
    pub status: String,
    /// Evaluation counters reported by the solver.
    pub fn_evals: FnEvalMap,
    pub report: SteadyStateReport,
}

impl SteadyStateOutcome {
    /// Largest absolute residual at the root.
    pub fn max_abs_residual(&self) -> f64 {
        max_abs(&self.residuals)
    }
}

impl<B: HouseholdBackward> ResidualSystem for HankModel<B> {
    type Error = ModelError;

    fn dim(&self) -> usize {
        N_UNKNOWNS
    }

    fn residuals(&mut self, x: &Point) -> Result<Residuals, ModelError> {
        let x = Unknowns::from_slice(&x.to_vec())?;
        let res = objective_ss(self, &x, false)?;
        Ok(Residuals::from(res.to_vec()))
    }

    fn is_out_of_domain(err: &ModelError) -> bool {
        err.is_domain_violation()
    }
}

/// Root-finder options derived from the model configuration.
///
/// `verbose` attaches the slog observer when the `obs_slog` feature is on.
///
/// Errors
/// ------
/// - `ModelError::Opt` if a tolerance or the iteration cap is invalid.
pub fn root_options<B: HouseholdBackward>(
    model: &HankModel<B>, verbose: bool,
) -> ModelResult<RootOptions> {
    let par = model.par();
    let defaults = RootOptions::default();
    Ok(RootOptions::new(
        par.tol_broyden,
        par.tol_ss,
        par.max_iter_broyden,
        defaults.trust_factor,
        defaults.fd_step,
        verbose,
    )?)
}

/// Find the steady state of a prepared model.
///
/// Parameters
/// ----------
/// - `model`: prepared model; left at the root on success.
/// - `do_print`: log the final evaluation and the report at `info`, and
///   make the root finder verbose.
///
/// Returns
/// -------
/// [`SteadyStateOutcome`] with the root, its residuals, and solver counters.
///
/// Errors
/// ------
/// - `ModelError::NotPrepared` before `prepare_hh_ss`.
/// - `ModelError::Household` if an inner loop fails at any trial point.
/// - `ModelError::DomainViolation` if the starting point or the final point
///   lies outside the model's domain.
/// - `ModelError::RootNotConverged` if the final residual exceeds
///   `tol_ss_residual`.
pub fn find_ss<B: HouseholdBackward>(
    model: &mut HankModel<B>, do_print: bool,
) -> ModelResult<SteadyStateOutcome> {
    if !model.prepared {
        return Err(ModelError::NotPrepared);
    }
    let t0 = Instant::now();

    // a. initial guess
    let x0 = Unknowns::initial_guess(&model.calib);
    model.ss.z_l = x0.z_l;
    model.ss.q = x0.q;
    let opts = root_options(model, do_print)?;

    // b. root search
    let outcome = solve_root(model, x0.to_array(), &opts)?;
    info!(
        "root search stopped after {} iterations: {} (cost {:.3e})",
        outcome.iterations, outcome.status, outcome.cost
    );

    // c. final evaluation
    let x_hat = Unknowns::from_slice(&outcome.x_hat.to_vec())?;
    let residuals = objective_ss(model, &x_hat, do_print)?;
    let max_abs_residual = max_abs(&residuals);
    let tol = model.par.tol_ss_residual;
    if max_abs_residual > tol {
        return Err(ModelError::RootNotConverged {
            max_abs_residual,
            tol,
            iterations: outcome.iterations,
            status: outcome.status,
        });
    }

    let report = SteadyStateReport::from_model(model, outcome.iterations, t0.elapsed());
    if do_print {
        info!("{report}");
    }
    Ok(SteadyStateOutcome {
        unknowns: model.unknowns(),
        residuals,
        iterations: outcome.iterations,
        status: outcome.status,
        fn_evals: outcome.fn_evals,
        report,
    })
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::params::Par;

    #[test]
    // Purpose
    // -------
    // Only domain violations are treated as rejected trial points.
    //
    // Given
    // -----
    // - A domain violation, a household failure, and `NotPrepared`.
    //
    // Expect
    // ------
    // - `is_out_of_domain` is true for the first only.
    fn only_domain_violations_are_out_of_domain() {
        let domain = ModelError::DomainViolation { variable: "Y_N", value: -0.1 };
        let household = ModelError::Household(
            crate::household::errors::HouseholdError::SolveNotConverged {
                iterations: 10,
                diff: 1.0,
                tol: 1e-10,
            },
        );

        assert!(<HankModel as ResidualSystem>::is_out_of_domain(&domain));
        assert!(!<HankModel as ResidualSystem>::is_out_of_domain(&household));
        assert!(!<HankModel as ResidualSystem>::is_out_of_domain(&ModelError::NotPrepared));
    }

    #[test]
    // Purpose
    // -------
    // The search refuses to start on an unprepared model.
    //
    // Given
    // -----
    // - A freshly constructed model.
    //
    // Expect
    // ------
    // - `ModelError::NotPrepared`.
    fn find_ss_requires_preparation() {
        let mut model = HankModel::new(Par::default()).unwrap();

        let err = find_ss(&mut model, false).unwrap_err();

        assert_eq!(err, ModelError::NotPrepared);
    }

    #[test]
    // Purpose
    // -------
    // Solver settings are read from the configuration.
    //
    // Given
    // -----
    // - `tol_broyden = 1e-9`, `tol_ss = 1e-12`, `max_iter_broyden = 7`.
    // - `do_print` on, then off.
    //
    // Expect
    // ------
    // - The options carry exactly those values; `verbose` follows `do_print`.
    fn root_options_follow_par() {
        let par = Par { tol_broyden: 1e-9, tol_ss: 1e-12, max_iter_broyden: 7, ..Par::default() };
        let model = HankModel::new(par).unwrap();

        let opts = root_options(&model, true).unwrap();
        let quiet = root_options(&model, false).unwrap();

        assert_eq!(opts.tol_residual, 1e-9);
        assert_eq!(opts.tol_x, 1e-12);
        assert_eq!(opts.max_iter, 7);
        assert!(opts.verbose);
        assert!(!quiet.verbose);
    }
}
