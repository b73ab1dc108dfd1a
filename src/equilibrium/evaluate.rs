//! Steady-state equilibrium evaluator.
//!
//! Purpose
//! -------
//! Map a trial `[Z_L, beta, Q]` into the full steady-state record and the
//! three residuals `[A_hh - B, N_hh - N, C_N_hh - C_N]` the root finder
//! drives to zero.
//!
//! Key behaviors
//! -------------
//! - [`objective_ss`] projects the trial into the admissible region, writes
//!   the projected `beta`/`varphi` into the calibration and `Z_L`/`Q` into
//!   the record, then calls [`evaluate_ss`].
//! - [`evaluate_ss`] runs, in order: normalizations and targets, the
//!   closed-form firm block, the government budget, the household solve and
//!   simulation, and market clearing.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every field of the record except the running guess (`Z_L`, `Q`) is
//!   recomputed on each call. The household warm start (`vbeg_a`, `Dbeg`)
//!   persists between calls and only affects speed.
//! - The record is replaced only when the whole evaluation succeeds. A
//!   domain violation in the firm block is raised before the household
//!   arrays are touched.
//!
//! Conventions
//! -----------
//! - Zero steady-state inflation and no price-adjustment costs:
//!   `pi = pi_N = pi_L = 0`, `adjcost* = 0`, `NKPC_res_* = 0`.
//! - `clearing_X = X_hh - X`.
use log::{debug, info};

use crate::{
    equilibrium::{
        blocks::FirmBlock,
        projection::{Q_INTERVAL, VARPHI_INTERVAL, Y_L_INTERVAL, beta_interval, project},
    },
    household::{
        aggregate::HouseholdAggregates,
        backward::{BackwardContext, HouseholdBackward},
        prices::HouseholdPrices,
        simulate::simulate_hh_ss,
        solve::solve_hh_ss,
    },
    model::{
        calibration::Unknowns,
        errors::{ModelError, ModelResult},
        hank::HankModel,
        steady_state::SteadyState,
    },
};

/// Luxury-sector output before projection.
pub const Y_L_GUESS: f64 = 0.5;

/// Evaluate the steady state at the current `Z_L`, `Q`, and calibration.
///
/// Parameters
/// ----------
/// - `model`: prepared model; `ss.z_l`, `ss.q`, and `calib` hold the trial.
/// - `do_print`: forward to the household loops' logging.
///
/// Errors
/// ------
/// - `ModelError::NotPrepared` before `prepare_hh_ss`.
/// - `ModelError::DomainViolation` from the firm block.
/// - `ModelError::Household` if the household solve or simulation fails.
pub fn evaluate_ss<B: HouseholdBackward>(
    model: &mut HankModel<B>, do_print: bool,
) -> ModelResult<()> {
    if !model.prepared {
        return Err(ModelError::NotPrepared);
    }
    let par = &model.par;

    // a. fixed
    let y_l = project(&Y_L_INTERVAL, Y_L_GUESS)?;
    let firms = FirmBlock::solve(par, model.ss.z_l, model.ss.q, y_l)?;
    let mut ss = SteadyState {
        z_l: firms.z_l,
        q: model.ss.q,
        pm_l: firms.pm_l,
        pi_n: 0.0,
        pi_l: 0.0,
        pi: 0.0,
        p_n: firms.p_n,
        p_l: firms.p_l,
        p: firms.p,
        y: firms.y,
        y_star: 1.0,
        y_l: firms.y_l,
        ..SteadyState::default()
    };

    // b. targets
    ss.r = par.r_target_ss;
    ss.a = par.b_target_ss;
    ss.b = par.b_target_ss;
    ss.g = par.g_target_ss;

    // c. monetary policy
    ss.i = (1.0 + ss.r) * (1.0 + ss.pi) - 1.0;
    ss.istar = ss.i;
    ss.rstar = ss.r;

    // d. firms
    ss.w_l = firms.w_l;
    ss.w_n = firms.w_n;
    ss.pm_n = firms.pm_n;
    ss.z_n = firms.z_n;
    ss.y_n = firms.y_n;
    ss.mc_n = firms.mc_n;
    ss.mc_l = firms.mc_l;
    ss.m_l = firms.m_l;
    ss.n_l = firms.n_l;
    ss.m_n = firms.m_n;
    ss.n_n = firms.n_n;
    ss.adjcost_l = 0.0;
    ss.adjcost_n = 0.0;
    ss.adjcost = 0.0;
    ss.d_n = firms.d_n;
    ss.d_l = firms.d_l;
    ss.d = ss.d_n + ss.q * ss.d_l;
    ss.n = ss.n_n + ss.n_l;
    ss.w = ss.w_n;
    ss.q_check = ss.p_l / ss.p_n;
    ss.pm_f = ss.pm_n;
    ss.m_test = ss.m_n + ss.m_l;
    ss.nkpc_res_n = 0.0;
    ss.nkpc_res_l = 0.0;

    // e. government
    ss.tau = ss.r * ss.b + ss.g + par.chi;
    ss.tau_pm = 0.0;
    ss.tax_rate_base = par.tax_rate_base;

    // f. household
    let prices = HouseholdPrices::from_steady_state(&ss, par);
    prices.validate()?;
    let ctx = BackwardContext { par, calib: &model.calib, grids: &model.grids, prices: &prices };
    let solve = solve_hh_ss(&model.backward, &ctx, &mut model.hh, do_print)?;
    let simulate = simulate_hh_ss(par, &model.grids, &mut model.hh, do_print)?;
    HouseholdAggregates::compute(&model.grids, &prices, &model.hh).write_into(&mut ss);

    // g. market clearing
    ss.c_n = firms.c_n() - ss.adjcost_n;
    ss.c_l = firms.c_l() - ss.adjcost_l;
    ss.c = (ss.c_n + ss.q * ss.c_l) * (ss.p_n / ss.p);
    ss.clearing_a = ss.a_hh - ss.a;
    ss.clearing_n = ss.n_hh - ss.n;
    ss.clearing_c = ss.c_hh - ss.c;
    ss.clearing_c_n = ss.c_n_hh - ss.c_n;
    ss.clearing_c_l = ss.c_l_hh - ss.c_l;

    if do_print {
        info!(
            "evaluated: Z_N = {:.4}, Z_L = {:.4}, Q = {:.4}, N_N = {:.4}, N_L = {:.4}",
            ss.z_n, ss.z_l, ss.q, ss.n_n, ss.n_l
        );
    }
    model.ss = ss;
    model.stats.evaluations += 1;
    model.stats.last_solve = Some(solve);
    model.stats.last_simulate = Some(simulate);
    Ok(())
}

/// Residuals of the steady-state system at the trial `x`.
///
/// Parameters
/// ----------
/// - `model`: prepared model; updated in place.
/// - `x`: trial unknowns, projected before use.
/// - `do_print`: forward to [`evaluate_ss`].
///
/// Returns
/// -------
/// `[A_hh - B, N_hh - N, C_N_hh - C_N]` at the projected point.
///
/// Errors
/// ------
/// - `ModelError::NotPrepared` before `prepare_hh_ss`.
/// - `ModelError::DomainViolation` for a non-finite trial value or a firm
///   block outside its domain.
/// - Anything [`evaluate_ss`] reports.
pub fn objective_ss<B: HouseholdBackward>(
    model: &mut HankModel<B>, x: &Unknowns, do_print: bool,
) -> ModelResult<[f64; 3]> {
    if !model.prepared {
        return Err(ModelError::NotPrepared);
    }
    let q = project(&Q_INTERVAL, x.q)?;
    let beta = project(&beta_interval(model.par.r_target_ss), x.beta)?;
    let varphi = project(&VARPHI_INTERVAL, model.calib.varphi)?;
    if !x.z_l.is_finite() {
        return Err(ModelError::DomainViolation { variable: "Z_L", value: x.z_l });
    }

    model.ss.z_l = x.z_l;
    model.ss.q = q;
    model.calib.beta = beta;
    model.calib.varphi = varphi;
    debug!(
        "objective at Z_L = {:.10}, beta = {:.10}, Q = {:.10} (projected from beta = {}, Q = {})",
        x.z_l, beta, q, x.beta, x.q
    );

    evaluate_ss(model, do_print)?;
    let res = model.ss.targets();
    debug!("residuals: [{:.3e}, {:.3e}, {:.3e}]", res[0], res[1], res[2]);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::params::Par;
    use approx::assert_abs_diff_eq;

    fn small_model() -> HankModel {
        let par = Par { n_z: 3, n_a: 40, tol_solve: 1e-9, tol_simulate: 1e-10, ..Par::default() };
        let mut model = HankModel::new(par).unwrap();
        model.prepare_hh_ss().unwrap();
        model
    }

    #[test]
    // Purpose
    // -------
    // The evaluator writes consistent accounting identities.
    //
    // Given
    // -----
    // - A small prepared model at the initial guess [0.5, beta, 1].
    //
    // Expect
    // ------
    // - `tau = r B + G + chi`, `N = N_N + N_L`, `C_N = Y_N - pm_N M_N`,
    //   `i = r` at zero inflation, and `clearing_A` equals the first residual.
    fn evaluation_satisfies_identities() {
        // Arrange
        let mut model = small_model();
        let x = Unknowns::initial_guess(model.calibration());

        // Act
        let res = objective_ss(&mut model, &x, false).unwrap();

        // Assert
        let ss = model.steady_state();
        let par = model.par();
        assert_abs_diff_eq!(ss.tau, ss.r * ss.b + ss.g + par.chi, epsilon = 1e-14);
        assert_abs_diff_eq!(ss.n, ss.n_n + ss.n_l, epsilon = 1e-14);
        assert_abs_diff_eq!(ss.c_n, ss.y_n - ss.pm_n * ss.m_n, epsilon = 1e-14);
        assert_abs_diff_eq!(ss.i, ss.r, epsilon = 1e-14);
        assert_abs_diff_eq!(ss.clearing_a, res[0], epsilon = 1e-14);
        assert_abs_diff_eq!(ss.clearing_n, res[1], epsilon = 1e-14);
        assert_abs_diff_eq!(ss.clearing_c_n, res[2], epsilon = 1e-14);
        assert_eq!(model.stats().evaluations, 1);
    }

    #[test]
    // Purpose
    // -------
    // Trial values outside the admissible region are projected before use.
    //
    // Given
    // -----
    // - beta = 1.2 above `1/(1+r)` and Q = 1.2, inside the region where
    //   both sector cost shares are positive.
    //
    // Expect
    // ------
    // - The evaluation succeeds; the calibration holds exactly `1/(1+r)`
    //   and the record holds Q = 1.2.
    fn trial_beta_is_projected_into_calibration() {
        let mut model = small_model();
        let x = Unknowns { z_l: 0.5, beta: 1.2, q: 1.2 };

        model.evaluate_at(&x, false).unwrap();

        let ceiling = 1.0 / (1.0 + model.par().r_target_ss);
        assert_eq!(model.calibration().beta, ceiling);
        assert_eq!(model.steady_state().q, 1.2);
    }

    #[test]
    // Purpose
    // -------
    // A firm block outside its domain leaves the previous record untouched.
    //
    // Given
    // -----
    // - A successful evaluation, then Q = 5 where the N-sector cost share is
    //   negative.
    //
    // Expect
    // ------
    // - `DomainViolation` naming `cost_share_N`; `Y_N` still from the first
    //   evaluation.
    fn domain_violation_keeps_previous_record() {
        // Arrange
        let mut model = small_model();
        let x = Unknowns::initial_guess(model.calibration());
        objective_ss(&mut model, &x, false).unwrap();
        let y_n_before = model.steady_state().y_n;

        // Act
        let err = objective_ss(&mut model, &Unknowns { q: 5.0, ..x }, false).unwrap_err();

        // Assert
        assert!(matches!(err, ModelError::DomainViolation { variable: "cost_share_N", .. }));
        assert_eq!(model.steady_state().y_n, y_n_before);
    }

    #[test]
    // Purpose
    // -------
    // Evaluation refuses to run before the household block is prepared.
    //
    // Given
    // -----
    // - A freshly constructed model.
    //
    // Expect
    // ------
    // - `ModelError::NotPrepared`.
    fn unprepared_model_is_rejected() {
        let mut model = HankModel::new(Par::default()).unwrap();
        let x = Unknowns::initial_guess(model.calibration());

        assert_eq!(objective_ss(&mut model, &x, false), Err(ModelError::NotPrepared));
    }
}
