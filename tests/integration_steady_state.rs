//! Integration tests for the steady-state search.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: configuration, grid and warm-start
//!   preparation, the Powell hybrid search over `[Z_L, beta, Q]`, and the
//!   final steady-state record.
//! - Check the accounting identities and market clearing a reader of the
//!   record relies on, not the exact numbers of one calibration.
//!
//! Coverage
//! --------
//! - `model::hank::HankModel`: construction, `prepare_hh_ss`, `find_ss`,
//!   `evaluate_at`.
//! - `equilibrium`: projection at the boundary, domain violations, and the
//!   final residual check.
//! - `optimization::root_finder`: convergence on the model's residuals.
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (grids, EGM step, lottery, dogleg) are
//!   covered by unit tests.
//! - The baseline `Na = 500` case is `#[ignore]`d for runtime.
use approx::assert_abs_diff_eq;
use rust_hank::model::{
    calibration::Unknowns,
    errors::ModelError,
    hank::HankModel,
    params::Par,
    steady_state::{SteadyState, Var},
};

/// Purpose
/// -------
/// Small but non-degenerate configuration for end-to-end searches.
///
/// Configuration
/// -------------
/// - `Nz = 5`, `Na = 50`; all other fields at their baseline values.
/// - Household tolerances `1e-10` so a single search finishes quickly.
fn small_par() -> Par {
    Par { n_z: 5, n_a: 50, tol_solve: 1e-10, tol_simulate: 1e-10, ..Par::default() }
}

/// Market clearing in every good and factor, within `tol`.
fn assert_markets_clear(ss: &SteadyState, tol: f64) {
    assert_abs_diff_eq!(ss.a_hh, ss.b, epsilon = tol);
    assert_abs_diff_eq!(ss.n_hh, ss.n_n + ss.n_l, epsilon = tol);
    assert_abs_diff_eq!(ss.n, ss.n_n + ss.n_l, epsilon = tol);
    assert_abs_diff_eq!(ss.c_n_hh, ss.c_n, epsilon = tol);
    assert_abs_diff_eq!(ss.c_l_hh, ss.c_l, epsilon = tol);
    assert_abs_diff_eq!(ss.c_hh, ss.c, epsilon = tol);
}

/// Build and prepare a model, panicking on configuration errors.
fn prepared_model(par: Par) -> HankModel {
    let mut model = HankModel::new(par).expect("configuration should validate");
    model.prepare_hh_ss().expect("household block should prepare");
    model
}

#[test]
// Purpose
// -------
// A small-grid search finds a steady state whose record is consistent.
//
// Given
// -----
// - The small configuration, default initial guess [0.5, beta, 1].
//
// Expect
// ------
// - All three residuals within `tol_ss_residual`.
// - Market clearing for assets, labor, and both goods within 1e-6, with
//   `C = C_hh` and `N = N_N + N_L`.
// - `Q ∈ (0, 5]`, `beta ≤ 1/(1+r)`, `tau = r B + G + chi`.
fn small_grid_search_clears_markets() {
    let _ = env_logger::try_init();

    // Arrange
    let mut model = prepared_model(small_par());

    // Act
    let outcome = model.find_ss(false).expect("steady state should be found");

    // Assert
    let par = model.par().clone();
    let ss = model.steady_state();
    assert!(outcome.max_abs_residual() <= par.tol_ss_residual);
    assert_markets_clear(ss, 1e-6);
    assert!(ss.q > 0.0 && ss.q <= 5.0);
    assert!(model.calibration().beta <= 1.0 / (1.0 + par.r_target_ss));
    assert_abs_diff_eq!(ss.tau, ss.r * ss.b + ss.g + par.chi, epsilon = 1e-12);
    assert_eq!(outcome.unknowns, model.unknowns());
}

#[test]
// Purpose
// -------
// Re-evaluating at the root reproduces the whole steady-state record.
//
// Given
// -----
// - A converged small-grid model, evaluated again at its own unknowns.
//
// Expect
// ------
// - Every variable of the record agrees within 1e-7 (relative to
//   max(|x|, 1)). The household block restarts from its converged warm
//   start, so the drift is bounded by `tol_solve` and `tol_simulate`
//   (both 1e-10 here) times the sensitivity of the aggregates.
fn evaluation_at_root_is_idempotent() {
    let _ = env_logger::try_init();

    // Arrange
    let mut model = prepared_model(small_par());
    let outcome = model.find_ss(false).expect("steady state should be found");
    let before = model.steady_state().clone();

    // Act
    let again = model.evaluate_at(&outcome.unknowns, false).expect("root should evaluate");

    // Assert
    for (a, b) in again.iter().zip(outcome.residuals.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
    }
    let after = model.steady_state();
    for &var in Var::ALL {
        let (x, y) = (before.get(var), after.get(var));
        assert!(
            (x - y).abs() <= 1e-7 * x.abs().max(1.0),
            "{} drifted: {x} -> {y}",
            var.name()
        );
    }
}

#[test]
// Purpose
// -------
// Trial values beyond the admissible range are projected before the firm
// block runs, and a firm block outside its domain is reported by name.
//
// Given
// -----
// - Q = 7.3, above the ceiling of 5, where the necessity-sector cost share
//   is negative.
//
// Expect
// ------
// - The record holds exactly Q = 5.
// - `DomainViolation { variable: "cost_share_N" }`.
fn out_of_range_q_is_projected_then_rejected() {
    let _ = env_logger::try_init();

    // Arrange
    let mut model = prepared_model(small_par());
    let x = Unknowns { z_l: 0.5, beta: model.par().beta, q: 7.3 };

    // Act
    let err = model.evaluate_at(&x, false).unwrap_err();

    // Assert
    assert_eq!(model.steady_state().q, 5.0);
    assert!(matches!(err, ModelError::DomainViolation { variable: "cost_share_N", .. }));
    assert!(err.is_domain_violation());
}

#[test]
// Purpose
// -------
// Evaluation and search are refused before preparation.
//
// Given
// -----
// - A constructed but unprepared model.
//
// Expect
// ------
// - `NotPrepared` from both `evaluate_at` and `find_ss`.
fn unprepared_model_is_rejected() {
    let mut model = HankModel::new(small_par()).expect("configuration should validate");
    let x = Unknowns { z_l: 0.5, beta: 0.98, q: 1.0 };

    assert_eq!(model.evaluate_at(&x, false).unwrap_err(), ModelError::NotPrepared);
    assert_eq!(model.find_ss(false).unwrap_err(), ModelError::NotPrepared);
}

#[test]
// Purpose
// -------
// A search capped far below what it needs is reported, not accepted.
//
// Given
// -----
// - `max_iter_broyden = 1`.
//
// Expect
// ------
// - `RootNotConverged` with a residual above `tol_ss_residual`.
fn capped_search_reports_non_convergence() {
    let _ = env_logger::try_init();

    let mut model = prepared_model(Par { max_iter_broyden: 1, ..small_par() });

    let err = model.find_ss(false).unwrap_err();

    match err {
        ModelError::RootNotConverged { max_abs_residual, tol, .. } => {
            assert!(max_abs_residual > tol);
        }
        other => panic!("expected RootNotConverged, got {other}"),
    }
}

#[test]
#[ignore = "baseline grid (Na = 500, Nz = 7) takes minutes"]
// Purpose
// -------
// The baseline configuration solves and clears markets.
//
// Given
// -----
// - `Par::default()`.
//
// Expect
// ------
// - Residuals within `tol_ss_residual`; Q within its admissible range.
// - Every market clears within 1e-6, including `C = C_hh`.
fn baseline_configuration_solves() {
    let _ = env_logger::try_init();

    let mut model = prepared_model(Par::default());

    let outcome = model.find_ss(true).expect("baseline steady state should be found");

    assert!(outcome.max_abs_residual() <= model.par().tol_ss_residual);
    assert!(model.steady_state().q > 0.0 && model.steady_state().q <= 5.0);
    assert_markets_clear(model.steady_state(), 1e-6);
}
