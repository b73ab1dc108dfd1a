//! Stationary distribution by forward iteration.
//!
//! Purpose
//! -------
//! Given converged asset policies, iterate the law of motion of the
//! beginning-of-period distribution `Dbeg` until it is stationary.
//!
//! Key behaviors
//! -------------
//! - `a'` is mapped onto the asset grid with a lottery: mass at
//!   `(fix, z, a)` goes to the bracketing nodes `j` and `j+1` with weights
//!   `w = (a_{j+1} - a') / (a_{j+1} - a_j)` and `1 - w`, clamped to `[0, 1]`.
//! - One step is `D = Πᵀ Dbeg` per fixed type followed by the lottery.
//! - After convergence `D` is recomputed from the final `Dbeg` and `Dz` is
//!   its productivity marginal.
//!
//! Invariants & assumptions
//! ------------------------
//! - Mass is conserved by construction; any drift above
//!   [`MASS_TOLERANCE`] is reported as `HouseholdError::MassNotConserved`.
//! - Lottery indices and weights are computed once per call.
use log::{debug, info, trace};
use ndarray::{linalg::general_mat_mul, s};

use crate::{
    grids::Grids,
    household::{
        errors::{HouseholdError, HouseholdResult},
        interp::bracket,
        workspace::HouseholdWorkspace,
    },
    model::params::Par,
};

/// Largest tolerated deviation of total mass from one.
pub const MASS_TOLERANCE: f64 = 1e-10;

/// Outcome of a converged distribution simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulateStats {
    pub iterations: usize,
    /// Sup-norm change of `Dbeg` in the final step.
    pub last_diff: f64,
}

/// Iterate `Dbeg` to its stationary distribution in place.
///
/// Errors
/// ------
/// - `HouseholdError::MassNotConserved` if total mass drifts from one.
/// - `HouseholdError::SimulateNotConverged` after `max_iter_simulate` steps.
pub fn simulate_hh_ss(
    par: &Par, grids: &Grids, ws: &mut HouseholdWorkspace, do_print: bool,
) -> HouseholdResult<SimulateStats> {
    let tol = par.tol_simulate;
    let max_iter = par.max_iter_simulate;
    compute_lottery(grids, ws);

    let mut last_diff = f64::NAN;
    for it in 0..max_iter {
        distribute_productivity(grids, ws);
        forward_lottery(ws);

        let diff = ws
            .scratch
            .dbeg_next
            .iter()
            .zip(ws.dbeg.iter())
            .fold(0.0_f64, |acc, (&a, &b)| acc.max((a - b).abs()));
        std::mem::swap(&mut ws.dbeg, &mut ws.scratch.dbeg_next);
        last_diff = diff;

        let mass = ws.dbeg.sum();
        if !((mass - 1.0).abs() <= MASS_TOLERANCE) {
            return Err(HouseholdError::MassNotConserved { mass });
        }
        trace!("household simulate: it = {it}, max|ΔD| = {diff:.3e}");

        if diff < tol {
            distribute_productivity(grids, ws);
            ws.dz.assign(&ws.d.sum_axis(ndarray::Axis(2)));
            let stats = SimulateStats { iterations: it + 1, last_diff };
            if do_print {
                info!("household distribution simulated in {} iterations", stats.iterations);
            } else {
                debug!("household distribution simulated in {} iterations", stats.iterations);
            }
            return Ok(stats);
        }
    }

    Err(HouseholdError::SimulateNotConverged { iterations: max_iter, diff: last_diff, tol })
}

/// Lottery indices and lower-node weights of the current asset policy.
fn compute_lottery(grids: &Grids, ws: &mut HouseholdWorkspace) {
    let a_grid = grids.a_grid.view();
    let lottery_i = &mut ws.scratch.lottery_i;
    let lottery_w = &mut ws.scratch.lottery_w;
    for ((idx, &a_next), w) in ws.policies.a.indexed_iter().zip(lottery_w.iter_mut()) {
        let j = bracket(a_grid, a_next);
        lottery_i[idx] = j;
        *w = ((a_grid[j + 1] - a_next) / (a_grid[j + 1] - a_grid[j])).clamp(0.0, 1.0);
    }
}

/// `D[fix] = Π[fix]ᵀ · Dbeg[fix]` for every fixed type.
fn distribute_productivity(grids: &Grids, ws: &mut HouseholdWorkspace) {
    let n_fix = ws.dbeg.dim().0;
    for fix in 0..n_fix {
        let trans = grids.z_trans.slice(s![fix, .., ..]);
        let dbeg = ws.dbeg.slice(s![fix, .., ..]);
        let mut d = ws.d.slice_mut(s![fix, .., ..]);
        general_mat_mul(1.0, &trans.t(), &dbeg, 0.0, &mut d);
    }
}

/// Move the mass in `D` onto next period's grid, writing `scratch.dbeg_next`.
fn forward_lottery(ws: &mut HouseholdWorkspace) {
    let next = &mut ws.scratch.dbeg_next;
    next.fill(0.0);
    for ((fix, iz, ia), &mass) in ws.d.indexed_iter() {
        if mass == 0.0 {
            continue;
        }
        let j = ws.scratch.lottery_i[[fix, iz, ia]];
        let w = ws.scratch.lottery_w[[fix, iz, ia]];
        next[[fix, iz, j]] += w * mass;
        next[[fix, iz, j + 1]] += (1.0 - w) * mass;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grids::{asset::equilogspace, markov::log_rouwenhorst},
        household::init::initialize_household,
        household::prices::HouseholdPrices,
    };
    use approx::assert_abs_diff_eq;

    fn setup(par: &Par) -> (Grids, HouseholdWorkspace) {
        let mut grids = Grids::allocate(par.n_fix, par.n_z, par.n_a);
        let a_grid = equilogspace(par.a_min, par.a_max, par.n_a).unwrap();
        let chain = log_rouwenhorst(par.rho_z, par.sigma_psi, par.n_z).unwrap();
        grids.fill(&a_grid, &chain).unwrap();
        let mut ws = HouseholdWorkspace::allocate(par.n_fix, par.n_z, par.n_a);
        initialize_household(par, &grids, &HouseholdPrices::initial_guess(par), &mut ws).unwrap();
        (grids, ws)
    }

    /// Savings rule `a' = 0.9 a + 0.5 z`, capped at the grid.
    fn fill_policy(par: &Par, grids: &Grids, ws: &mut HouseholdWorkspace) {
        for ((_, iz, ia), a) in ws.policies.a.indexed_iter_mut() {
            *a = (0.9 * grids.a_grid[ia] + 0.5 * grids.z_grid[iz]).clamp(par.a_min, par.a_max);
        }
    }

    #[test]
    // Purpose
    // -------
    // Simulation conserves mass and reaches a stationary law.
    //
    // Given
    // -----
    // - Nz = 5, Na = 40 and a contracting savings rule.
    //
    // Expect
    // ------
    // - Σ Dbeg = 1 and Σ D = 1 within 1e-10; Dz equals the ergodic law.
    fn simulate_conserves_mass() {
        // Arrange
        let par = Par { n_z: 5, n_a: 40, tol_simulate: 1e-12, ..Par::default() };
        let (grids, mut ws) = setup(&par);
        fill_policy(&par, &grids, &mut ws);

        // Act
        let stats = simulate_hh_ss(&par, &grids, &mut ws, false).unwrap();

        // Assert
        assert!(stats.last_diff < par.tol_simulate);
        assert_abs_diff_eq!(ws.dbeg.sum(), 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(ws.d.sum(), 1.0, epsilon = 1e-10);
        for iz in 0..par.n_z {
            assert_abs_diff_eq!(ws.dz[[0, iz]], grids.z_ergodic[iz], epsilon = 1e-9);
        }
        assert!(ws.dbeg.iter().all(|&m| m >= 0.0));
    }

    #[test]
    // Purpose
    // -------
    // A policy exactly on a grid node puts the whole mass there.
    //
    // Given
    // -----
    // - a' equal to the third grid node everywhere.
    //
    // Expect
    // ------
    // - All mass of Dbeg at asset index 2 after one simulation.
    fn lottery_on_node_is_degenerate() {
        let par = Par { n_z: 3, n_a: 10, ..Par::default() };
        let (grids, mut ws) = setup(&par);
        ws.policies.a.fill(grids.a_grid[2]);

        simulate_hh_ss(&par, &grids, &mut ws, false).unwrap();

        assert_abs_diff_eq!(ws.dbeg.slice(s![.., .., 2]).sum(), 1.0, epsilon = 1e-12);
    }
}
