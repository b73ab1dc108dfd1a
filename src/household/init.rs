//! Initial distribution and marginal-value guess for the household block.
//!
//! Purpose
//! -------
//! Seed the arrays the household solver warm-starts from:
//! - `Dbeg`/`Dz`: every fixed type gets `1/Nfix` of the ergodic productivity
//!   distribution, with all mass at the lowest asset point (households start
//!   with no wealth).
//! - `vbeg_a`: the expected marginal utility of a hand-to-mouth plan that
//!   consumes all income and interest, `c = (1+r) a + w_N z + T(z)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - After seeding, `Σ Dbeg = 1` and `Dbeg ≥ 0`.
//! - `vbeg_a > 0` and finite; non-positive hand-to-mouth consumption is
//!   floored at [`HAND_TO_MOUTH_FLOOR`].
//!
//! Notes
//! -----
//! This is a warm start, not a solution. The backward iteration still runs
//! to its own fixed point from here.
use ndarray::{Array2, s};

use crate::{
    grids::Grids,
    household::{
        errors::{HouseholdError, HouseholdResult},
        prices::HouseholdPrices,
        workspace::HouseholdWorkspace,
    },
    model::params::Par,
};

/// Smallest consumption used when building the initial marginal value.
pub const HAND_TO_MOUTH_FLOOR: f64 = 1e-8;

/// Seed `Dbeg`, `D`, `Dz`, and `vbeg_a` in place.
///
/// Parameters
/// ----------
/// - `par`: model configuration (`sigma`).
/// - `grids`: filled asset grid and productivity chain.
/// - `guess`: prices used for the hand-to-mouth plan.
/// - `ws`: household workspace to overwrite.
///
/// Errors
/// ------
/// - `HouseholdError::InvalidPrice` if the guess fails
///   [`HouseholdPrices::validate`].
/// - `HouseholdError::NonFiniteValue` if a marginal value is not finite.
pub fn initialize_household(
    par: &Par, grids: &Grids, guess: &HouseholdPrices, ws: &mut HouseholdWorkspace,
) -> HouseholdResult<()> {
    guess.validate()?;
    let (n_fix, n_z, n_a) = ws.shape();
    let share = 1.0 / n_fix as f64;

    // a. distribution
    ws.dbeg.fill(0.0);
    for fix in 0..n_fix {
        for iz in 0..n_z {
            let mass = grids.z_ergodic[iz] * share;
            ws.dz[[fix, iz]] = mass;
            ws.dbeg[[fix, iz, 0]] = mass;
        }
    }
    ws.d.assign(&ws.dbeg);

    // b. marginal value of a hand-to-mouth plan
    let mut va = Array2::<f64>::zeros((n_z, n_a));
    for fix in 0..n_fix {
        for iz in 0..n_z {
            let z = grids.z_grid[iz];
            let income = guess.w_n * z + guess.transfer(z);
            for ia in 0..n_a {
                let c = ((1.0 + guess.r) * grids.a_grid[ia] + income).max(HAND_TO_MOUTH_FLOOR);
                va[[iz, ia]] = c.powf(-par.sigma);
            }
        }
        let expected = grids.z_trans.slice(s![fix, .., ..]).dot(&va);
        if let Some(((iz, ia), &value)) = expected.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(HouseholdError::NonFiniteValue { stage: "vbeg_a", fix, z: iz, a: ia, value });
        }
        ws.vbeg_a.slice_mut(s![fix, .., ..]).assign(&expected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grids::{asset::equilogspace, markov::log_rouwenhorst};
    use approx::assert_abs_diff_eq;

    fn small_setup(n_fix: usize) -> (Par, Grids, HouseholdWorkspace) {
        let par = Par { n_fix, n_z: 5, n_a: 30, ..Par::default() };
        let mut grids = Grids::allocate(par.n_fix, par.n_z, par.n_a);
        let a_grid = equilogspace(par.a_min, par.a_max, par.n_a).unwrap();
        let chain = log_rouwenhorst(par.rho_z, par.sigma_psi, par.n_z).unwrap();
        grids.fill(&a_grid, &chain).unwrap();
        let ws = HouseholdWorkspace::allocate(par.n_fix, par.n_z, par.n_a);
        (par, grids, ws)
    }

    #[test]
    // Purpose
    // -------
    // Initial mass is the ergodic distribution at zero assets.
    //
    // Given
    // -----
    // - Two fixed types, five productivity states, 30 asset points.
    //
    // Expect
    // ------
    // - Total mass one; mass only in the first asset column; each type holds
    //   half of the ergodic law.
    fn initial_distribution_is_ergodic_at_zero_assets() {
        // Arrange
        let (par, grids, mut ws) = small_setup(2);
        let guess = HouseholdPrices::initial_guess(&par);

        // Act
        initialize_household(&par, &grids, &guess, &mut ws).unwrap();

        // Assert
        assert_abs_diff_eq!(ws.dbeg.sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ws.dbeg.slice(s![.., .., 1..]).sum(), 0.0);
        for iz in 0..par.n_z {
            assert_abs_diff_eq!(ws.dbeg[[1, iz, 0]], grids.z_ergodic[iz] / 2.0, epsilon = 1e-15);
        }
    }

    #[test]
    // Purpose
    // -------
    // The marginal-value guess is positive and decreasing in wealth.
    //
    // Given
    // -----
    // - Baseline preferences on a small grid.
    //
    // Expect
    // ------
    // - `vbeg_a > 0` and strictly decreasing along the asset axis.
    fn initial_marginal_value_is_positive_and_decreasing() {
        let (par, grids, mut ws) = small_setup(1);
        let guess = HouseholdPrices::initial_guess(&par);

        initialize_household(&par, &grids, &guess, &mut ws).unwrap();

        for iz in 0..par.n_z {
            let row = ws.vbeg_a.slice(s![0, iz, ..]);
            assert!(row.iter().all(|&v| v > 0.0 && v.is_finite()));
            assert!(row.windows(2).into_iter().all(|w| w[1] < w[0]));
        }
    }
}
