//! One step of the household Bellman recursion.
//!
//! Purpose
//! -------
//! Define the seam between the steady-state orchestration and the numerical
//! recursion kernel ([`HouseholdBackward`]), and provide the model's default
//! kernel, [`TwoGoodEgm`], an endogenous-grid step for a household that
//! consumes a CES bundle of necessity and luxury goods and supplies labor.
//!
//! Key behaviors
//! -------------
//! - Read next period's expected marginal value `vbeg_a⁺` and write today's
//!   policies and today's `vbeg_a`.
//! - [`TwoGoodEgm`] inverts the Euler equation on the asset grid, maps the
//!   endogenous grid back to the exogenous one by linear interpolation, and
//!   imposes the borrowing limit `a' ≥ a_min`.
//! - Consumption and hours at each point solve the budget constraint jointly
//!   with the intratemporal labor condition (see [`solve_intratemporal`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `vbeg_a⁺ > 0` and finite everywhere; violations are
//!   `HouseholdError::NonFiniteValue`.
//! - Policies satisfy the budget constraint
//!   `a' + P c + p_N c̄ = (1+r) a + w_N z ell + T(z)` to solver precision.
//!
//! Conventions
//! -----------
//! - Preferences: `u(c, ell) = c^(1-σ)/(1-σ) - φ ell^(1+ν)/(1+ν)`, with `c`
//!   the composite net of subsistence and `φ` the calibrated `varphi`.
//! - Composite demands: `c_N = c̄ + α (p_N/P)^(-γ) c`,
//!   `c_L = (1-α) (p_L/P)^(-γ) c`.
//! - Marginal value: `v_a = (1+r) c^(-σ) / P`; `vbeg_a = Π · v_a` row-wise.
use ndarray::{Array1, Array3, ArrayView1, s};

use crate::{
    grids::Grids,
    household::{
        errors::{HouseholdError, HouseholdResult},
        interp::interp_linear,
        prices::HouseholdPrices,
        workspace::Policies,
    },
    model::{calibration::Calibration, params::Par},
};

/// Bracket for the log of composite consumption in the intratemporal solve.
const LOG_C_LOWER: f64 = -30.0;
const LOG_C_UPPER: f64 = 10.0;
const LOG_C_EXPAND: f64 = 10.0;
const LOG_C_CEILING: f64 = 700.0;
const INTRATEMPORAL_MAX_ITER: usize = 200;

/// Read-only inputs of a backward step.
#[derive(Debug, Clone, Copy)]
pub struct BackwardContext<'a> {
    pub par: &'a Par,
    pub calib: &'a Calibration,
    pub grids: &'a Grids,
    pub prices: &'a HouseholdPrices,
}

/// Outputs of a backward step, borrowed from the model's workspace.
#[derive(Debug)]
pub struct BackwardOutput<'w> {
    pub policies: &'w mut Policies,
    /// Today's expected marginal value of assets.
    pub vbeg_a: &'w mut Array3<f64>,
    /// Scratch for one `(fix, z)` endogenous grid, length `Na`.
    pub m_endo: &'w mut Array1<f64>,
}

/// One Bellman update of the household problem.
///
/// Implementations must be pure in the sense that the outputs depend only on
/// `ctx` and `vbeg_a_plus`; the solver calls the step repeatedly until the
/// asset policy stops changing.
pub trait HouseholdBackward {
    /// Compute policies and today's `vbeg_a` from next period's `vbeg_a_plus`.
    ///
    /// Errors
    /// ------
    /// - Any [`HouseholdError`] describing a numerical failure.
    fn backward_step(
        &self, ctx: &BackwardContext<'_>, vbeg_a_plus: &Array3<f64>, out: BackwardOutput<'_>,
    ) -> HouseholdResult<()>;
}

/// Endogenous-grid step for the two-good household with elastic labor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TwoGoodEgm;

impl HouseholdBackward for TwoGoodEgm {
    fn backward_step(
        &self, ctx: &BackwardContext<'_>, vbeg_a_plus: &Array3<f64>, out: BackwardOutput<'_>,
    ) -> HouseholdResult<()> {
        let BackwardContext { par, calib, grids, prices } = *ctx;
        let BackwardOutput { policies, vbeg_a, m_endo } = out;
        let (n_fix, n_z, n_a) = vbeg_a_plus.dim();

        let gross_r = 1.0 + prices.r;
        let subsistence = prices.p_n * par.c_bar;
        let share_n = par.alpha_hh * (prices.p_n / prices.p).powf(-par.gamma_hh);
        let share_l = (1.0 - par.alpha_hh) * (prices.p_l / prices.p).powf(-par.gamma_hh);
        let labor = LaborSupply {
            p: prices.p,
            varphi: calib.varphi,
            sigma: par.sigma,
            nu: par.nu,
            subsistence,
        };

        for fix in 0..n_fix {
            for iz in 0..n_z {
                let z = grids.z_grid[iz];
                let wz = prices.w_n * z;
                let transfer = prices.transfer(z);

                // a. endogenous grid from the Euler equation
                for ia in 0..n_a {
                    let q = calib.beta * vbeg_a_plus[[fix, iz, ia]];
                    if !q.is_finite() || q <= 0.0 {
                        return Err(HouseholdError::NonFiniteValue {
                            stage: "vbeg_a",
                            fix,
                            z: iz,
                            a: ia,
                            value: vbeg_a_plus[[fix, iz, ia]],
                        });
                    }
                    let c = (prices.p * q).powf(-1.0 / par.sigma);
                    let ell = (wz * q / calib.varphi).powf(1.0 / par.nu);
                    let e = prices.p * c + subsistence;
                    m_endo[ia] = (grids.a_grid[ia] + e - wz * ell - transfer) / gross_r;
                }

                // b. back on the exogenous grid, with the borrowing limit
                for ia in 0..n_a {
                    let a_now = grids.a_grid[ia];
                    let a_next =
                        interp_linear(m_endo.view(), grids.a_grid.view(), a_now).max(par.a_min);
                    let cash = gross_r * a_now + transfer - a_next;
                    let c = solve_intratemporal(cash, wz, &labor)?;
                    let ell = labor.hours(c, wz);

                    let idx = [fix, iz, ia];
                    policies.a[idx] = a_next;
                    policies.c[idx] = c;
                    policies.c_hat_n[idx] = share_n * c;
                    policies.c_n[idx] = par.c_bar + share_n * c;
                    policies.c_l[idx] = share_l * c;
                    policies.ell[idx] = ell;
                    policies.n[idx] = z * ell;
                    policies.e[idx] = prices.p * c + subsistence;
                    policies.u[idx] = utility(c, ell, calib.varphi, par.sigma, par.nu);
                }
            }

            // c. expected marginal value of assets
            for iz in 0..n_z {
                let row = grids.z_trans.slice(s![fix, iz, ..]);
                for ia in 0..n_a {
                    let c_col: ArrayView1<'_, f64> = policies.c.slice(s![fix, .., ia]);
                    let expected = row
                        .iter()
                        .zip(c_col.iter())
                        .map(|(&prob, &c)| prob * c.powf(-par.sigma))
                        .sum::<f64>();
                    vbeg_a[[fix, iz, ia]] = gross_r * expected / prices.p;
                }
            }
        }
        Ok(())
    }
}

/// Constants of the intratemporal condition at given prices.
#[derive(Debug, Clone, Copy)]
pub struct LaborSupply {
    /// Consumer price index.
    pub p: f64,
    pub varphi: f64,
    pub sigma: f64,
    pub nu: f64,
    /// Nominal subsistence spending `p_N c̄`.
    pub subsistence: f64,
}

impl LaborSupply {
    /// Hours from the labor condition `φ ell^ν = w z c^(-σ) / P`.
    #[inline]
    pub fn hours(&self, c: f64, wz: f64) -> f64 {
        (wz * c.powf(-self.sigma) / (self.p * self.varphi)).powf(1.0 / self.nu)
    }
}

/// Solve `P c + p_N c̄ - w z ell(c) = cash` for composite consumption `c`.
///
/// The left-hand side is strictly increasing in `log c`, so a safeguarded
/// Newton iteration in `log c` with a bisection fallback always converges
/// once the root is bracketed. The initial bracket `[-30, 10]` is widened
/// upwards when cash-on-hand is very large.
///
/// Errors
/// ------
/// - `HouseholdError::IntratemporalNotConverged` if the root cannot be
///   bracketed or the iteration cap is hit.
pub fn solve_intratemporal(cash: f64, wz: f64, labor: &LaborSupply) -> HouseholdResult<f64> {
    let residual = |log_c: f64| -> (f64, f64) {
        let c = log_c.exp();
        let ell = labor.hours(c, wz);
        let value = labor.p * c + labor.subsistence - wz * ell - cash;
        let slope = labor.p * c + wz * ell * labor.sigma / labor.nu;
        (value, slope)
    };

    let mut lo = LOG_C_LOWER;
    let mut hi = LOG_C_UPPER;
    while residual(hi).0 < 0.0 {
        lo = hi;
        hi += LOG_C_EXPAND;
        if hi > LOG_C_CEILING {
            return Err(HouseholdError::IntratemporalNotConverged { cash, residual: f64::NAN });
        }
    }

    let tol = 1e-13 * (1.0 + cash.abs());
    let mut log_c = 0.0_f64.clamp(lo, hi);
    let mut value = f64::NAN;
    for _ in 0..INTRATEMPORAL_MAX_ITER {
        let (f, df) = residual(log_c);
        value = f;
        if f.abs() <= tol {
            return Ok(log_c.exp());
        }
        if f > 0.0 {
            hi = log_c;
        } else {
            lo = log_c;
        }
        let newton = log_c - f / df;
        log_c = if newton > lo && newton < hi { newton } else { 0.5 * (lo + hi) };
        if hi - lo < 1e-15 {
            return Ok(log_c.exp());
        }
    }
    Err(HouseholdError::IntratemporalNotConverged { cash, residual: value })
}

/// Period utility.
#[inline]
pub fn utility(c: f64, ell: f64, varphi: f64, sigma: f64, nu: f64) -> f64 {
    let u_c = if (sigma - 1.0).abs() < 1e-12 { c.ln() } else { c.powf(1.0 - sigma) / (1.0 - sigma) };
    u_c - varphi * ell.powf(1.0 + nu) / (1.0 + nu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labor() -> LaborSupply {
        LaborSupply { p: 1.2, varphi: 1.0, sigma: 2.0, nu: 2.0, subsistence: 0.05 }
    }

    #[test]
    // Purpose
    // -------
    // The intratemporal solution satisfies the budget identity.
    //
    // Given
    // -----
    // - Cash-on-hand in {0, 0.3, 50} and w z = 0.4.
    //
    // Expect
    // ------
    // - `P c + p_N c̄ - w z ell(c) = cash` to 1e-10 relative.
    fn solve_intratemporal_satisfies_budget() {
        let labor = labor();
        let wz = 0.4;
        for &cash in &[0.0, 0.3, 50.0] {
            let c = solve_intratemporal(cash, wz, &labor).unwrap();
            let spent = labor.p * c + labor.subsistence - wz * labor.hours(c, wz);
            assert_relative_eq!(spent, cash, epsilon = 1e-10, max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Consumption rises and hours fall with cash-on-hand.
    //
    // Given
    // -----
    // - Two cash levels 0.1 < 1.0.
    //
    // Expect
    // ------
    // - c(1.0) > c(0.1) and ell(1.0) < ell(0.1).
    fn intratemporal_solution_is_monotone_in_cash() {
        let labor = labor();
        let wz = 0.4;

        let c_low = solve_intratemporal(0.1, wz, &labor).unwrap();
        let c_high = solve_intratemporal(1.0, wz, &labor).unwrap();

        assert!(c_high > c_low);
        assert!(labor.hours(c_high, wz) < labor.hours(c_low, wz));
    }

    #[test]
    // Purpose
    // -------
    // Log utility is used at unit curvature.
    //
    // Given
    // -----
    // - σ = 1, ell = 0.
    //
    // Expect
    // ------
    // - `u = ln c`.
    fn utility_uses_log_at_unit_curvature() {
        assert_relative_eq!(utility(2.0, 0.0, 1.0, 1.0, 2.0), 2.0_f64.ln());
    }
}
