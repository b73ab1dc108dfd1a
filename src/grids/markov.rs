//! Finite-state discretizations of a log-AR(1) productivity process.
//!
//! Purpose
//! -------
//! Turn `log z' = ρ log z + ψ`, `ψ ~ N(0, σ²)`, into a Markov chain the
//! household block can iterate on: a level grid, a row-stochastic transition
//! matrix, and its stationary distribution.
//!
//! Key behaviors
//! -------------
//! - [`log_rouwenhorst`] (default) matches the unconditional variance and
//!   persistence exactly; its ergodic distribution is Binomial(n-1, 1/2).
//! - [`log_tauchen`] integrates the normal density over grid cells using the
//!   `statrs` normal CDF; its ergodic distribution is found by power iteration.
//! - Both normalize levels so that `Σ ergodic[i] · z[i] = 1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ρ ∈ (-1, 1)`, `σ > 0`, `n ≥ 2`; violations are [`GridError`]s.
//! - Every row of `trans` is non-negative and sums to one within `1e-12`.
//! - `ergodic · trans = ergodic` within `1e-12`.
//!
//! Conventions
//! -----------
//! - `trans[[i, j]]` is the probability of moving from state `i` to `j`.
//! - Cumulative sums are returned alongside (`trans_cumsum`,
//!   `ergodic_cumsum`) for inverse-CDF sampling by simulation code; the
//!   steady-state solver itself does not read them.
//!
//! Testing notes
//! -------------
//! - Unit tests check row sums, stationarity, unit mean, and the symmetry
//!   of the Rouwenhorst grid.
use ndarray::{Array1, Array2, Axis, arr2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Binomial, ContinuousCDF, Discrete, Normal};

use crate::grids::errors::{GridError, GridResult};

/// Row-sum tolerance accepted for a transition matrix.
const ROW_SUM_TOL: f64 = 1e-12;

/// Power-iteration controls for chains without a closed-form ergodic law.
const ERGODIC_TOL: f64 = 1e-15;
const ERGODIC_MAX_ITER: usize = 100_000;

/// Discretization method for the idiosyncratic productivity process.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IncomeProcess {
    /// Rouwenhorst's recursive construction.
    #[default]
    Rouwenhorst,
    /// Tauchen's method with the grid spanning `± width` unconditional std.
    Tauchen { width: f64 },
}

impl IncomeProcess {
    /// Discretize `log z` with persistence `rho` and innovation std `sigma`.
    pub fn discretize(&self, rho: f64, sigma: f64, n: usize) -> GridResult<MarkovChain> {
        match *self {
            IncomeProcess::Rouwenhorst => log_rouwenhorst(rho, sigma, n),
            IncomeProcess::Tauchen { width } => log_tauchen(rho, sigma, n, width),
        }
    }
}

/// Discretized productivity chain.
///
/// Fields
/// ------
/// - `grid`: productivity levels `z_i > 0`, increasing, unit ergodic mean.
/// - `trans`: `n × n` row-stochastic transition matrix.
/// - `ergodic`: stationary distribution, sums to one.
/// - `trans_cumsum`: row-wise cumulative sums of `trans`.
/// - `ergodic_cumsum`: cumulative sum of `ergodic`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovChain {
    pub grid: Array1<f64>,
    pub trans: Array2<f64>,
    pub ergodic: Array1<f64>,
    pub trans_cumsum: Array2<f64>,
    pub ergodic_cumsum: Array1<f64>,
}

impl MarkovChain {
    fn assemble(grid: Array1<f64>, trans: Array2<f64>, ergodic: Array1<f64>) -> Self {
        let mut trans_cumsum = trans.clone();
        trans_cumsum.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
        let mut ergodic_cumsum = ergodic.clone();
        ergodic_cumsum.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);
        MarkovChain { grid, trans, ergodic, trans_cumsum, ergodic_cumsum }
    }
}

/// Rouwenhorst discretization of a log-AR(1), returned in levels.
///
/// Parameters
/// ----------
/// - `rho`: `f64`
///   Persistence, in `(-1, 1)`.
/// - `sigma`: `f64`
///   Standard deviation of the innovation (not of the process), `> 0`.
/// - `n`: `usize`
///   Number of states, `≥ 2`.
///
/// Returns
/// -------
/// `GridResult<MarkovChain>`
///   Log grid spans `± σ_y √(n-1)` with `σ_y = σ / √(1-ρ²)`; levels are
///   `exp(y)` rescaled to unit ergodic mean.
///
/// Errors
/// ------
/// - `GridError::InvalidPersistence`, `InvalidStd`, `TooFewStates` on bad input.
/// - `GridError::Distribution` if `statrs` rejects the binomial parameters.
pub fn log_rouwenhorst(rho: f64, sigma: f64, n: usize) -> GridResult<MarkovChain> {
    validate_ar1(rho, sigma, n)?;

    let sigma_y = sigma / (1.0 - rho * rho).sqrt();
    let psi = sigma_y * ((n - 1) as f64).sqrt();
    let log_grid = Array1::linspace(-psi, psi, n);

    let trans = rouwenhorst_trans(rho, n);

    let binom = Binomial::new(0.5, (n - 1) as u64)?;
    let ergodic = Array1::from_shape_fn(n, |i| binom.pmf(i as u64));

    let grid = unit_mean_levels(&log_grid, &ergodic);
    validate_rows(&trans)?;
    Ok(MarkovChain::assemble(grid, trans, ergodic))
}

/// Tauchen discretization of a log-AR(1), returned in levels.
///
/// The log grid is equally spaced on `± width · σ_y`. Interior cells get the
/// normal mass between midpoints; the two edge cells absorb the tails.
///
/// Errors
/// ------
/// - Same input checks as [`log_rouwenhorst`], plus `InvalidWidth`.
/// - `ErgodicNotConverged` if power iteration fails to settle.
pub fn log_tauchen(rho: f64, sigma: f64, n: usize, width: f64) -> GridResult<MarkovChain> {
    validate_ar1(rho, sigma, n)?;
    if !width.is_finite() || width <= 0.0 {
        return Err(GridError::InvalidWidth { width });
    }

    let sigma_y = sigma / (1.0 - rho * rho).sqrt();
    let edge = width * sigma_y;
    let log_grid = Array1::linspace(-edge, edge, n);
    let half_step = (log_grid[1] - log_grid[0]) / 2.0;

    let innovation = Normal::new(0.0, sigma)?;
    let mut trans = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        let mean = rho * log_grid[i];
        for j in 0..n {
            let upper = innovation.cdf(log_grid[j] + half_step - mean);
            let lower = innovation.cdf(log_grid[j] - half_step - mean);
            trans[[i, j]] = if j == 0 {
                upper
            } else if j == n - 1 {
                1.0 - lower
            } else {
                upper - lower
            };
        }
        let row_sum = trans.row(i).sum();
        trans.row_mut(i).mapv_inplace(|p| p / row_sum);
    }
    validate_rows(&trans)?;

    let ergodic = stationary_distribution(&trans)?;
    let grid = unit_mean_levels(&log_grid, &ergodic);
    Ok(MarkovChain::assemble(grid, trans, ergodic))
}

/// Stationary distribution of a row-stochastic matrix by power iteration.
///
/// Starts from the uniform distribution and iterates `π ← π P` until the
/// sup-norm change drops below `1e-15`.
///
/// Errors
/// ------
/// - `GridError::ErgodicNotConverged` after 100 000 iterations.
pub fn stationary_distribution(trans: &Array2<f64>) -> GridResult<Array1<f64>> {
    let n = trans.nrows();
    let mut dist = Array1::from_elem(n, 1.0 / n as f64);
    let mut diff = f64::INFINITY;
    for _ in 0..ERGODIC_MAX_ITER {
        let mut next = dist.dot(trans);
        let mass = next.sum();
        next.mapv_inplace(|p| p / mass);
        diff = next.iter().zip(dist.iter()).fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()));
        dist = next;
        if diff < ERGODIC_TOL {
            return Ok(dist);
        }
    }
    Err(GridError::ErgodicNotConverged { iterations: ERGODIC_MAX_ITER, diff })
}

// ---- Helper Methods ----

fn validate_ar1(rho: f64, sigma: f64, n: usize) -> GridResult<()> {
    if !rho.is_finite() || rho <= -1.0 || rho >= 1.0 {
        return Err(GridError::InvalidPersistence { rho });
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(GridError::InvalidStd { sigma });
    }
    if n < 2 {
        return Err(GridError::TooFewStates { n });
    }
    Ok(())
}

fn validate_rows(trans: &Array2<f64>) -> GridResult<()> {
    for (row, probs) in trans.rows().into_iter().enumerate() {
        let sum = probs.sum();
        if (sum - 1.0).abs() > ROW_SUM_TOL || probs.iter().any(|&p| p < 0.0 || !p.is_finite()) {
            return Err(GridError::InvalidTransitionRow { row, sum });
        }
    }
    Ok(())
}

/// Recursive Rouwenhorst matrix with `p = q = (1 + ρ) / 2`.
fn rouwenhorst_trans(rho: f64, n: usize) -> Array2<f64> {
    let p = (1.0 + rho) / 2.0;
    let mut trans = arr2(&[[p, 1.0 - p], [1.0 - p, p]]);

    for m in 3..=n {
        let mut next = Array2::<f64>::zeros((m, m));
        for i in 0..m - 1 {
            for j in 0..m - 1 {
                let t = trans[[i, j]];
                next[[i, j]] += p * t;
                next[[i, j + 1]] += (1.0 - p) * t;
                next[[i + 1, j]] += (1.0 - p) * t;
                next[[i + 1, j + 1]] += p * t;
            }
        }
        // Interior rows were counted twice.
        for i in 1..m - 1 {
            next.row_mut(i).mapv_inplace(|v| v / 2.0);
        }
        trans = next;
    }
    trans
}

fn unit_mean_levels(log_grid: &Array1<f64>, ergodic: &Array1<f64>) -> Array1<f64> {
    let levels = log_grid.mapv(f64::exp);
    let mean = levels.dot(ergodic);
    levels / mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_proper_chain(chain: &MarkovChain) {
        for row in chain.trans.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            assert!(row.iter().all(|&p| p >= 0.0));
        }
        let pushed = chain.ergodic.dot(&chain.trans);
        for (a, b) in pushed.iter().zip(chain.ergodic.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(chain.ergodic.sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(chain.grid.dot(&chain.ergodic), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Rouwenhorst chains are proper and stationary across a parameter sweep.
    //
    // Given
    // -----
    // - ρ in {-0.5, 0, 0.9777, 0.99}, σ in {0.05, 0.1928}, n in {2, 3, 7, 11}.
    //
    // Expect
    // ------
    // - Rows sum to one, ergodic · P = ergodic, unit mean productivity.
    fn log_rouwenhorst_is_proper_and_stationary() {
        for &rho in &[-0.5, 0.0, 0.9777, 0.99] {
            for &sigma in &[0.05, 0.1928] {
                for &n in &[2_usize, 3, 7, 11] {
                    let chain = log_rouwenhorst(rho, sigma, n).unwrap();
                    assert_eq!(chain.grid.len(), n);
                    assert_proper_chain(&chain);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // The Rouwenhorst grid is symmetric in logs and increasing.
    //
    // Given
    // -----
    // - Baseline ρ = 0.9777, σ = 0.1928, n = 7.
    //
    // Expect
    // ------
    // - log z_i + log z_{n-1-i} is constant; levels strictly increase.
    fn log_rouwenhorst_grid_is_log_symmetric() {
        let chain = log_rouwenhorst(0.9777, 0.1928, 7).unwrap();
        let logs = chain.grid.mapv(f64::ln);
        let centre = logs[0] + logs[6];
        for i in 0..7 {
            assert_abs_diff_eq!(logs[i] + logs[6 - i], centre, epsilon = 1e-12);
        }
        assert!(chain.grid.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    // Purpose
    // -------
    // Tauchen chains pass the same properness checks.
    //
    // Given
    // -----
    // - ρ = 0.9, σ = 0.1, n = 9, width = 3.
    //
    // Expect
    // ------
    // - Rows sum to one and the power-iterated ergodic law is stationary.
    fn log_tauchen_is_proper_and_stationary() {
        let chain = log_tauchen(0.9, 0.1, 9, 3.0).unwrap();
        assert_proper_chain(&chain);
    }

    #[test]
    // Purpose
    // -------
    // Cumulative auxiliaries end at one.
    //
    // Given
    // -----
    // - A 5-state Rouwenhorst chain.
    //
    // Expect
    // ------
    // - Last column of `trans_cumsum` and last entry of `ergodic_cumsum` equal one.
    fn cumulative_sums_terminate_at_one() {
        let chain = log_rouwenhorst(0.9, 0.2, 5).unwrap();
        for i in 0..5 {
            assert_abs_diff_eq!(chain.trans_cumsum[[i, 4]], 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(chain.ergodic_cumsum[4], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ill-posed processes are rejected before any allocation.
    //
    // Given
    // -----
    // - ρ = 1, σ = 0, n = 1.
    //
    // Expect
    // ------
    // - The matching `GridError` for each.
    fn discretizers_reject_invalid_inputs() {
        assert_eq!(log_rouwenhorst(1.0, 0.1, 5), Err(GridError::InvalidPersistence { rho: 1.0 }));
        assert_eq!(log_rouwenhorst(0.5, 0.0, 5), Err(GridError::InvalidStd { sigma: 0.0 }));
        assert_eq!(log_rouwenhorst(0.5, 0.1, 1), Err(GridError::TooFewStates { n: 1 }));
        assert_eq!(log_tauchen(0.5, 0.1, 5, -1.0), Err(GridError::InvalidWidth { width: -1.0 }));
    }
}
