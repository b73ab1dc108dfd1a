//! Stationary household policies by backward iteration.
//!
//! Purpose
//! -------
//! Iterate a [`HouseholdBackward`] kernel on the expected marginal value of
//! assets until the asset policy stops moving.
//!
//! Key behaviors
//! -------------
//! - Each sweep reads `ws.vbeg_a`, writes the new value into a scratch
//!   buffer, and swaps the two, so no array is allocated in the loop.
//! - Convergence is measured as `max |a'_k - a'_{k-1}|` over the whole state
//!   space, starting from the second sweep.
//! - The sup-norm difference of every sweep is recorded in [`SolveStats`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `ws.vbeg_a` holds a positive, finite warm start (see
//!   [`crate::household::init`]) or the result of a previous solve.
//! - On success `ws.policies` and `ws.vbeg_a` are mutually consistent.
use log::{debug, info, trace};

use crate::household::{
    backward::{BackwardContext, BackwardOutput, HouseholdBackward},
    errors::{HouseholdError, HouseholdResult},
    workspace::HouseholdWorkspace,
};

/// Outcome of a converged household solve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolveStats {
    /// Number of backward sweeps performed.
    pub iterations: usize,
    /// Sup-norm policy change of each sweep after the first.
    pub diffs: Vec<f64>,
}

impl SolveStats {
    /// Last recorded policy change, `NaN` if none.
    pub fn last_diff(&self) -> f64 {
        self.diffs.last().copied().unwrap_or(f64::NAN)
    }
}

/// Solve the stationary household problem in place.
///
/// Parameters
/// ----------
/// - `backward`: the Bellman step.
/// - `ctx`: parameters, grids, and prices for the step.
/// - `ws`: workspace holding the warm start; overwritten with the solution.
/// - `do_print`: log the iteration count at `info` level instead of `debug`.
///
/// Returns
/// -------
/// [`SolveStats`] with the number of sweeps and the per-sweep differences.
///
/// Errors
/// ------
/// - Any error from the backward step.
/// - `HouseholdError::SolveNotConverged` when `max_iter_solve` sweeps do not
///   bring the policy change below `tol_solve`.
pub fn solve_hh_ss<B: HouseholdBackward + ?Sized>(
    backward: &B, ctx: &BackwardContext<'_>, ws: &mut HouseholdWorkspace, do_print: bool,
) -> HouseholdResult<SolveStats> {
    let tol = ctx.par.tol_solve;
    let max_iter = ctx.par.max_iter_solve;
    let mut stats = SolveStats::default();

    for it in 0..max_iter {
        let out = BackwardOutput {
            policies: &mut ws.policies,
            vbeg_a: &mut ws.scratch.vbeg_a_next,
            m_endo: &mut ws.scratch.m_endo,
        };
        backward.backward_step(ctx, &ws.vbeg_a, out)?;
        std::mem::swap(&mut ws.vbeg_a, &mut ws.scratch.vbeg_a_next);
        stats.iterations = it + 1;

        if it > 0 {
            let diff = ws
                .policies
                .a
                .iter()
                .zip(ws.scratch.a_prev.iter())
                .fold(0.0_f64, |acc, (&a, &b)| acc.max((a - b).abs()));
            stats.diffs.push(diff);
            trace!("household solve: it = {it}, max|Δa'| = {diff:.3e}");
            if diff < tol {
                if do_print {
                    info!("household problem solved in {} iterations", stats.iterations);
                } else {
                    debug!("household problem solved in {} iterations", stats.iterations);
                }
                return Ok(stats);
            }
        }
        ws.scratch.a_prev.assign(&ws.policies.a);
    }

    Err(HouseholdError::SolveNotConverged { iterations: max_iter, diff: stats.last_diff(), tol })
}
