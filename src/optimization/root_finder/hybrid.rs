//! root_finder::hybrid: Powell's hybrid dogleg method as an argmin solver.
//!
//! Purpose
//! -------
//! Solve a square system `f(x) = 0` with a trust-region method in the style
//! of MINPACK's `hybrd`: a dogleg step between Gauss-Newton and steepest
//! descent on `½ ‖f‖²`, a finite-difference Jacobian at the start, and cheap
//! Broyden rank-one updates afterwards.
//!
//! Key behaviors
//! -------------
//! - Step: the Newton step `J p = -f` (nalgebra LU) if it lies inside the
//!   trust region; otherwise the dogleg path through the Cauchy point along
//!   `-Jᵀ f`, cut at radius `Δ`.
//! - Ratio `ρ = ared / pred`, with `ared = ‖f‖² - ‖f(x+p)‖²` and
//!   `pred = ‖f‖² - ‖f + J p‖²`. The step is accepted when `ρ > 1e-4`.
//! - Radius: `Δ ← ½ ‖p‖` when `ρ < 0.1`; `Δ ← 2Δ` when `ρ > 0.75` and the
//!   step reached the boundary.
//! - Jacobian: Broyden update `J ← J + (f⁺ - f - J p) pᵀ / (pᵀ p)` after
//!   every finite trial; a fresh finite-difference Jacobian after two
//!   consecutive rejected steps.
//! - A trial with any non-finite residual (an out-of-domain point) is a
//!   rejected step with `ρ = -1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `self.x`/`self.f` always hold the accepted point and its finite
//!   residual; the executor state mirrors `x` and `cost = ½ ‖f‖²`.
//! - `Δ > 0` until the x-tolerance stop fires.
//!
//! Conventions
//! -----------
//! - Termination is `SolverConverged` when `max |f_i| ≤ tol_residual` and
//!   `SolverExit` when `Δ ≤ tol_x · max(‖x‖, tol_x)`; the executor's
//!   `max_iters` covers the iteration cap.
use argmin::core::{
    Error, Jacobian as ArgminJacobian, KV, Operator, Problem, Solver, State, TerminationReason,
    TerminationStatus,
};
use argmin_math::ArgminL2Norm;
use log::debug;
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::optimization::{
    errors::OptError,
    root_finder::{
        traits::RootOptions,
        types::{Jacobian, Point, Residuals, RootState},
        validation::validate_residuals,
    },
};

const ACCEPT_RATIO: f64 = 1e-4;
const SHRINK_RATIO: f64 = 0.1;
const EXPAND_RATIO: f64 = 0.75;
const REFRESH_AFTER_REJECTIONS: usize = 2;

/// Powell hybrid trust-region solver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PowellHybrid {
    tol_residual: f64,
    tol_x: f64,
    trust_factor: f64,
    delta: f64,
    x: Point,
    f: Residuals,
    jac: Jacobian,
    rejections: usize,
}

impl PowellHybrid {
    /// Build a solver from validated options.
    pub fn new(opts: &RootOptions) -> Self {
        Self {
            tol_residual: opts.tol_residual,
            tol_x: opts.tol_x,
            trust_factor: opts.trust_factor,
            delta: 0.0,
            x: Point::zeros(0),
            f: Residuals::zeros(0),
            jac: Jacobian::zeros((0, 0)),
            rejections: 0,
        }
    }

    /// Current trust radius.
    pub fn trust_radius(&self) -> f64 {
        self.delta
    }
}

impl<O> Solver<O, RootState> for PowellHybrid
where
    O: Operator<Param = Point, Output = Residuals> + ArgminJacobian<Param = Point, Jacobian = Jacobian>,
{
    const NAME: &'static str = "Powell hybrid";

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: RootState,
    ) -> Result<(RootState, Option<KV>), Error> {
        let x0 = state.take_param().ok_or(OptError::MissingInitialGuess)?;
        let f0 = problem.apply(&x0)?;
        validate_residuals(&f0, x0.len())?;
        let jac = problem.jacobian(&x0)?;

        let x_norm = norm(&x0);
        self.delta = if x_norm > 0.0 { self.trust_factor * x_norm } else { self.trust_factor };
        let cost = half_sq_norm(&f0);
        self.x = x0.clone();
        self.f = f0;
        self.jac = jac;
        self.rejections = 0;
        Ok((state.param(x0).cost(cost), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: RootState,
    ) -> Result<(RootState, Option<KV>), Error> {
        let p = dogleg(&self.jac, &self.f, self.delta);
        let p_norm = norm(&p);
        let x_trial = &self.x + &p;
        let f_trial = problem.apply(&x_trial)?;

        let jp = self.jac.dot(&p);
        let f_sq = self.f.dot(&self.f);
        let linear = &self.f + &jp;
        let pred = f_sq - linear.dot(&linear);
        let trial_finite = f_trial.iter().all(|v| v.is_finite());
        let rho = if trial_finite && pred > 0.0 { (f_sq - f_trial.dot(&f_trial)) / pred } else { -1.0 };

        if trial_finite && p_norm > 0.0 {
            let y = &f_trial - &self.f - &jp;
            let pp = p.dot(&p);
            for i in 0..self.jac.nrows() {
                for j in 0..self.jac.ncols() {
                    self.jac[[i, j]] += y[i] * p[j] / pp;
                }
            }
        }

        if rho < SHRINK_RATIO {
            self.delta = 0.5 * p_norm.min(self.delta);
        } else if rho > EXPAND_RATIO && p_norm >= 0.99 * self.delta {
            self.delta *= 2.0;
        }

        if rho > ACCEPT_RATIO {
            self.x = x_trial;
            self.f = f_trial;
            self.rejections = 0;
        } else {
            self.rejections += 1;
            if self.rejections >= REFRESH_AFTER_REJECTIONS {
                self.jac = problem.jacobian(&self.x)?;
                self.rejections = 0;
            }
        }

        debug!(
            "hybrid it {}: ‖f‖ = {:.3e}, ρ = {rho:.3}, Δ = {:.3e}, ‖p‖ = {p_norm:.3e}",
            state.get_iter(),
            norm(&self.f),
            self.delta,
        );
        let cost = half_sq_norm(&self.f);
        Ok((state.param(self.x.clone()).cost(cost), None))
    }

    fn terminate(&mut self, _state: &RootState) -> TerminationStatus {
        let max_abs = self.f.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs <= self.tol_residual {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        if self.delta <= self.tol_x * norm(&self.x).max(self.tol_x) {
            return TerminationStatus::Terminated(TerminationReason::SolverExit(
                "trust region below x tolerance".to_string(),
            ));
        }
        TerminationStatus::NotTerminated
    }
}

/// Dogleg step for the linear model `f + J p` inside radius `delta`.
///
/// Falls back to the (scaled) steepest-descent step when `J` is singular.
/// Returns a zero step when `Jᵀ f = 0` and no Newton step exists.
pub fn dogleg(jac: &Jacobian, f: &Residuals, delta: f64) -> Point {
    let n = f.len();
    let newton = newton_step(jac, f);
    if let Some(p_n) = &newton {
        if norm(p_n) <= delta {
            return p_n.clone();
        }
    }

    let g = jac.t().dot(f);
    let g_norm = norm(&g);
    let jg = jac.dot(&g);
    let jg_sq = jg.dot(&jg);
    if g_norm == 0.0 || jg_sq == 0.0 {
        return match newton {
            Some(p_n) => &p_n * (delta / norm(&p_n)),
            None => Point::zeros(n),
        };
    }

    let t = g_norm * g_norm / jg_sq;
    if t * g_norm >= delta {
        return &g * (-delta / g_norm);
    }
    let p_c = &g * (-t);
    let Some(p_n) = newton else {
        return p_c;
    };

    // ‖p_c + τ (p_n - p_c)‖ = Δ for τ ∈ [0, 1]
    let d = &p_n - &p_c;
    let a = d.dot(&d);
    let b = 2.0 * p_c.dot(&d);
    let c = p_c.dot(&p_c) - delta * delta;
    let disc = (b * b - 4.0 * a * c).max(0.0);
    let tau = if a > 0.0 { ((-b + disc.sqrt()) / (2.0 * a)).clamp(0.0, 1.0) } else { 0.0 };
    &p_c + &(&d * tau)
}

/// Gauss-Newton step `-J⁻¹ f`, `None` if `J` is singular or the step is not
/// finite.
fn newton_step(jac: &Jacobian, f: &Residuals) -> Option<Point> {
    let n = f.len();
    let m = DMatrix::from_fn(n, n, |i, j| jac[[i, j]]);
    let rhs = DVector::from_iterator(n, f.iter().map(|v| -v));
    let sol = m.lu().solve(&rhs)?;
    let step = Array1::from_iter(sol.iter().copied());
    step.iter().all(|v| v.is_finite()).then_some(step)
}

fn norm(v: &Array1<f64>) -> f64 {
    v.l2_norm()
}

fn half_sq_norm(v: &Array1<f64>) -> f64 {
    0.5 * v.dot(v)
}
