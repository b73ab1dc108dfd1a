//! Human-readable summary of a solved steady state.
//!
//! [`SteadyStateReport`] is a plain record built from the model after the
//! final evaluation; its `Display` renders the unknowns, the market-clearing
//! discrepancies, and a sector table. `find_ss` logs it at `info` when asked
//! to print.
use std::{fmt, time::Duration};

use serde::Serialize;

use crate::{
    household::backward::HouseholdBackward,
    model::{calibration::Unknowns, hank::HankModel, steady_state::SteadyState},
};

/// One row of the sector table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorRow {
    pub name: &'static str,
    pub necessity: f64,
    pub luxury: f64,
}

/// Market-clearing discrepancies, reported as `aggregate - household`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Discrepancies {
    /// `A - A_hh`.
    pub assets: f64,
    /// `C - C_hh`.
    pub consumption: f64,
    /// `C_L - C_L_hh`.
    pub luxury: f64,
    /// `C_N - C_N_hh`.
    pub necessity: f64,
    /// `N_L + N_N - N_hh`.
    pub labor: f64,
}

impl Discrepancies {
    pub fn from_steady_state(ss: &SteadyState) -> Self {
        Discrepancies {
            assets: ss.a - ss.a_hh,
            consumption: ss.c - ss.c_hh,
            luxury: ss.c_l - ss.c_l_hh,
            necessity: ss.c_n - ss.c_n_hh,
            labor: ss.n_l + ss.n_n - ss.n_hh,
        }
    }

    /// Largest absolute discrepancy.
    pub fn max_abs(&self) -> f64 {
        [self.assets, self.consumption, self.luxury, self.necessity, self.labor]
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }
}

/// Summary of a steady state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SteadyStateReport {
    pub elapsed: Duration,
    pub root_iterations: u64,
    pub evaluations: u64,
    pub solve_iterations: usize,
    pub simulate_iterations: usize,
    pub unknowns: Unknowns,
    pub varphi: f64,
    pub p: f64,
    pub z_n: f64,
    pub ell_hh: f64,
    pub discrepancies: Discrepancies,
    pub sectors: Vec<SectorRow>,
}

impl SteadyStateReport {
    /// Collect the report from the model's current state.
    pub fn from_model<B: HouseholdBackward>(
        model: &HankModel<B>, root_iterations: u64, elapsed: Duration,
    ) -> Self {
        let ss = model.steady_state();
        let stats = model.stats();
        let row = |name, necessity, luxury| SectorRow { name, necessity, luxury };
        SteadyStateReport {
            elapsed,
            root_iterations,
            evaluations: stats.evaluations,
            solve_iterations: stats.last_solve.as_ref().map_or(0, |s| s.iterations),
            simulate_iterations: stats.last_simulate.map_or(0, |s| s.iterations),
            unknowns: model.unknowns(),
            varphi: model.calibration().varphi,
            p: ss.p,
            z_n: ss.z_n,
            ell_hh: ss.ell_hh,
            discrepancies: Discrepancies::from_steady_state(ss),
            sectors: vec![
                row("Y", ss.y_n, ss.y_l),
                row("N", ss.n_n, ss.n_l),
                row("M", ss.m_n, ss.m_l),
                row("mc", ss.mc_n, ss.mc_l),
                row("d", ss.d_n, ss.d_l),
                row("C", ss.c_n, ss.c_l),
                row("w", ss.w_n, ss.w_l),
                row("pm", ss.pm_n, ss.pm_l),
                row("pi", ss.pi_n, ss.pi_l),
            ],
        }
    }
}

impl fmt::Display for SteadyStateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "steady state found in {:.2?} ({} root iterations, {} evaluations)",
            self.elapsed, self.root_iterations, self.evaluations
        )?;
        writeln!(
            f,
            "household converged in {} solve and {} simulate iterations",
            self.solve_iterations, self.simulate_iterations
        )?;
        writeln!(f, " Q      = {:8.4}", self.unknowns.q)?;
        writeln!(f, " P      = {:8.4}", self.p)?;
        writeln!(f, " Z_N    = {:8.4}", self.z_n)?;
        writeln!(f, " Z_L    = {:8.4}", self.unknowns.z_l)?;
        writeln!(f, " ELL_hh = {:8.4}", self.ell_hh)?;
        writeln!(f, " varphi = {:8.4}", self.varphi)?;
        writeln!(f, " beta   = {:8.4}", self.unknowns.beta)?;

        let d = &self.discrepancies;
        writeln!(f, "Discrepancy in B   = {:12.8}", d.assets)?;
        writeln!(f, "Discrepancy in C   = {:12.8}", d.consumption)?;
        writeln!(f, "Discrepancy in C_L = {:12.8}", d.luxury)?;
        writeln!(f, "Discrepancy in C_N = {:12.8}", d.necessity)?;
        writeln!(f, "Discrepancy in N   = {:12.8}", d.labor)?;

        writeln!(f, "{:>6} {:>10} {:>10}", "", "N", "L")?;
        for row in &self.sectors {
            writeln!(f, "{:>6} {:>10.4} {:>10.4}", row.name, row.necessity, row.luxury)?;
        }
        Ok(())
    }
}
