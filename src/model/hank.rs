//! HankModel: owner of every piece of mutable steady-state state.
//!
//! Purpose
//! -------
//! Bundle the fixed configuration, the grids, the calibrated preferences,
//! the steady-state record, and the household workspace into one value so
//! the evaluator and the root finder can thread `&mut HankModel` instead of
//! sharing globals.
//!
//! Key behaviors
//! -------------
//! - [`HankModel::new`] validates [`Par`] and allocates every array once.
//! - [`HankModel::prepare_hh_ss`] builds the asset grid and productivity
//!   chain and seeds the household warm start. It must run before any
//!   evaluation.
//! - [`HankModel::find_ss`] and [`HankModel::evaluate_at`] forward to the
//!   equilibrium layer.
//!
//! Invariants & assumptions
//! ------------------------
//! - Array shapes are fixed at construction from `(Nfix, Nz, Na)`.
//! - `prepared` is set only after the grids and the warm start are both
//!   filled successfully.
//! - The household backward step is a type parameter; the default is the
//!   two-good endogenous-grid method.
//!
//! Conventions
//! -----------
//! - Fields are `pub(crate)` so the equilibrium layer can borrow disjoint
//!   parts at once; external callers use the accessors.
use log::info;

use crate::{
    equilibrium::{
        evaluate::objective_ss,
        find::{SteadyStateOutcome, find_ss},
    },
    grids::{Grids, asset::equilogspace},
    household::{
        backward::{HouseholdBackward, TwoGoodEgm},
        init::initialize_household,
        prices::HouseholdPrices,
        simulate::SimulateStats,
        solve::SolveStats,
        workspace::HouseholdWorkspace,
    },
    model::{
        calibration::{Calibration, Unknowns},
        errors::ModelResult,
        params::Par,
        steady_state::SteadyState,
    },
};

/// Counters and inner-loop statistics of the most recent evaluations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationStats {
    /// Number of completed equilibrium evaluations since construction.
    pub evaluations: u64,
    pub last_solve: Option<SolveStats>,
    pub last_simulate: Option<SimulateStats>,
}

/// Two-sector HANK model in its steady-state configuration.
#[derive(Debug, Clone)]
pub struct HankModel<B: HouseholdBackward = TwoGoodEgm> {
    pub(crate) par: Par,
    pub(crate) grids: Grids,
    pub(crate) calib: Calibration,
    pub(crate) ss: SteadyState,
    pub(crate) hh: HouseholdWorkspace,
    pub(crate) backward: B,
    pub(crate) stats: EvaluationStats,
    pub(crate) prepared: bool,
}

impl HankModel<TwoGoodEgm> {
    /// Validate `par` and allocate a model with the default household step.
    ///
    /// Errors
    /// ------
    /// - `ModelError::Param` if [`Par::validate`] fails.
    pub fn new(par: Par) -> ModelResult<Self> {
        Self::with_backward(par, TwoGoodEgm)
    }
}

impl<B: HouseholdBackward> HankModel<B> {
    /// Validate `par` and allocate a model that uses `backward` for the
    /// household Bellman step.
    ///
    /// Errors
    /// ------
    /// - `ModelError::Param` if [`Par::validate`] fails.
    pub fn with_backward(par: Par, backward: B) -> ModelResult<Self> {
        par.validate()?;
        let grids = Grids::allocate(par.n_fix, par.n_z, par.n_a);
        let hh = HouseholdWorkspace::allocate(par.n_fix, par.n_z, par.n_a);
        let calib = Calibration::from_par(&par);
        Ok(HankModel {
            par,
            grids,
            calib,
            ss: SteadyState::default(),
            hh,
            backward,
            stats: EvaluationStats::default(),
            prepared: false,
        })
    }

    /// Build the grids and seed the household block.
    ///
    /// The asset grid is `equilogspace(a_min, a_max, Na)`; the productivity
    /// chain follows `par.income_process`. The warm start uses
    /// [`HouseholdPrices::initial_guess`].
    ///
    /// Errors
    /// ------
    /// - `ModelError::Grid` if the grid or chain cannot be built.
    /// - `ModelError::Household` if the warm start is not finite.
    pub fn prepare_hh_ss(&mut self) -> ModelResult<()> {
        let par = &self.par;
        let a_grid = equilogspace(par.a_min, par.a_max, par.n_a)?;
        let chain = par.income_process.discretize(par.rho_z, par.sigma_psi, par.n_z)?;
        self.grids.fill(&a_grid, &chain)?;

        let guess = HouseholdPrices::initial_guess(par);
        initialize_household(par, &self.grids, &guess, &mut self.hh)?;
        self.prepared = true;
        info!(
            "household block prepared: Nfix = {}, Nz = {}, Na = {}, a in [{}, {}]",
            par.n_fix, par.n_z, par.n_a, par.a_min, par.a_max
        );
        Ok(())
    }

    /// Find the steady state. See [`crate::equilibrium::find::find_ss`].
    ///
    /// Errors
    /// ------
    /// - Anything `find_ss` reports.
    pub fn find_ss(&mut self, do_print: bool) -> ModelResult<SteadyStateOutcome> {
        find_ss(self, do_print)
    }

    /// Evaluate the equilibrium residuals at `x`, leaving the steady-state
    /// record at that point.
    ///
    /// Errors
    /// ------
    /// - Anything `objective_ss` reports.
    pub fn evaluate_at(&mut self, x: &Unknowns, do_print: bool) -> ModelResult<[f64; 3]> {
        objective_ss(self, x, do_print)
    }

    pub fn par(&self) -> &Par {
        &self.par
    }

    pub fn grids(&self) -> &Grids {
        &self.grids
    }

    /// Calibrated preferences after the most recent evaluation.
    pub fn calibration(&self) -> &Calibration {
        &self.calib
    }

    /// Steady-state record after the most recent evaluation.
    pub fn steady_state(&self) -> &SteadyState {
        &self.ss
    }

    pub fn household(&self) -> &HouseholdWorkspace {
        &self.hh
    }

    pub fn stats(&self) -> &EvaluationStats {
        &self.stats
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Current value of the unknowns `[Z_L, beta, Q]`.
    pub fn unknowns(&self) -> Unknowns {
        Unknowns { z_l: self.ss.z_l, beta: self.calib.beta, q: self.ss.q }
    }
}
