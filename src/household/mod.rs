//! household: heterogeneous-agent block of the steady state.
//!
//! Purpose
//! -------
//! Solve the stationary consumption-savings-labor problem of households that
//! face idiosyncratic productivity risk, find the stationary distribution
//! over `(fix, z, a)`, and aggregate policies into the `*_hh` variables the
//! equilibrium evaluator compares against the firm block.
//!
//! Key behaviors
//! -------------
//! - [`init::initialize_household`] seeds the distribution and a marginal
//!   value guess.
//! - [`solve::solve_hh_ss`] iterates a [`backward::HouseholdBackward`] step
//!   (by default [`backward::TwoGoodEgm`]) to a fixed point.
//! - [`simulate::simulate_hh_ss`] iterates the lottery law of motion to the
//!   stationary distribution.
//! - [`aggregate::HouseholdAggregates`] sums policies against that
//!   distribution.
//!
//! Invariants & assumptions
//! ------------------------
//! - All arrays live in a pre-allocated [`workspace::HouseholdWorkspace`];
//!   nothing is reallocated inside the solve or simulate loops.
//! - The distribution has unit mass and is non-negative at every step.
//! - Inner non-convergence is reported as a [`errors::HouseholdError`].
//!
//! Conventions
//! -----------
//! - Arrays are indexed `[fix, z, a]`.
//! - Prices come in as [`prices::HouseholdPrices`], in necessity-good units.
//!
//! Downstream usage
//! ----------------
//! - `model::HankModel` owns the workspace and calls `solve_hh_ss`,
//!   `simulate_hh_ss`, and aggregation from the equilibrium evaluator.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the intratemporal solve, contraction of the backward
//!   iteration, mass conservation, and aggregation weights.

pub mod aggregate;
pub mod backward;
pub mod errors;
pub mod init;
pub mod interp;
pub mod prices;
pub mod simulate;
pub mod solve;
pub mod workspace;

pub mod prelude {
    pub use super::aggregate::HouseholdAggregates;
    pub use super::backward::{
        BackwardContext, BackwardOutput, HouseholdBackward, LaborSupply, TwoGoodEgm,
        solve_intratemporal, utility,
    };
    pub use super::errors::{HouseholdError, HouseholdResult};
    pub use super::init::initialize_household;
    pub use super::prices::HouseholdPrices;
    pub use super::simulate::{SimulateStats, simulate_hh_ss};
    pub use super::solve::{SolveStats, solve_hh_ss};
    pub use super::workspace::{HouseholdWorkspace, Policies};
}
