//! equilibrium: steady-state evaluator and outer search of the HANK model.
//!
//! Purpose
//! -------
//! Turn a trial `[Z_L, beta, Q]` into a complete steady-state record and its
//! market-clearing residuals, and search for the point where those
//! residuals vanish.
//!
//! Key behaviors
//! -------------
//! - [`projection`] keeps trial values inside the region where the
//!   closed-form equations are defined.
//! - [`blocks::FirmBlock`] solves both production sectors in closed form.
//! - [`evaluate::objective_ss`] runs projection, firms, government,
//!   households, and market clearing, and returns the residuals.
//! - [`find::find_ss`] runs the Powell hybrid root finder on the model and
//!   validates the final residual.
//! - [`report::SteadyStateReport`] summarizes the result.
//!
//! Invariants & assumptions
//! ------------------------
//! - The model must be prepared (`HankModel::prepare_hh_ss`) before any
//!   evaluation.
//! - Domain violations are recoverable during the search and fatal only at
//!   the starting point or the final point.
//!
//! Downstream usage
//! ----------------
//! - `HankModel::find_ss` and `HankModel::evaluate_at` forward here; the
//!   binary and the Python bindings call those.
//!
//! Testing notes
//! -------------
//! - Unit tests cover projection, the firm block, accounting identities of
//!   a single evaluation, and error routing. End-to-end searches live in
//!   `tests/integration_steady_state.rs`.

pub mod blocks;
pub mod evaluate;
pub mod find;
pub mod projection;
pub mod report;

pub mod prelude {
    pub use super::blocks::{FirmBlock, consumer_price_index};
    pub use super::evaluate::{evaluate_ss, objective_ss};
    pub use super::find::{SteadyStateOutcome, find_ss, root_options};
    pub use super::projection::{Interval, Q_INTERVAL, VARPHI_INTERVAL, Y_L_INTERVAL, beta_interval, project};
    pub use super::report::{Discrepancies, SectorRow, SteadyStateReport};
}
