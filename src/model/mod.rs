//! model: configuration, calibration, and state of the two-sector HANK
//! model.
//!
//! Purpose
//! -------
//! Define what a steady-state solve reads ([`params::Par`]), what it
//! calibrates ([`calibration::Calibration`], [`calibration::Unknowns`]),
//! what it produces ([`steady_state::SteadyState`]), and the owner of all
//! of it ([`hank::HankModel`]).
//!
//! Key behaviors
//! -------------
//! - `Par` is validated once, in `HankModel::new`, and never mutated.
//! - `SteadyState` exposes its variables by name through
//!   [`steady_state::Var`].
//! - [`errors::ModelError`] is the single error surface of the crate's
//!   top-level operations.
//!
//! Conventions
//! -----------
//! - Variable names follow the model (`C_N_hh`, `pm_L`, `Z_L`, ...) in
//!   serialized form and in error messages.

pub mod calibration;
pub mod errors;
pub mod hank;
pub mod params;
pub mod steady_state;

pub mod prelude {
    pub use super::calibration::{Calibration, N_UNKNOWNS, Unknowns};
    pub use super::errors::{ModelError, ModelResult, ParamError, ParamResult};
    pub use super::hank::{EvaluationStats, HankModel};
    pub use super::params::{Par, ShockProcess, Shocks};
    pub use super::steady_state::{SteadyState, Var};
}
