//! optimization: root finding for the steady-state search and its error
//! surface.
//!
//! Purpose
//! -------
//! Provide the outer solver of the steady state: an argmin-backed Powell
//! hybrid root finder for square nonlinear systems, together with a single
//! error/result surface for configuration mistakes, numerical failures, and
//! backend errors.
//!
//! Key behaviors
//! -------------
//! - `root_finder` exposes [`root_finder::ResidualSystem`] and
//!   [`root_finder::solve_root`]; model code implements the trait and never
//!   touches argmin directly.
//! - `errors::OptError` normalizes argmin errors and solver-side failures,
//!   with the common alias `OptResult<T>`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Residual systems report domain trouble as recoverable errors, never
//!   panics.
//! - The solver logs through the `log` facade at `debug` level only; stage
//!   summaries are the caller's business.
//!
//! Downstream usage
//! ----------------
//! - `equilibrium::find` implements `ResidualSystem` for the HANK model and
//!   runs `solve_root` from the initial guess `[Z_L, beta, Q]`.
//!
//! Testing notes
//! -------------
//! - `root_finder` tests solve small classic systems; `errors` tests the
//!   argmin round trip.

pub mod errors;
pub mod root_finder;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hank::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::root_finder::prelude::*;
}
