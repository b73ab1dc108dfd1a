//! root_finder: argmin-powered solver for square nonlinear systems.
//!
//! Purpose
//! -------
//! Find `x` with `f(x) = 0` for a system of `n` equations in `n` unknowns
//! whose residual function is expensive, possibly undefined on part of the
//! space, and has no analytic Jacobian. Callers implement
//! [`ResidualSystem`] and call [`solve_root`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::RootAdapter`] exposes the system to argmin as an `Operator`
//!   with a finite-difference `Jacobian`, and turns out-of-domain points
//!   into NaN residuals.
//! - [`hybrid::PowellHybrid`] is a dogleg trust-region solver with Broyden
//!   updates, implemented as an `argmin::core::Solver`.
//! - [`run::run_hybrid`] drives it through `argmin::core::Executor` and
//!   normalizes the final state into a [`RootOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The residual at the starting point must be finite.
//! - Only errors for which [`ResidualSystem::is_out_of_domain`] is `true`
//!   are absorbed as rejected steps; every other error aborts the search and
//!   is returned as the system's own error type.
//! - [`RootOptions`] is validated on construction.
//!
//! Conventions
//! -----------
//! - An outcome with `converged == false` is not an error at this layer.
//!   Callers that need a root check `converged` or the residual themselves.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the dogleg step, finite-difference fallbacks, the
//!   adapter cache, and full solves of small classic systems including one
//!   with an undefined region.

pub mod adapter;
pub mod api;
pub mod finite_diff;
pub mod hybrid;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::solve_root;
pub use self::traits::{ResidualSystem, RootOptions, RootOutcome};
pub use self::types::{FnEvalMap, Jacobian, Point, Residuals};

pub mod prelude {
    pub use super::api::solve_root;
    pub use super::hybrid::PowellHybrid;
    pub use super::traits::{ResidualSystem, RootOptions, RootOutcome};
    pub use super::types::{Point, Residuals};
}
