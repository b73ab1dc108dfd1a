//! root_finder::types: numeric aliases shared by the root-finding layer.
//!
//! Purpose
//! -------
//! Keep `ndarray` and argmin generics in one place so the solver, adapter,
//! and runner agree on the shapes of points, residuals, and Jacobians.
//!
//! Conventions
//! -----------
//! - A system of `n` equations in `n` unknowns: `Point` and `Residuals` have
//!   length `n`, `Jacobian` is `n × n` with `J[i, j] = ∂f_i / ∂x_j`.
//! - The solver's scalar cost is `½ ‖f‖²`.
use argmin::core::IterState;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Trial point `x`.
pub type Point = Array1<f64>;

/// Residual vector `f(x)`.
pub type Residuals = Array1<f64>;

/// Dense Jacobian `∂f/∂x`.
pub type Jacobian = Array2<f64>;

/// Function-evaluation counters as reported by argmin
/// (`"operator_count"`, `"jacobian_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Iteration state carried by the executor: the current point and `½ ‖f‖²`.
pub type RootState = IterState<Point, (), (), (), (), f64>;
