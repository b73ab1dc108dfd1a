//! Projection of trial values into the model's admissible region.
//!
//! Purpose
//! -------
//! The closed-form firm and price equations take fractional powers of `Q`,
//! `Y_L`, and preference parameters. Trial points proposed by the root
//! finder are projected back into per-variable intervals before any of
//! those equations run.
//!
//! Key behaviors
//! -------------
//! - Every variable has an [`Interval`]: values at or below `lower` become
//!   `floor`, values above `upper` become `upper`, values inside are kept.
//! - Projection is a pure function of the trial value; clamping is logged at
//!   `warn` level by [`project`].
//! - Non-finite trial values are not projected; they are reported as
//!   `ModelError::DomainViolation`.
//!
//! Conventions
//! -----------
//! - The `beta` ceiling depends on `r`: `beta ≤ 1/(1+r)` keeps the
//!   household problem's asset demand bounded.
use log::warn;

use crate::model::errors::{ModelError, ModelResult};

/// Admissible interval of one variable.
///
/// `x ≤ lower` maps to `floor` and `x > upper` maps to `upper`. `floor` may
/// sit above `lower` (e.g. `Q ≤ 0 → 0.1`), which keeps the projected value
/// strictly inside an open lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub name: &'static str,
    pub lower: f64,
    pub floor: f64,
    pub upper: f64,
}

impl Interval {
    /// Project `x` into the interval without logging.
    ///
    /// Returns the projected value and whether it differs from `x`.
    pub fn clamp(&self, x: f64) -> (f64, bool) {
        if x <= self.lower {
            (self.floor, true)
        } else if x > self.upper {
            (self.upper, true)
        } else {
            (x, false)
        }
    }
}

/// Relative price of the luxury good: `Q ∈ (0, 5]`.
pub const Q_INTERVAL: Interval = Interval { name: "Q", lower: 0.0, floor: 0.1, upper: 5.0 };

/// Luxury-sector output: `Y_L ∈ [0.1, 5]`.
pub const Y_L_INTERVAL: Interval = Interval { name: "Y_L", lower: 0.1, floor: 0.1, upper: 5.0 };

/// Labor disutility: `varphi ∈ [0.5, 10]`.
pub const VARPHI_INTERVAL: Interval =
    Interval { name: "varphi", lower: 0.5, floor: 0.5, upper: 10.0 };

/// Discount factor: `beta ∈ [0.94, 1/(1+r)]`.
pub fn beta_interval(r: f64) -> Interval {
    Interval { name: "beta", lower: 0.94, floor: 0.94, upper: 1.0 / (1.0 + r) }
}

/// Project `x` into `interval`, logging a warning when it is clamped.
///
/// Errors
/// ------
/// - `ModelError::DomainViolation` if `x` is NaN or ±inf.
pub fn project(interval: &Interval, x: f64) -> ModelResult<f64> {
    if !x.is_finite() {
        return Err(ModelError::DomainViolation { variable: interval.name, value: x });
    }
    let (projected, clamped) = interval.clamp(x);
    if clamped {
        warn!("{} = {x} outside its admissible range, projected to {projected}", interval.name);
    }
    Ok(projected)
}
