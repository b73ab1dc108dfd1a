//! Calibrated preference parameters and the root-finder's unknowns.
//!
//! The steady-state search treats the discount factor as a third unknown next
//! to `Z_L` and `Q`. Instead of writing into [`Par`], the running values live
//! in [`Calibration`], owned by the model and updated only by the evaluator.
//! [`Unknowns`] is the typed form of the 3-vector `[Z_L, beta, Q]` handed to
//! the root finder.
//!
//! [`Par`]: crate::model::params::Par
use ndarray::{Array1, array};
use serde::{Deserialize, Serialize};

use crate::model::{
    errors::{ModelError, ModelResult},
    params::Par,
};

/// Number of unknowns in the steady-state search.
pub const N_UNKNOWNS: usize = 3;

/// Calibrated preference parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Discount factor.
    pub beta: f64,
    /// Disutility of labor.
    pub varphi: f64,
}

impl Calibration {
    /// Seed the calibration from the configured starting values.
    pub fn from_par(par: &Par) -> Self {
        Calibration { beta: par.beta, varphi: par.varphi }
    }
}

/// Unknowns of the steady-state search, ordered `[Z_L, beta, Q]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unknowns {
    /// Productivity of the luxury sector.
    pub z_l: f64,
    /// Discount factor.
    pub beta: f64,
    /// Relative price of the luxury good.
    pub q: f64,
}

impl Unknowns {
    /// Starting point of `find_ss`: `Z_L = 0.5`, `Q = 1`, and the current
    /// calibrated `beta`.
    pub fn initial_guess(calib: &Calibration) -> Self {
        Unknowns { z_l: 0.5, beta: calib.beta, q: 1.0 }
    }

    /// Read the unknowns from a slice in `[Z_L, beta, Q]` order.
    ///
    /// Errors
    /// ------
    /// - `ModelError::InvalidUnknowns` if the slice length is not 3 or an
    ///   entry is NaN/±inf.
    pub fn from_slice(x: &[f64]) -> ModelResult<Self> {
        if x.len() != N_UNKNOWNS {
            return Err(ModelError::InvalidUnknowns {
                index: x.len(),
                value: f64::NAN,
                reason: "expected exactly 3 unknowns [Z_L, beta, Q]",
            });
        }
        if let Some((index, &value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::InvalidUnknowns { index, value, reason: "must be finite" });
        }
        Ok(Unknowns { z_l: x[0], beta: x[1], q: x[2] })
    }

    /// Pack into an array in `[Z_L, beta, Q]` order.
    pub fn to_array(&self) -> Array1<f64> {
        array![self.z_l, self.beta, self.q]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Slices and arrays agree on the `[Z_L, beta, Q]` ordering.
    //
    // Given
    // -----
    // - The slice `[1.03, 0.974, 0.72]`.
    //
    // Expect
    // ------
    // - Named fields match positions; `to_array` reproduces the slice.
    fn unknowns_follow_declared_order() {
        let x = [1.03, 0.974, 0.72];

        let u = Unknowns::from_slice(&x).unwrap();

        assert_eq!((u.z_l, u.beta, u.q), (1.03, 0.974, 0.72));
        assert_eq!(u.to_array().to_vec(), x.to_vec());
    }

    #[test]
    // Purpose
    // -------
    // Malformed trial vectors are rejected.
    //
    // Given
    // -----
    // - A 2-vector and a vector with NaN in position 1.
    //
    // Expect
    // ------
    // - `InvalidUnknowns` with the offending index.
    fn unknowns_reject_bad_vectors() {
        assert!(matches!(Unknowns::from_slice(&[1.0, 2.0]), Err(ModelError::InvalidUnknowns { .. })));
        assert!(matches!(
            Unknowns::from_slice(&[1.0, f64::NAN, 1.0]),
            Err(ModelError::InvalidUnknowns { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The initial guess reuses the running beta.
    //
    // Given
    // -----
    // - A calibration with beta = 0.97.
    //
    // Expect
    // ------
    // - `[0.5, 0.97, 1.0]`.
    fn initial_guess_uses_running_beta() {
        let calib = Calibration { beta: 0.97, varphi: 1.0 };

        assert_eq!(Unknowns::initial_guess(&calib), Unknowns { z_l: 0.5, beta: 0.97, q: 1.0 });
    }
}
