//! Closed-form firm and price block of the steady state.
//!
//! Purpose
//! -------
//! Map the trial `(Z_L, Q)` and the steady-state normalizations into
//! sectoral wages, implied necessity-sector productivity `Z_N`, marginal
//! costs, input demands, and dividends.
//!
//! Key behaviors
//! -------------
//! - The luxury sector (L) is solved first: its wage inverts the CES unit
//!   cost condition `mc_L = 1/mu_L` given `Z_L`.
//! - The necessity sector (N) takes `w_N = Q w_L` and `pm_N = Q pm_L`; `Z_N`
//!   is the productivity that makes `mc_N = 1/mu_N` at that wage.
//! - Output of N follows from `P Y = p_N Y_N + p_L Y_L` with `Y = 1`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every base of a fractional power is checked. A non-positive cost-share
//!   base, `Z_L ≤ 0`, or `Y_N ≤ 0` is a `ModelError::DomainViolation`
//!   naming the quantity, never a NaN.
//! - Zero steady-state inflation and no price-adjustment costs.
use crate::model::{
    errors::{ModelError, ModelResult},
    params::Par,
};

/// Prices and quantities of both production sectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirmBlock {
    pub p_n: f64,
    pub p_l: f64,
    /// Consumer price index.
    pub p: f64,
    pub pm_n: f64,
    pub pm_l: f64,
    pub w_n: f64,
    pub w_l: f64,
    pub z_n: f64,
    pub z_l: f64,
    pub y: f64,
    pub y_n: f64,
    pub y_l: f64,
    pub mc_n: f64,
    pub mc_l: f64,
    pub m_n: f64,
    pub m_l: f64,
    pub n_n: f64,
    pub n_l: f64,
    pub d_n: f64,
    pub d_l: f64,
}

/// CES price index `(α p_N^(1-γ) + (1-α) p_L^(1-γ))^(1/(1-γ))`.
pub fn consumer_price_index(p_n: f64, p_l: f64, alpha: f64, gamma: f64) -> f64 {
    (alpha * p_n.powf(1.0 - gamma) + (1.0 - alpha) * p_l.powf(1.0 - gamma)).powf(1.0 / (1.0 - gamma))
}

/// CES unit cost of labor and intermediates.
fn marginal_cost(w: f64, z: f64, pm: f64, alpha: f64, gamma: f64) -> f64 {
    ((1.0 - alpha) * (w / z).powf(1.0 - gamma) + alpha * pm.powf(1.0 - gamma))
        .powf(1.0 / (1.0 - gamma))
}

/// `(mu^(γ-1) - α pm^(1-γ)) / (1-α)`: the labor share of unit cost at
/// `mc = 1/mu`, raised to `1-γ`.
fn cost_share_base(mu: f64, pm: f64, alpha: f64, gamma: f64) -> f64 {
    (mu.powf(gamma - 1.0) - alpha * pm.powf(1.0 - gamma)) / (1.0 - alpha)
}

fn positive(variable: &'static str, value: f64) -> ModelResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::DomainViolation { variable, value })
    }
}

fn finite(variable: &'static str, value: f64) -> ModelResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(ModelError::DomainViolation { variable, value }) }
}

impl FirmBlock {
    /// Solve both sectors at `(Z_L, Q)` with luxury output `Y_L`.
    ///
    /// Parameters
    /// ----------
    /// - `par`: sectoral technology and household CES weights.
    /// - `z_l`: luxury-sector productivity.
    /// - `q`: relative price `p_L / p_N`, already projected.
    /// - `y_l`: luxury output, already projected.
    ///
    /// Errors
    /// ------
    /// - `ModelError::DomainViolation` naming `"Z_L"`, `"cost_share_L"`,
    ///   `"cost_share_N"`, `"Y_N"`, or the first non-finite quantity.
    pub fn solve(par: &Par, z_l: f64, q: f64, y_l: f64) -> ModelResult<Self> {
        let z_l = positive("Z_L", z_l)?;

        // a. normalizations
        let p_n = 1.0;
        let p_l = q * p_n;
        let pm_l = 1.0;
        let y = 1.0;
        let p = positive("P", consumer_price_index(p_n, p_l, par.alpha_hh, par.gamma_hh))?;

        // b. luxury sector
        let base_l = positive("cost_share_L", cost_share_base(par.mu_l, pm_l, par.alpha_l, par.gamma_l))?;
        let w_l = positive("w_L", z_l * base_l.powf(1.0 / (1.0 - par.gamma_l)))?;
        let mc_l = positive("mc_L", marginal_cost(w_l, z_l, pm_l, par.alpha_l, par.gamma_l))?;
        let m_l = finite("M_L", par.alpha_l * (pm_l / mc_l).powf(-par.gamma_l) * y_l)?;
        let n_l = finite(
            "N_L",
            (1.0 - par.alpha_l) * (w_l / mc_l).powf(-par.gamma_l) * z_l.powf(par.gamma_l - 1.0) * y_l,
        )?;

        // c. necessity sector
        let w_n = q * w_l;
        let pm_n = q * pm_l;
        let base_n = positive("cost_share_N", cost_share_base(par.mu_n, pm_n, par.alpha_n, par.gamma_n))?;
        let z_n = positive("Z_N", w_n * base_n.powf(-1.0 / (1.0 - par.gamma_n)))?;
        let y_n = positive("Y_N", y * p / p_n - q * y_l)?;
        let mc_n = positive("mc_N", marginal_cost(w_n, z_n, pm_n, par.alpha_n, par.gamma_n))?;
        let m_n = finite("M_N", par.alpha_n * (pm_n / mc_n).powf(-par.gamma_n) * y_n)?;
        let n_n = finite(
            "N_N",
            (1.0 - par.alpha_n) * (w_n / mc_n).powf(-par.gamma_n) * z_n.powf(par.gamma_n - 1.0) * y_n,
        )?;

        // d. dividends
        let d_n = finite("d_N", y_n - w_n * n_n - pm_n * m_n)?;
        let d_l = finite("d_L", y_l - w_l * n_l - pm_l * m_l)?;

        Ok(FirmBlock {
            p_n,
            p_l,
            p,
            pm_n,
            pm_l,
            w_n,
            w_l,
            z_n,
            z_l,
            y,
            y_n,
            y_l,
            mc_n,
            mc_l,
            m_n,
            m_l,
            n_n,
            n_l,
            d_n,
            d_l,
        })
    }

    /// Necessity goods left for consumption after intermediate use.
    pub fn c_n(&self) -> f64 {
        self.y_n - self.pm_n * self.m_n
    }

    /// Luxury goods left for consumption after intermediate use.
    pub fn c_l(&self) -> f64 {
        self.y_l - self.pm_l * self.m_l
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Marginal costs equal inverse markups and zero-profit accounting holds.
    //
    // Given
    // -----
    // - Baseline parameters, Z_L = 0.5, Q = 1, Y_L = 0.5.
    //
    // Expect
    // ------
    // - mc_s = 1/mu_s; d_s = (1 - 1/mu_s) Y_s; P = 1 at Q = 1.
    fn marginal_cost_equals_inverse_markup() {
        // Arrange
        let par = Par::default();

        // Act
        let firms = FirmBlock::solve(&par, 0.5, 1.0, 0.5).unwrap();

        // Assert
        assert_relative_eq!(firms.p, 1.0, epsilon = 1e-14);
        assert_relative_eq!(firms.mc_l, 1.0 / par.mu_l, epsilon = 1e-12);
        assert_relative_eq!(firms.mc_n, 1.0 / par.mu_n, epsilon = 1e-12);
        assert_relative_eq!(firms.d_l, (1.0 - 1.0 / par.mu_l) * firms.y_l, epsilon = 1e-12);
        assert_relative_eq!(firms.d_n, (1.0 - 1.0 / par.mu_n) * firms.y_n, epsilon = 1e-12);
        assert_relative_eq!(firms.y_n + firms.p_l / firms.p_n * firms.y_l, 1.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // A relative price that breaks the N-sector cost share is reported by name.
    //
    // Given
    // -----
    // - Q = 5, where `mu_N^(γ_N-1) < α_N Q^(1-γ_N)`.
    //
    // Expect
    // ------
    // - `DomainViolation { variable: "cost_share_N", .. }`.
    fn large_relative_price_violates_cost_share() {
        let par = Par::default();

        let err = FirmBlock::solve(&par, 0.5, 5.0, 0.5).unwrap_err();

        assert!(matches!(err, ModelError::DomainViolation { variable: "cost_share_N", .. }));
    }

    #[test]
    // Purpose
    // -------
    // Non-positive productivity never reaches a fractional power.
    //
    // Given
    // -----
    // - Z_L = -0.1.
    //
    // Expect
    // ------
    // - `DomainViolation { variable: "Z_L", .. }`.
    fn non_positive_productivity_is_domain_violation() {
        let err = FirmBlock::solve(&Par::default(), -0.1, 1.0, 0.5).unwrap_err();

        assert!(matches!(err, ModelError::DomainViolation { variable: "Z_L", .. }));
    }
}
