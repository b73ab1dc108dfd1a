//! Prices and transfers the household block takes as given.
use crate::{
    household::errors::{HouseholdError, HouseholdResult},
    model::{params::Par, steady_state::SteadyState},
};

/// Snapshot of the macro prices a household faces in the steady state.
///
/// All prices are in necessity-good units. Labor income is `w_N · z · ell`
/// and non-labor income is `T(z) = (d_N + Q d_L) z - tau z + chi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdPrices {
    pub r: f64,
    pub w_n: f64,
    pub d_n: f64,
    pub d_l: f64,
    pub tau: f64,
    pub chi: f64,
    pub p_n: f64,
    pub p_l: f64,
    pub q: f64,
    /// Consumer price index of the composite good.
    pub p: f64,
}

impl HouseholdPrices {
    /// Collect the household-relevant prices from the steady-state record.
    pub fn from_steady_state(ss: &SteadyState, par: &Par) -> Self {
        HouseholdPrices {
            r: ss.r,
            w_n: ss.w_n,
            d_n: ss.d_n,
            d_l: ss.d_l,
            tau: ss.tau,
            chi: par.chi,
            p_n: ss.p_n,
            p_l: ss.p_l,
            q: ss.q,
            p: ss.p,
        }
    }

    /// Price guess used to seed the household block before any equilibrium
    /// evaluation: `r = r_target_ss`, `w_N = 1`, no dividends, unit prices,
    /// and the tax that balances the government budget at the target debt.
    pub fn initial_guess(par: &Par) -> Self {
        let r = par.r_target_ss;
        HouseholdPrices {
            r,
            w_n: 1.0,
            d_n: 0.0,
            d_l: 0.0,
            tau: r * par.b_target_ss + par.g_target_ss + par.chi,
            chi: par.chi,
            p_n: 1.0,
            p_l: 1.0,
            q: 1.0,
            p: 1.0,
        }
    }

    /// Non-labor income of a household with productivity `z`.
    #[inline]
    pub fn transfer(&self, z: f64) -> f64 {
        (self.d_n + self.q * self.d_l) * z - self.tau * z + self.chi
    }

    /// Check the prices are usable by the backward step.
    ///
    /// Errors
    /// ------
    /// - `HouseholdError::InvalidPrice` if `1 + r ≤ 0`, `w_N ≤ 0`, or a goods
    ///   price is not strictly positive, or any entry is non-finite.
    pub fn validate(&self) -> HouseholdResult<()> {
        let checks = [
            ("1+r", 1.0 + self.r),
            ("w_N", self.w_n),
            ("p_N", self.p_n),
            ("p_L", self.p_l),
            ("P", self.p),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(HouseholdError::InvalidPrice {
                    name,
                    value,
                    reason: "must be finite and > 0",
                });
            }
        }
        for (name, value) in [("d_N", self.d_n), ("d_L", self.d_l), ("tau", self.tau), ("Q", self.q)]
        {
            if !value.is_finite() {
                return Err(HouseholdError::InvalidPrice { name, value, reason: "must be finite" });
            }
        }
        Ok(())
    }
}
