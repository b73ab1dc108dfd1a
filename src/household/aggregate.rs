//! Household aggregates: distribution-weighted sums of the policies.
use crate::{
    grids::Grids,
    household::{prices::HouseholdPrices, workspace::HouseholdWorkspace},
    model::steady_state::SteadyState,
};

/// Aggregates of the household block at the stationary distribution `D`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HouseholdAggregates {
    pub a_hh: f64,
    /// Real composite consumption `Σ D e / P`.
    pub c_hh: f64,
    pub c_n_hh: f64,
    pub c_l_hh: f64,
    pub c_hat_n_hh: f64,
    pub ell_hh: f64,
    /// Efficiency units `Σ D z ell`.
    pub n_hh: f64,
    pub e_hh: f64,
    pub u_hh: f64,
    /// Labor plus non-labor income.
    pub inc_hh: f64,
}

impl HouseholdAggregates {
    /// Sum the policies in `ws` against `ws.d`.
    pub fn compute(grids: &Grids, prices: &HouseholdPrices, ws: &HouseholdWorkspace) -> Self {
        let pol = &ws.policies;
        let mut agg = HouseholdAggregates::default();
        let mut e_sum = 0.0;
        for ((fix, iz, ia), &mass) in ws.d.indexed_iter() {
            if mass == 0.0 {
                continue;
            }
            let idx = [fix, iz, ia];
            let z = grids.z_grid[iz];
            agg.a_hh += mass * pol.a[idx];
            e_sum += mass * pol.e[idx];
            agg.c_n_hh += mass * pol.c_n[idx];
            agg.c_l_hh += mass * pol.c_l[idx];
            agg.c_hat_n_hh += mass * pol.c_hat_n[idx];
            agg.ell_hh += mass * pol.ell[idx];
            agg.n_hh += mass * pol.n[idx];
            agg.u_hh += mass * pol.u[idx];
            agg.inc_hh += mass * (prices.w_n * pol.n[idx] + prices.transfer(z));
        }
        agg.e_hh = e_sum;
        agg.c_hh = e_sum / prices.p;
        agg
    }

    /// Write the `*_hh` fields of `ss`.
    pub fn write_into(&self, ss: &mut SteadyState) {
        ss.a_hh = self.a_hh;
        ss.c_hh = self.c_hh;
        ss.c_n_hh = self.c_n_hh;
        ss.c_l_hh = self.c_l_hh;
        ss.c_hat_n_hh = self.c_hat_n_hh;
        ss.ell_hh = self.ell_hh;
        ss.n_hh = self.n_hh;
        ss.e_hh = self.e_hh;
        ss.u_hh = self.u_hh;
        ss.inc_hh = self.inc_hh;
    }
}
