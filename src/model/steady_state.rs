//! SteadyState: the named macro variables of the model.
//!
//! Purpose
//! -------
//! Give every aggregate the evaluator computes a typed field, and give the
//! same set an enumerable schema ([`Var`]) so collaborators that work by
//! variable name (transition-path blocks, the Python bindings, the JSON
//! writer) read exactly the fields the steady-state core writes.
//!
//! Key behaviors
//! -------------
//! - One macro invocation declares each variable once and generates the
//!   struct field, the [`Var`] variant, its model name, and the
//!   [`SteadyState::get`] / [`SteadyState::set`] accessors.
//! - Serialized field names are the model names (`C_N_hh`, `pm_L`, ...).
//!
//! Invariants & assumptions
//! ------------------------
//! - The evaluator overwrites every macro field on each call. Nothing
//!   carries over between calls except `Z_L` and `Q`, which hold the running
//!   guess.
//! - Household aggregates (`*_hh`) are mass-weighted sums over the stationary
//!   distribution and are written by the household block.
//!
//! Conventions
//! -----------
//! - Prices are in units of the necessity good; `P` is the consumer price
//!   index; real aggregates (`C`, `C_hh`) are deflated by `P`.
//! - `clearing_X = X_hh - X`, so a steady state has all clearing fields ≈ 0.
use serde::{Deserialize, Serialize};

macro_rules! steady_state_variables {
    ($( $(#[$doc:meta])* $field:ident => $variant:ident = $name:literal; )*) => {
        /// All steady-state macro variables and household aggregates.
        #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct SteadyState {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                pub $field: f64,
            )*
        }

        /// Names of the steady-state variables.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Var {
            $( $variant, )*
        }

        impl Var {
            /// Every variable, in declaration order.
            pub const ALL: &'static [Var] = &[ $( Var::$variant, )* ];

            /// Model name of the variable.
            pub fn name(self) -> &'static str {
                match self {
                    $( Var::$variant => $name, )*
                }
            }

            /// Look a variable up by its model name.
            pub fn from_name(name: &str) -> Option<Var> {
                match name {
                    $( $name => Some(Var::$variant), )*
                    _ => None,
                }
            }
        }

        impl SteadyState {
            /// Read a variable by name.
            pub fn get(&self, var: Var) -> f64 {
                match var {
                    $( Var::$variant => self.$field, )*
                }
            }

            /// Write a variable by name.
            pub fn set(&mut self, var: Var, value: f64) {
                match var {
                    $( Var::$variant => self.$field = value, )*
                }
            }
        }
    };
}

steady_state_variables! {
    // ---- Assets and bonds ----
    /// Asset supply target.
    a => A = "A";
    /// Government bonds.
    b => B = "B";

    // ---- Consumption ----
    /// Real consumption (deflated by `P`).
    c => C = "C";
    /// Necessity-good consumption.
    c_n => CN = "C_N";
    /// Luxury-good consumption.
    c_l => CL = "C_L";

    // ---- Market clearing ----
    clearing_a => ClearingA = "clearing_A";
    clearing_c => ClearingC = "clearing_C";
    clearing_c_n => ClearingCN = "clearing_C_N";
    clearing_c_l => ClearingCL = "clearing_C_L";
    clearing_n => ClearingN = "clearing_N";

    // ---- Dividends ----
    /// Total dividends in necessity-good units.
    d => D = "d";
    d_n => DN = "d_N";
    d_l => DL = "d_L";

    // ---- Government and policy ----
    g => G = "G";
    /// Nominal policy rate.
    i => I = "i";
    istar => Istar = "istar";
    rstar => Rstar = "rstar";
    /// Real interest rate.
    r => R = "r";
    /// Lump-sum tax.
    tau => Tau = "tau";
    tau_pm => TauPm = "tau_pm";
    tax_rate_base => TaxRateBase = "tax_rate_base";

    // ---- Labor and intermediates ----
    n => N = "N";
    n_n => NN = "N_N";
    n_l => NL = "N_L";
    m_n => MN = "M_N";
    m_l => ML = "M_L";
    /// Total intermediate-input quantity.
    m_test => MTest = "M_test";
    pm_l => PmL = "pm_L";
    pm_n => PmN = "pm_N";
    /// Foreign intermediate price in necessity-good units.
    pm_f => PmF = "pm_f";

    // ---- Pricing ----
    nkpc_res_n => NkpcResN = "NKPC_res_N";
    nkpc_res_l => NkpcResL = "NKPC_res_L";
    p_n => PN = "p_N";
    p_l => PL = "p_L";
    /// Consumer price index.
    p => P = "P";
    pi => Pi = "pi";
    pi_n => PiN = "pi_N";
    pi_l => PiL = "pi_L";
    mc_n => McN = "mc_N";
    mc_l => McL = "mc_L";
    adjcost => Adjcost = "adjcost";
    adjcost_n => AdjcostN = "adjcost_N";
    adjcost_l => AdjcostL = "adjcost_L";

    // ---- Wages ----
    /// Economy-wide wage per efficiency unit.
    w => W = "w";
    w_n => WN = "w_N";
    w_l => WL = "w_L";

    // ---- Output and productivity ----
    y => Y = "Y";
    y_n => YN = "Y_N";
    y_l => YL = "Y_L";
    y_star => YStar = "Y_star";
    /// Relative price of the luxury good (unknown).
    q => Q = "Q";
    /// Relative price recomputed from sectoral prices.
    q_check => QCheck = "Q_check";
    z_n => ZN = "Z_N";
    /// Luxury-sector productivity (unknown).
    z_l => ZL = "Z_L";

    // ---- Household aggregates ----
    a_hh => AHh = "A_hh";
    /// Real expenditure `Σ D · e / P`.
    c_hh => CHh = "C_hh";
    c_n_hh => CNHh = "C_N_hh";
    c_l_hh => CLHh = "C_L_hh";
    /// Necessity consumption above subsistence.
    c_hat_n_hh => CHatNHh = "C_hat_N_hh";
    /// Hours.
    ell_hh => EllHh = "ELL_hh";
    /// Efficiency units of labor.
    n_hh => NHh = "N_hh";
    /// Nominal expenditure.
    e_hh => EHh = "E_hh";
    u_hh => UHh = "U_hh";
    /// Income net of taxes, excluding interest.
    inc_hh => IncHh = "INC_hh";
}

impl SteadyState {
    /// `[A_hh - B, N_hh - N, C_N_hh - C_N]`, the residuals the root finder zeros.
    pub fn targets(&self) -> [f64; 3] {
        [self.a_hh - self.b, self.n_hh - self.n, self.c_n_hh - self.c_n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Names, variants, and fields stay in sync.
    //
    // Given
    // -----
    // - Every `Var` in `Var::ALL`.
    //
    // Expect
    // ------
    // - `from_name(name())` is the identity; `set` then `get` reads back.
    fn variable_schema_is_consistent() {
        let mut ss = SteadyState::default();
        for (k, &var) in Var::ALL.iter().enumerate() {
            assert_eq!(Var::from_name(var.name()), Some(var));
            ss.set(var, k as f64);
            assert_eq!(ss.get(var), k as f64);
        }
        assert_eq!(Var::from_name("not_a_variable"), None);
    }

    #[test]
    // Purpose
    // -------
    // JSON keys are the model names.
    //
    // Given
    // -----
    // - A record with `C_N_hh = 0.25`.
    //
    // Expect
    // ------
    // - The serialized object contains the key `"C_N_hh"`.
    fn serialized_keys_use_model_names() {
        let ss = SteadyState { c_n_hh: 0.25, ..SteadyState::default() };

        let json = serde_json::to_value(&ss).unwrap();

        assert_eq!(json["C_N_hh"], serde_json::json!(0.25));
        assert_eq!(json.as_object().unwrap().len(), Var::ALL.len());
    }
}
