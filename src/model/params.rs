//! Par: fixed model configuration.
//!
//! Purpose
//! -------
//! Hold every scalar the steady-state search reads but never writes:
//! preferences, the income process, sectoral technology and pricing
//! parameters, policy-rule coefficients, fiscal targets, grid sizes, and the
//! tolerances and iteration caps of each numerical loop.
//!
//! Key behaviors
//! -------------
//! - [`Par::default`] is the baseline calibration of the two-sector model.
//! - [`Par::validate`] rejects ill-posed configurations up front (persistence
//!   outside `(-1, 1)`, fewer than two grid points or states, inverted asset
//!   bounds, non-positive tolerances, ...).
//! - JSON round-trip via `serde_json` ([`Par::from_json_str`],
//!   [`Par::to_json_string`], [`Par::from_overrides`]); field names follow the
//!   model's variable names (`Nz`, `alpha_L`, `B_target_ss`, ...).
//!
//! Invariants & assumptions
//! ------------------------
//! - `Par` is immutable during a solve. The two preference parameters the
//!   search calibrates (`beta`, `varphi`) only seed
//!   [`Calibration`](crate::model::calibration::Calibration); the values here
//!   stay at their configured starting points.
//!
//! Conventions
//! -----------
//! - Time is quarterly; `r_target_ss` is a quarterly real rate.
//! - Prices are in units of the necessity good (`p_N = 1`).
//!
//! Testing notes
//! -------------
//! - Unit tests cover the baseline values, validation failures, and partial
//!   JSON overrides falling back to defaults.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    grids::markov::IncomeProcess,
    model::errors::{ParamError, ParamResult},
};

/// AR(1) shock specification used by the transition-path blocks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShockProcess {
    /// Initial jump.
    pub jump: f64,
    /// AR(1) coefficient.
    pub rho: f64,
    /// Standard deviation.
    pub std: f64,
}

/// Aggregate shocks of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Shocks {
    #[serde(rename = "Z_N")]
    pub z_n: ShockProcess,
    #[serde(rename = "Z_L")]
    pub z_l: ShockProcess,
    pub istar: ShockProcess,
    #[serde(rename = "pm_N")]
    pub pm_n: ShockProcess,
}

impl Default for Shocks {
    fn default() -> Self {
        Shocks {
            z_n: ShockProcess::default(),
            z_l: ShockProcess::default(),
            istar: ShockProcess { jump: 0.0, rho: 0.61, std: 0.0025 },
            pm_n: ShockProcess { jump: 0.0, rho: 0.75, std: 0.0025 },
        }
    }
}

/// Fixed model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Par {
    // ---- Household types and income ----
    /// Number of fixed discrete household types.
    #[serde(rename = "Nfix")]
    pub n_fix: usize,
    /// Number of productivity states.
    #[serde(rename = "Nz")]
    pub n_z: usize,
    /// Steady-state real interest rate target.
    pub r_target_ss: f64,
    /// AR(1) persistence of log productivity.
    pub rho_z: f64,
    /// Innovation std of log productivity.
    pub sigma_psi: f64,
    /// Discretization of the productivity process.
    pub income_process: IncomeProcess,

    // ---- Preferences ----
    /// Discount factor; starting guess for the calibration.
    pub beta: f64,
    /// Disutility of labor.
    pub varphi: f64,
    /// Weight on necessity goods, net of subsistence.
    pub alpha_hh: f64,
    /// Elasticity of substitution between necessity and luxury goods.
    pub gamma_hh: f64,
    /// Subsistence level of necessity consumption.
    pub c_bar: f64,
    /// Lump-sum government transfer.
    pub chi: f64,
    /// Inverse intertemporal elasticity of substitution.
    pub sigma: f64,
    /// Inverse Frisch elasticity.
    pub nu: f64,

    // ---- Firms ----
    #[serde(rename = "alpha_L")]
    pub alpha_l: f64,
    #[serde(rename = "alpha_N")]
    pub alpha_n: f64,
    #[serde(rename = "gamma_L")]
    pub gamma_l: f64,
    #[serde(rename = "gamma_N")]
    pub gamma_n: f64,
    #[serde(rename = "mu_L")]
    pub mu_l: f64,
    #[serde(rename = "mu_N")]
    pub mu_n: f64,
    #[serde(rename = "kappa_L")]
    pub kappa_l: f64,
    #[serde(rename = "kappa_N")]
    pub kappa_n: f64,

    // ---- Policy ----
    /// Taylor-rule coefficient on inflation.
    pub phi: f64,
    /// Taylor-rule coefficient on output.
    pub phi_y: f64,
    /// Weight of necessity inflation in the policy index.
    pub epsilon: f64,
    /// Basic tax rate.
    pub tax_rate_base: f64,
    /// Government spending target.
    #[serde(rename = "G_target_ss")]
    pub g_target_ss: f64,
    /// Bond supply target.
    #[serde(rename = "B_target_ss")]
    pub b_target_ss: f64,

    // ---- Grids ----
    pub a_min: f64,
    pub a_max: f64,
    #[serde(rename = "Na")]
    pub n_a: usize,

    // ---- Shocks and transition path ----
    pub shocks: Shocks,
    /// Length of the transition path.
    #[serde(rename = "T")]
    pub t_horizon: usize,

    // ---- Numerical controls ----
    pub max_iter_solve: usize,
    pub max_iter_simulate: usize,
    pub max_iter_broyden: usize,
    pub tol_ss: f64,
    pub tol_solve: f64,
    pub tol_simulate: f64,
    pub tol_broyden: f64,
    /// Largest |residual| accepted as a steady state after the root search.
    pub tol_ss_residual: f64,
}

impl Default for Par {
    fn default() -> Self {
        Par {
            n_fix: 1,
            n_z: 7,
            r_target_ss: 1.02_f64.powf(0.25) - 1.0,
            rho_z: 0.9777,
            sigma_psi: 0.1928,
            income_process: IncomeProcess::Rouwenhorst,

            beta: 0.9875,
            varphi: 1.0,
            alpha_hh: 1.0 / 3.0,
            gamma_hh: 0.2,
            c_bar: 0.05,
            chi: 0.05,
            sigma: 2.0,
            nu: 2.0,

            alpha_l: 0.31,
            alpha_n: 0.63,
            gamma_l: 0.815,
            gamma_n: 0.25,
            mu_l: 1.8,
            mu_n: 1.2,
            kappa_l: 0.04,
            kappa_n: 0.22,

            phi: 1.5,
            phi_y: 0.0,
            epsilon: 0.454,
            tax_rate_base: 0.0,
            g_target_ss: 0.0,
            b_target_ss: 5.6,

            a_min: 0.0,
            a_max: 100.0,
            n_a: 500,

            shocks: Shocks::default(),
            t_horizon: 500,

            max_iter_solve: 50_000,
            max_iter_simulate: 50_000,
            max_iter_broyden: 100,
            tol_ss: 1e-11,
            tol_solve: 1e-11,
            tol_simulate: 1e-11,
            tol_broyden: 1e-10,
            tol_ss_residual: 1e-6,
        }
    }
}

impl Par {
    /// Validate the configuration.
    ///
    /// Errors
    /// ------
    /// - `ParamError::InvalidCount` for `Nfix < 1`, `Nz < 2`, `Na < 2`, `T < 1`.
    /// - `ParamError::InvalidAssetBounds` unless `a_min < a_max` (both finite).
    /// - `ParamError::InvalidValue` for persistence outside `(-1, 1)`,
    ///   non-positive curvature or scale parameters, shares outside `(0, 1)`,
    ///   unit substitution elasticities (the CES formulas divide by `1 - γ`),
    ///   markups below one, or `beta` outside `(0, 1)`.
    /// - `ParamError::InvalidTolerance` / `InvalidMaxIter` for the numerical
    ///   controls.
    pub fn validate(&self) -> ParamResult<()> {
        // ---- Counts ----
        check_count("Nfix", self.n_fix, 1)?;
        check_count("Nz", self.n_z, 2)?;
        check_count("Na", self.n_a, 2)?;
        check_count("T", self.t_horizon, 1)?;
        if !self.a_min.is_finite() || !self.a_max.is_finite() || self.a_max <= self.a_min {
            return Err(ParamError::InvalidAssetBounds { a_min: self.a_min, a_max: self.a_max });
        }

        // ---- Income process ----
        check_open_unit("rho_z", self.rho_z)?;
        check_positive("sigma_psi", self.sigma_psi)?;
        if let IncomeProcess::Tauchen { width } = self.income_process {
            check_positive("income_process.width", width)?;
        }
        if !self.r_target_ss.is_finite() || self.r_target_ss <= -1.0 {
            return Err(ParamError::InvalidValue {
                name: "r_target_ss",
                value: self.r_target_ss,
                reason: "must be finite and > -1",
            });
        }

        // ---- Preferences ----
        check_share("beta", self.beta)?;
        check_positive("varphi", self.varphi)?;
        check_share("alpha_hh", self.alpha_hh)?;
        check_elasticity("gamma_hh", self.gamma_hh)?;
        check_non_negative("c_bar", self.c_bar)?;
        check_finite("chi", self.chi)?;
        check_positive("sigma", self.sigma)?;
        check_positive("nu", self.nu)?;

        // ---- Firms ----
        check_share("alpha_L", self.alpha_l)?;
        check_share("alpha_N", self.alpha_n)?;
        check_elasticity("gamma_L", self.gamma_l)?;
        check_elasticity("gamma_N", self.gamma_n)?;
        check_markup("mu_L", self.mu_l)?;
        check_markup("mu_N", self.mu_n)?;
        check_non_negative("kappa_L", self.kappa_l)?;
        check_non_negative("kappa_N", self.kappa_n)?;

        // ---- Policy and government ----
        check_finite("phi", self.phi)?;
        check_finite("phi_y", self.phi_y)?;
        check_finite("epsilon", self.epsilon)?;
        check_finite("tax_rate_base", self.tax_rate_base)?;
        check_non_negative("G_target_ss", self.g_target_ss)?;
        check_non_negative("B_target_ss", self.b_target_ss)?;

        // ---- Shocks ----
        for (name, shock) in [
            ("shocks.Z_N.rho", &self.shocks.z_n),
            ("shocks.Z_L.rho", &self.shocks.z_l),
            ("shocks.istar.rho", &self.shocks.istar),
            ("shocks.pm_N.rho", &self.shocks.pm_n),
        ] {
            check_open_unit(name, shock.rho)?;
            check_finite("shocks.jump", shock.jump)?;
            check_non_negative("shocks.std", shock.std)?;
        }

        // ---- Numerical controls ----
        check_tol("tol_ss", self.tol_ss)?;
        check_tol("tol_solve", self.tol_solve)?;
        check_tol("tol_simulate", self.tol_simulate)?;
        check_tol("tol_broyden", self.tol_broyden)?;
        check_tol("tol_ss_residual", self.tol_ss_residual)?;
        check_max_iter("max_iter_solve", self.max_iter_solve)?;
        check_max_iter("max_iter_simulate", self.max_iter_simulate)?;
        check_max_iter("max_iter_broyden", self.max_iter_broyden)?;
        Ok(())
    }

    /// Parse a JSON object; missing fields take their baseline values.
    ///
    /// Errors
    /// ------
    /// - `ParamError::Parse` on malformed JSON or unknown field names.
    /// - Any validation error from [`Par::validate`].
    pub fn from_json_str(text: &str) -> ParamResult<Par> {
        let par: Par = serde_json::from_str(text)?;
        par.validate()?;
        Ok(par)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> ParamResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply a map of overrides on top of the baseline calibration.
    ///
    /// Keys use the serialized field names (`"Na"`, `"B_target_ss"`, ...).
    /// Nested values such as `"shocks"` replace the whole nested record.
    pub fn from_overrides(overrides: &Map<String, Value>) -> ParamResult<Par> {
        let mut base = serde_json::to_value(Par::default())?;
        if let Value::Object(fields) = &mut base {
            for (key, value) in overrides {
                fields.insert(key.clone(), value.clone());
            }
        }
        let par: Par = serde_json::from_value(base)?;
        par.validate()?;
        Ok(par)
    }
}

// ---- Helper Methods ----

fn check_count(name: &'static str, value: usize, min: usize) -> ParamResult<()> {
    if value < min {
        let reason = if min == 1 { "must be at least 1" } else { "must be at least 2" };
        return Err(ParamError::InvalidCount { name, value, reason });
    }
    Ok(())
}

fn check_finite(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() {
        return Err(ParamError::InvalidValue { name, value, reason: "must be finite" });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ParamError::InvalidValue { name, value, reason: "must be finite and > 0" });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ParamError::InvalidValue { name, value, reason: "must be finite and >= 0" });
    }
    Ok(())
}

fn check_share(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(ParamError::InvalidValue { name, value, reason: "must lie in (0, 1)" });
    }
    Ok(())
}

fn check_open_unit(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() || value <= -1.0 || value >= 1.0 {
        return Err(ParamError::InvalidValue { name, value, reason: "must lie in (-1, 1)" });
    }
    Ok(())
}

fn check_elasticity(name: &'static str, value: f64) -> ParamResult<()> {
    check_positive(name, value)?;
    if (value - 1.0).abs() < 1e-12 {
        return Err(ParamError::InvalidValue {
            name,
            value,
            reason: "unit elasticity is not supported by the CES forms",
        });
    }
    Ok(())
}

fn check_markup(name: &'static str, value: f64) -> ParamResult<()> {
    if !value.is_finite() || value < 1.0 {
        return Err(ParamError::InvalidValue { name, value, reason: "gross markup must be >= 1" });
    }
    Ok(())
}

fn check_tol(name: &'static str, tol: f64) -> ParamResult<()> {
    if !tol.is_finite() || tol <= 0.0 {
        return Err(ParamError::InvalidTolerance { name, tol });
    }
    Ok(())
}

fn check_max_iter(name: &'static str, max_iter: usize) -> ParamResult<()> {
    if max_iter == 0 {
        return Err(ParamError::InvalidMaxIter { name, max_iter });
    }
    Ok(())
}
