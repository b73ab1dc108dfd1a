//! rust_hank: steady state of a two-sector HANK model, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the steady-state solver to Python via the `_rust_hank` extension
//! module. The solver finds the relative price of luxury goods, the
//! luxury-sector productivity, and the discount factor at which the asset,
//! labor, and necessity-goods markets clear jointly with a heterogeneous
//! household block.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`grids`, `household`, `equilibrium`,
//!   `model`, `optimization`) as the public crate surface.
//! - Define the `HankSteadyState` and `SteadyStateResult` `#[pyclass]`
//!   wrappers and the `#[pymodule]` initializer for `_rust_hank`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - Python keyword overrides go through the same JSON path and validation
//!   as `Par::from_overrides`.
//!
//! Conventions
//! -----------
//! - Variable names exposed to Python are the model names (`C_N_hh`, `Z_L`,
//!   ...), matching the serialized steady-state record.
//! - Errors from core Rust code are converted to `PyErr` at the boundary:
//!   configuration problems become `ValueError`, solver failures
//!   `RuntimeError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code uses [`model::hank::HankModel`] directly:
//!   `HankModel::new(par)?`, `prepare_hh_ss()?`, `find_ss(do_print)?`.
//! - The `find_ss` binary wraps the same three calls.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod equilibrium;
pub mod grids;
pub mod household;
pub mod model;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray3, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyDict};

#[cfg(feature = "python-bindings")]
use crate::{
    equilibrium::find::SteadyStateOutcome,
    model::{calibration::Unknowns, hank::HankModel},
    utils::{array3_to_py, extract_par, steady_state_to_dict},
};

/// HankSteadyState: Python-facing wrapper around [`HankModel`].
///
/// Purpose
/// -------
/// Let Python build a model from keyword overrides, prepare the household
/// block, search for the steady state, and read the results back as dicts
/// and numpy arrays.
///
/// Parameters
/// ----------
/// Constructed from Python via `HankSteadyState(**overrides)`, where each
/// keyword is a configuration field (`Na=200`, `Nz=5`, `B_target_ss=5.0`,
/// ...). Omitted fields take their baseline values.
///
/// Fields
/// ------
/// - `inner`: [`HankModel`]
///   The Rust model, owning grids, workspace, and the steady-state record.
///
/// Notes
/// -----
/// - Arrays returned to Python are copies; mutating them does not affect
///   the model.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_hank", unsendable)]
pub struct HankSteadyState {
    pub inner: HankModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl HankSteadyState {
    #[new]
    #[pyo3(signature = (**overrides))]
    pub fn new(overrides: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let par = extract_par(overrides)?;
        Ok(HankSteadyState { inner: HankModel::new(par)? })
    }

    /// Build grids and seed the household block.
    pub fn prepare_hh_ss(&mut self) -> PyResult<()> {
        Ok(self.inner.prepare_hh_ss()?)
    }

    /// Search for the steady state; raises `RuntimeError` if none is found.
    #[pyo3(signature = (do_print = false))]
    pub fn find_ss(&mut self, do_print: bool) -> PyResult<SteadyStateResult> {
        let inner = self.inner.find_ss(do_print)?;
        Ok(SteadyStateResult { inner })
    }

    /// Residuals `[A_hh - B, N_hh - N, C_N_hh - C_N]` at `(Z_L, beta, Q)`.
    #[pyo3(signature = (z_l, beta, q, do_print = false))]
    pub fn evaluate(&mut self, z_l: f64, beta: f64, q: f64, do_print: bool) -> PyResult<Vec<f64>> {
        let res = self.inner.evaluate_at(&Unknowns { z_l, beta, q }, do_print)?;
        Ok(res.to_vec())
    }

    #[getter]
    pub fn z_l(&self) -> f64 {
        self.inner.steady_state().z_l
    }

    #[getter]
    pub fn q(&self) -> f64 {
        self.inner.steady_state().q
    }

    #[getter]
    pub fn beta(&self) -> f64 {
        self.inner.calibration().beta
    }

    #[getter]
    pub fn varphi(&self) -> f64 {
        self.inner.calibration().varphi
    }

    /// Steady-state record keyed by variable name.
    #[getter]
    pub fn ss<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        steady_state_to_dict(py, self.inner.steady_state())
    }

    #[getter]
    pub fn a_grid<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.grids().a_grid.to_pyarray(py)
    }

    #[getter]
    pub fn z_grid<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.grids().z_grid.to_pyarray(py)
    }

    /// Stationary distribution `D[fix, z, a]`.
    #[getter(D)]
    pub fn distribution<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<f64>> {
        array3_to_py(py, &self.inner.household().d)
    }

    /// Policy arrays keyed by name (`a`, `c`, `c_N`, `c_L`, `ell`, ...).
    #[getter]
    pub fn policies<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let pol = &self.inner.household().policies;
        let dict = PyDict::new(py);
        for (name, arr) in [
            ("a", &pol.a),
            ("c", &pol.c),
            ("c_N", &pol.c_n),
            ("c_L", &pol.c_l),
            ("c_hat_N", &pol.c_hat_n),
            ("ell", &pol.ell),
            ("n", &pol.n),
            ("e", &pol.e),
            ("u", &pol.u),
        ] {
            dict.set_item(name, array3_to_py(py, arr))?;
        }
        Ok(dict)
    }
}

/// SteadyStateResult: Python-facing view of a converged search.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_hank")]
pub struct SteadyStateResult {
    pub inner: SteadyStateOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SteadyStateResult {
    /// Root `[Z_L, beta, Q]`.
    #[getter]
    pub fn x(&self) -> Vec<f64> {
        self.inner.unknowns.to_array().to_vec()
    }

    #[getter]
    pub fn residuals(&self) -> Vec<f64> {
        self.inner.residuals.to_vec()
    }

    #[getter]
    pub fn max_abs_residual(&self) -> f64 {
        self.inner.max_abs_residual()
    }

    #[getter]
    pub fn iterations(&self) -> u64 {
        self.inner.iterations
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.status.clone()
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.fn_evals.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    /// Formatted summary table.
    #[getter]
    pub fn report(&self) -> String {
        self.inner.report.to_string()
    }
}

/// _rust_hank: PyO3 module initializer.
///
/// Registers [`HankSteadyState`] and [`SteadyStateResult`]. Invoked by
/// Python when importing the compiled extension.
///
/// Errors
/// ------
/// - `PyErr` if class registration fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_hank<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<HankSteadyState>()?;
    m.add_class::<SteadyStateResult>()?;
    Ok(())
}
