//! grids: asset grid, productivity chain, and the container the model owns.
//!
//! Purpose
//! -------
//! Build the discrete state space of the household problem: a log-spaced
//! asset grid over `[a_min, a_max]` and a finite-state productivity chain
//! with its stationary distribution. The results live in [`Grids`], which is
//! allocated once per model and filled by `prepare_hh_ss`.
//!
//! Key behaviors
//! -------------
//! - [`asset::equilogspace`] builds the asset grid with exact endpoints.
//! - [`markov::log_rouwenhorst`] / [`markov::log_tauchen`] discretize the
//!   log-AR(1) productivity process (selected via [`markov::IncomeProcess`]).
//! - [`Grids::fill`] writes a grid and chain into pre-allocated storage,
//!   replicating the chain across fixed household types.
//!
//! Invariants & assumptions
//! ------------------------
//! - `a_grid` is strictly increasing with `a_grid[0] == a_min` and
//!   `a_grid[Na-1] == a_max`.
//! - Every `z_trans[fix]` is row-stochastic; `z_ergodic` sums to one.
//! - Shapes never change after allocation.
//!
//! Conventions
//! -----------
//! - `z_trans` has shape `(Nfix, Nz, Nz)` and is indexed `[fix, from, to]`.
//! - Productivity levels are normalized to unit ergodic mean, so aggregate
//!   efficiency units equal one.
//!
//! Testing notes
//! -------------
//! - Unit tests live in `asset` and `markov`; `Grids::fill` is covered by the
//!   model-level preparation tests.

pub mod asset;
pub mod errors;
pub mod markov;

use ndarray::{Array1, Array3, s};

use crate::grids::{
    errors::{GridError, GridResult},
    markov::MarkovChain,
};

/// Asset and productivity grids shared by every household solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Grids {
    /// Asset levels, length `Na`.
    pub a_grid: Array1<f64>,
    /// Productivity levels, length `Nz`.
    pub z_grid: Array1<f64>,
    /// Transition matrices per fixed type, shape `(Nfix, Nz, Nz)`.
    pub z_trans: Array3<f64>,
    /// Stationary productivity distribution, length `Nz`.
    pub z_ergodic: Array1<f64>,
}

impl Grids {
    /// Allocate zeroed grids for `n_fix` fixed types, `n_z` productivity
    /// states and `n_a` asset points.
    pub fn allocate(n_fix: usize, n_z: usize, n_a: usize) -> Self {
        Grids {
            a_grid: Array1::zeros(n_a),
            z_grid: Array1::zeros(n_z),
            z_trans: Array3::zeros((n_fix, n_z, n_z)),
            z_ergodic: Array1::zeros(n_z),
        }
    }

    /// Number of fixed household types.
    pub fn n_fix(&self) -> usize {
        self.z_trans.dim().0
    }

    /// Number of productivity states.
    pub fn n_z(&self) -> usize {
        self.z_grid.len()
    }

    /// Number of asset grid points.
    pub fn n_a(&self) -> usize {
        self.a_grid.len()
    }

    /// Copy an asset grid and a productivity chain into the allocated storage.
    ///
    /// Errors
    /// ------
    /// - `GridError::ShapeMismatch` when the lengths of `a_grid` or `chain`
    ///   disagree with the allocated shapes.
    pub fn fill(&mut self, a_grid: &Array1<f64>, chain: &MarkovChain) -> GridResult<()> {
        if a_grid.len() != self.n_a() {
            return Err(GridError::ShapeMismatch {
                what: "a_grid",
                expected: self.n_a(),
                found: a_grid.len(),
            });
        }
        if chain.grid.len() != self.n_z() {
            return Err(GridError::ShapeMismatch {
                what: "z_grid",
                expected: self.n_z(),
                found: chain.grid.len(),
            });
        }
        self.a_grid.assign(a_grid);
        self.z_grid.assign(&chain.grid);
        self.z_ergodic.assign(&chain.ergodic);
        for fix in 0..self.n_fix() {
            self.z_trans.slice_mut(s![fix, .., ..]).assign(&chain.trans);
        }
        Ok(())
    }
}

pub mod prelude {
    pub use super::Grids;
    pub use super::asset::equilogspace;
    pub use super::errors::{GridError, GridResult};
    pub use super::markov::{
        IncomeProcess, MarkovChain, log_rouwenhorst, log_tauchen, stationary_distribution,
    };
}
