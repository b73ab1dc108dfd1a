//! Pre-allocated household arrays: distribution, marginal values, policies,
//! and scratch buffers.
//!
//! Every array is sized once from `(Nfix, Nz, Na)` when the model is built
//! and reused by every solve and simulation; nothing here grows during the
//! steady-state search.
use ndarray::{Array1, Array2, Array3};

/// Household policy functions on the `(fix, z, a)` state space.
#[derive(Debug, Clone, PartialEq)]
pub struct Policies {
    /// End-of-period assets `a'`.
    pub a: Array3<f64>,
    /// Composite consumption.
    pub c: Array3<f64>,
    /// Necessity consumption, including subsistence.
    pub c_n: Array3<f64>,
    /// Luxury consumption.
    pub c_l: Array3<f64>,
    /// Necessity consumption above subsistence.
    pub c_hat_n: Array3<f64>,
    /// Hours worked.
    pub ell: Array3<f64>,
    /// Efficiency units supplied, `z · ell`.
    pub n: Array3<f64>,
    /// Nominal expenditure `P c + p_N c_bar`.
    pub e: Array3<f64>,
    /// Period utility.
    pub u: Array3<f64>,
}

impl Policies {
    fn zeros(shape: (usize, usize, usize)) -> Self {
        Policies {
            a: Array3::zeros(shape),
            c: Array3::zeros(shape),
            c_n: Array3::zeros(shape),
            c_l: Array3::zeros(shape),
            c_hat_n: Array3::zeros(shape),
            ell: Array3::zeros(shape),
            n: Array3::zeros(shape),
            e: Array3::zeros(shape),
            u: Array3::zeros(shape),
        }
    }
}

/// Buffers reused across iterations to avoid per-iteration allocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Scratch {
    /// Marginal value produced by the latest backward step.
    pub vbeg_a_next: Array3<f64>,
    /// Asset policy of the previous backward step.
    pub a_prev: Array3<f64>,
    /// Distribution produced by the latest forward step.
    pub dbeg_next: Array3<f64>,
    /// Lower bracketing grid index of `a'` for the lottery.
    pub lottery_i: Array3<usize>,
    /// Weight on the lower bracketing grid point.
    pub lottery_w: Array3<f64>,
    /// Endogenous asset grid of one `(fix, z)` slice.
    pub m_endo: Array1<f64>,
}

/// Household-side state owned by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdWorkspace {
    /// Beginning-of-period distribution over `(fix, z_lag, a)`.
    pub dbeg: Array3<f64>,
    /// Distribution after the productivity draw, over `(fix, z, a)`.
    pub d: Array3<f64>,
    /// Productivity mass per fixed type, shape `(Nfix, Nz)`.
    pub dz: Array2<f64>,
    /// Expected marginal value of assets at the start of the period.
    pub vbeg_a: Array3<f64>,
    pub policies: Policies,
    pub(crate) scratch: Scratch,
}

impl HouseholdWorkspace {
    /// Allocate zeroed arrays for `(n_fix, n_z, n_a)`.
    pub fn allocate(n_fix: usize, n_z: usize, n_a: usize) -> Self {
        let shape = (n_fix, n_z, n_a);
        HouseholdWorkspace {
            dbeg: Array3::zeros(shape),
            d: Array3::zeros(shape),
            dz: Array2::zeros((n_fix, n_z)),
            vbeg_a: Array3::zeros(shape),
            policies: Policies::zeros(shape),
            scratch: Scratch {
                vbeg_a_next: Array3::zeros(shape),
                a_prev: Array3::zeros(shape),
                dbeg_next: Array3::zeros(shape),
                lottery_i: Array3::zeros(shape),
                lottery_w: Array3::zeros(shape),
                m_endo: Array1::zeros(n_a),
            },
        }
    }

    /// State-space shape `(Nfix, Nz, Na)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.dbeg.dim()
    }
}
