//! Adapter that exposes a [`ResidualSystem`] as an `argmin` problem.
//!
//! - `Operator::apply` evaluates `f(x)`. Out-of-domain trial points become
//!   an all-NaN residual vector, which the solver reads as a rejected step.
//! - `Jacobian::jacobian` finite-differences `apply`, reusing the cached
//!   residual at `x` when the last evaluation was at the same point.
//!
//! The system is evaluated through `&mut`, while argmin's traits take
//! `&self`, so the system sits behind a `RefCell`. argmin never calls the
//! operator re-entrantly, so the borrow cannot overlap.
use std::cell::RefCell;

use argmin::core::{Error, Jacobian as ArgminJacobian, Operator};
use log::warn;
use ndarray::Array1;

use crate::optimization::root_finder::{
    finite_diff::forward_jacobian,
    traits::ResidualSystem,
    types::{Jacobian, Point, Residuals},
    validation::validate_residuals,
};

/// Bridges a [`ResidualSystem`] to argmin's `Operator` and `Jacobian`.
pub struct RootAdapter<'a, S: ResidualSystem> {
    system: RefCell<&'a mut S>,
    fd_step: f64,
    last: RefCell<Option<(Point, Residuals)>>,
}

impl<'a, S: ResidualSystem> RootAdapter<'a, S> {
    /// Wrap `system`, differentiating with relative step `fd_step`.
    pub fn new(system: &'a mut S, fd_step: f64) -> Self {
        Self { system: RefCell::new(system), fd_step, last: RefCell::new(None) }
    }

    /// Number of unknowns of the wrapped system.
    pub fn dim(&self) -> usize {
        self.system.borrow().dim()
    }

    fn evaluate(&self, x: &Point) -> Result<Residuals, Error> {
        if let Some((x_last, f_last)) = self.last.borrow().as_ref() {
            if x_last == x {
                return Ok(f_last.clone());
            }
        }
        let result = self.system.borrow_mut().residuals(x);
        let f = match result {
            Ok(f) => f,
            Err(err) if S::is_out_of_domain(&err) => {
                warn!("trial point {x} rejected: {err}");
                Array1::from_elem(x.len(), f64::NAN)
            }
            Err(err) => return Err(err.into()),
        };
        self.last.replace(Some((x.clone(), f.clone())));
        Ok(f)
    }
}

impl<S: ResidualSystem> Operator for RootAdapter<'_, S> {
    type Param = Point;
    type Output = Residuals;

    fn apply(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        self.evaluate(x)
    }
}

impl<S: ResidualSystem> ArgminJacobian for RootAdapter<'_, S> {
    type Param = Point;
    type Jacobian = Jacobian;

    /// Finite-difference Jacobian at `x`.
    ///
    /// # Errors
    /// - `OptError::NonFiniteResidual` if `f(x)` itself is not finite.
    /// - Anything [`forward_jacobian`] reports.
    fn jacobian(&self, x: &Self::Param) -> Result<Self::Jacobian, Error> {
        let fx = self.evaluate(x)?;
        validate_residuals(&fx, x.len())?;
        forward_jacobian(x, &fx, self.fd_step, |p| self.evaluate(p))
    }
}
