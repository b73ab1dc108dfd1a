//! Execution helper that runs [`PowellHybrid`] on a residual system and
//! returns a crate-friendly [`RootOutcome`].
use argmin::core::{Error, Executor, State};

use crate::optimization::root_finder::{
    adapter::RootAdapter,
    hybrid::PowellHybrid,
    traits::{ResidualSystem, RootOptions, RootOutcome},
    types::Point,
};

/// Run the hybrid solver from `x0` on `problem`.
///
/// Wires up:
/// - the [`RootAdapter`] around the caller's system,
/// - a [`PowellHybrid`] built from `opts`,
/// - the initial point via `state.param(x0)` and `opts.max_iter`,
/// - the slog observer when `opts.verbose` and the `obs_slog` feature are on.
///
/// # Errors
/// Returns argmin's error type unchanged, so errors raised by the system
/// can be downcast back to the caller's type (see [`solve_root`]).
///
/// [`solve_root`]: crate::optimization::root_finder::solve_root
pub fn run_hybrid<S: ResidualSystem>(
    x0: Point, opts: &RootOptions, problem: RootAdapter<'_, S>,
) -> Result<RootOutcome, Error> {
    let solver = PowellHybrid::new(opts);
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.param(x0).max_iters(opts.max_iter as u64));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = executor.run()?.state().clone();
    let iterations = result.get_iter();
    let fn_evals = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let cost = result.get_best_cost();
    Ok(RootOutcome::new(result.take_best_param(), cost, termination, iterations, fn_evals)?)
}
