//! Log-spaced asset grid.
//!
//! The household problem is solved on a grid that is dense near the
//! borrowing limit, where policy functions bend, and sparse at high wealth,
//! where they are close to linear. [`equilogspace`] shifts the interval by a
//! pivot so the geometric spacing is well defined even when the lower bound
//! is zero or negative.
use ndarray::Array1;

use crate::grids::errors::{GridError, GridResult};

/// Offset added to `|x0|` before geometric spacing.
const PIVOT_OFFSET: f64 = 0.25;

/// Build `n` points between `x0` and `x1`, equally spaced in `log(x + pivot)`.
///
/// Parameters
/// ----------
/// - `x0`: `f64`
///   Lower bound (borrowing limit). May be zero or negative.
/// - `x1`: `f64`
///   Upper bound. Must be finite and strictly above `x0`.
/// - `n`: `usize`
///   Number of points, at least 2.
///
/// Returns
/// -------
/// `GridResult<Array1<f64>>`
///   Strictly increasing grid with `grid[0] == x0` and `grid[n-1] == x1`
///   exactly. The endpoints are written back after the transform so that
///   rounding in `exp(log(.))` never moves them.
///
/// Errors
/// ------
/// - `GridError::TooFewPoints` if `n < 2`.
/// - `GridError::InvalidBounds` if a bound is non-finite or `x1 <= x0`.
pub fn equilogspace(x0: f64, x1: f64, n: usize) -> GridResult<Array1<f64>> {
    if n < 2 {
        return Err(GridError::TooFewPoints { n });
    }
    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        return Err(GridError::InvalidBounds { lower: x0, upper: x1 });
    }

    let pivot = x0.abs() + PIVOT_OFFSET;
    let lo = (x0 + pivot).ln();
    let hi = (x1 + pivot).ln();
    let step = (hi - lo) / (n - 1) as f64;

    let mut grid = Array1::from_shape_fn(n, |i| (lo + step * i as f64).exp() - pivot);
    grid[0] = x0;
    grid[n - 1] = x1;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The baseline asset grid is strictly increasing with exact endpoints.
    //
    // Given
    // -----
    // - a_min = 0, a_max = 100, Na = 500.
    //
    // Expect
    // ------
    // - Length 500, first point exactly 0, last exactly 100, strictly increasing.
    fn equilogspace_baseline_grid_is_monotone_with_exact_endpoints() {
        // Arrange
        let (a_min, a_max, na) = (0.0, 100.0, 500);

        // Act
        let grid = equilogspace(a_min, a_max, na).unwrap();

        // Assert
        assert_eq!(grid.len(), na);
        assert_eq!(grid[0], a_min);
        assert_eq!(grid[na - 1], a_max);
        assert!(grid.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    // Purpose
    // -------
    // Spacing grows with wealth (denser near the borrowing limit).
    //
    // Given
    // -----
    // - A 50-point grid on [0, 100].
    //
    // Expect
    // ------
    // - Each gap is at least as large as the previous one.
    fn equilogspace_gaps_widen_with_wealth() {
        let grid = equilogspace(0.0, 100.0, 50).unwrap();
        let gaps: Vec<f64> = grid.windows(2).into_iter().map(|w| w[1] - w[0]).collect();

        assert!(gaps.windows(2).all(|g| g[1] >= g[0]));
    }

    #[test]
    // Purpose
    // -------
    // A negative borrowing limit is supported through the pivot shift.
    //
    // Given
    // -----
    // - Bounds [-2, 10] with 20 points.
    //
    // Expect
    // ------
    // - Exact endpoints and strict monotonicity.
    fn equilogspace_supports_negative_lower_bound() {
        let grid = equilogspace(-2.0, 10.0, 20).unwrap();

        assert_eq!(grid[0], -2.0);
        assert_eq!(grid[19], 10.0);
        assert!(grid.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    // Purpose
    // -------
    // Degenerate requests are rejected.
    //
    // Given
    // -----
    // - n = 1, and reversed bounds.
    //
    // Expect
    // ------
    // - `TooFewPoints` and `InvalidBounds` respectively.
    fn equilogspace_rejects_degenerate_input() {
        assert_eq!(equilogspace(0.0, 1.0, 1), Err(GridError::TooFewPoints { n: 1 }));
        assert_eq!(
            equilogspace(1.0, 0.0, 10),
            Err(GridError::InvalidBounds { lower: 1.0, upper: 0.0 })
        );
    }
}
