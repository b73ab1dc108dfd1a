//! Bracketing and linear interpolation on increasing grids.
use ndarray::ArrayView1;

/// Index `j` such that `xs[j] <= x < xs[j+1]`, clamped to `[0, n-2]`.
///
/// Points below the grid map to `0` and points at or above the last node map
/// to `n - 2`, so the returned pair always exists for `n ≥ 2`.
#[inline]
pub fn bracket(xs: ArrayView1<'_, f64>, x: f64) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    let (mut lo, mut hi) = (0, n - 1);
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] <= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Linear interpolation of `ys(xs)` at `x`, extrapolating beyond the ends.
#[inline]
pub fn interp_linear(xs: ArrayView1<'_, f64>, ys: ArrayView1<'_, f64>, x: f64) -> f64 {
    let j = bracket(xs, x);
    let slope = (ys[j + 1] - ys[j]) / (xs[j + 1] - xs[j]);
    ys[j] + slope * (x - xs[j])
}
