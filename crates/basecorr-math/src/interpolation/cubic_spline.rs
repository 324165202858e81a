//! Natural cubic spline kernels.

use super::find_segment;

/// Evaluates a spline given its knots and second derivatives.
///
/// Outside the knots the end polynomials are extended. A single knot gives
/// a constant.
pub(crate) fn spline_value(xs: &[f64], ys: &[f64], y2s: &[f64], x: f64) -> f64 {
    if xs.len() < 2 {
        return ys[0];
    }
    let i = find_segment(xs, x);

    let h = xs[i + 1] - xs[i];
    let a = (xs[i + 1] - x) / h;
    let b = (x - xs[i]) / h;

    a * ys[i] + b * ys[i + 1] + ((a * a * a - a) * y2s[i] + (b * b * b - b) * y2s[i + 1]) * (h * h) / 6.0
}

/// Second derivatives of the natural cubic spline through `(xs, ys)`.
///
/// `xs` must be strictly increasing and not empty.
pub(crate) fn natural_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n.saturating_sub(1)];

    // Tridiagonal decomposition
    for i in 1..n.saturating_sub(1) {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        let slope_change =
            (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * slope_change / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Back-substitution; y2s[n-1] stays 0
    for i in (0..n.saturating_sub(1)).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
