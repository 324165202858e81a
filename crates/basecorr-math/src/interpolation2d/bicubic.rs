//! Bicubic spline interpolation.

use ndarray::ArrayView2;

use super::{check_grid, Interpolation2DFactory, Interpolator2D};
use crate::error::MathResult;
use crate::interpolation::{natural_second_derivatives, spline_value};

/// Factory for [`BicubicSplineInterpolator`].
///
/// The spline is non-local: moving one grid value changes the surface
/// across its whole row and column span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BicubicSpline;

impl Interpolation2DFactory for BicubicSpline {
    type Output = BicubicSplineInterpolator;

    fn build(&self, xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self::Output> {
        BicubicSplineInterpolator::new(xs, ys, zs)
    }

    fn is_local(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "BicubicSpline"
    }
}

/// Natural bicubic spline on a rectangular grid.
///
/// A natural cubic spline is fitted along `x` for every `y` row. A query
/// evaluates all row splines at `x`, then fits a natural spline along `y`
/// through those values. Outside the grid the end polynomials are extended.
/// A single-point axis is flat.
#[derive(Debug, Clone)]
pub struct BicubicSplineInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone)]
struct Row {
    zs: Vec<f64>,
    y2s: Vec<f64>,
}

impl BicubicSplineInterpolator {
    /// Builds a bicubic spline over `zs[[j, i]] = f(xs[i], ys[j])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is invalid.
    pub fn new(xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self> {
        check_grid(xs, ys, &zs)?;

        let rows = zs
            .rows()
            .into_iter()
            .map(|row| {
                let zs = row.to_vec();
                let y2s = natural_second_derivatives(xs, &zs);
                Row { zs, y2s }
            })
            .collect();

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            rows,
        })
    }
}

impl Interpolator2D for BicubicSplineInterpolator {
    fn value(&self, x: f64, y: f64) -> f64 {
        let column: Vec<f64> = self
            .rows
            .iter()
            .map(|row| spline_value(&self.xs, &row.zs, &row.y2s, x))
            .collect();
        let y2s = natural_second_derivatives(&self.ys, &column);
        spline_value(&self.ys, &column, &y2s, y)
    }

    fn x_range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    fn y_range(&self) -> (f64, f64) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn tabulate(xs: &[f64], ys: &[f64], f: impl Fn(f64, f64) -> f64) -> Array2<f64> {
        Array2::from_shape_fn((ys.len(), xs.len()), |(j, i)| f(xs[i], ys[j]))
    }

    #[test]
    fn test_bicubic_exact_on_grid() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        let zs = tabulate(&xs, &ys, |x, y| x * x + y);
        let interp = BicubicSpline.build(&xs, &ys, zs.view()).unwrap();

        for &y in &ys {
            for &x in &xs {
                assert_relative_eq!(interp.value(x, y), x * x + y, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_bicubic_reproduces_planes() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        let zs = tabulate(&xs, &ys, |x, y| 2.0 * x + 3.0 * y + 1.0);
        let interp = BicubicSpline.build(&xs, &ys, zs.view()).unwrap();

        assert_relative_eq!(interp.value(1.5, 2.5), 2.0 * 1.5 + 3.0 * 2.5 + 1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.value(4.0, -1.0), 2.0 * 4.0 - 3.0 + 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bicubic_two_by_two_is_bilinear() {
        let xs = [0.0, 1.0];
        let ys = [0.0, 1.0];
        let zs = tabulate(&xs, &ys, |x, y| x * y);
        let interp = BicubicSpline.build(&xs, &ys, zs.view()).unwrap();

        assert_relative_eq!(interp.value(0.5, 0.5), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_bicubic_is_not_local() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0];
        let base = Array2::<f64>::zeros((2, 4));
        let mut bumped = base.clone();
        bumped[[0, 3]] = 1.0;

        let a = BicubicSpline.build(&xs, &ys, base.view()).unwrap();
        let b = BicubicSpline.build(&xs, &ys, bumped.view()).unwrap();

        assert!((a.value(0.5, 0.0) - b.value(0.5, 0.0)).abs() > 1e-6);
    }

    #[test]
    fn test_bicubic_single_column() {
        let xs = [2.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        let zs = tabulate(&xs, &ys, |_, y| 2.0 * y + 1.0);
        let interp = BicubicSpline.build(&xs, &ys, zs.view()).unwrap();

        assert_relative_eq!(interp.value(2.0, 1.5), 4.0, epsilon = 1e-10);
        assert_relative_eq!(interp.value(9.0, 2.5), 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bicubic_single_row() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.07];
        let zs = tabulate(&xs, &ys, |x, _| x * x);
        let interp = BicubicSpline.build(&xs, &ys, zs.view()).unwrap();

        for &x in &xs {
            assert_relative_eq!(interp.value(x, 0.07), x * x, epsilon = 1e-10);
            assert_relative_eq!(interp.value(x, 0.5), x * x, epsilon = 1e-10);
        }
    }
}
