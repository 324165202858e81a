//! Bilinear interpolation.

use ndarray::{Array2, ArrayView2};

use super::{check_grid, Interpolation2DFactory, Interpolator2D};
use crate::error::MathResult;
use crate::interpolation::bracket;

/// Factory for [`BilinearInterpolator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bilinear;

impl Interpolation2DFactory for Bilinear {
    type Output = BilinearInterpolator;

    fn build(&self, xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self::Output> {
        BilinearInterpolator::new(xs, ys, zs)
    }

    fn is_local(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Bilinear"
    }
}

/// Bilinear interpolation on a rectangular grid.
///
/// Each cell is interpolated from its four corners. Outside the grid the
/// edge cell is extended linearly. An axis with a single point is flat, so
/// the surface reduces to linear interpolation along the other axis.
#[derive(Debug, Clone)]
pub struct BilinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Array2<f64>,
}

impl BilinearInterpolator {
    /// Builds a bilinear interpolation over `zs[[j, i]] = f(xs[i], ys[j])`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is invalid.
    pub fn new(xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self> {
        check_grid(xs, ys, &zs)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            zs: zs.to_owned(),
        })
    }
}

impl Interpolator2D for BilinearInterpolator {
    fn value(&self, x: f64, y: f64) -> f64 {
        let (i0, i1, t) = bracket(&self.xs, x);
        let (j0, j1, u) = bracket(&self.ys, y);

        let z1 = self.zs[[j0, i0]];
        let z2 = self.zs[[j0, i1]];
        let z3 = self.zs[[j1, i0]];
        let z4 = self.zs[[j1, i1]];

        (1.0 - t) * (1.0 - u) * z1 + t * (1.0 - u) * z2 + (1.0 - t) * u * z3 + t * u * z4
    }

    fn x_range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    fn y_range(&self) -> (f64, f64) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }
}
