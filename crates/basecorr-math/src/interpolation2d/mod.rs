//! Two-dimensional interpolation on rectangular grids.
//!
//! A grid is given by two strictly increasing axes and a value matrix laid
//! out as `zs[[j, i]] = f(xs[i], ys[j])`: rows follow `y`, columns follow `x`.
//! An axis may hold a single point, in which case the surface is flat along
//! it.
//!
//! Interpolators are created through an [`Interpolation2DFactory`], so that
//! owners of a grid can rebuild the interpolation whenever the values change.
//!
//! | Factory | Local | Smoothness |
//! |---------|-------|------------|
//! | [`Bilinear`] | yes | C0 |
//! | [`BicubicSpline`] | no | C2 |
//!
//! A change in one grid value only moves a local interpolation inside the
//! cells touching that value. A non-local one moves everywhere, including at
//! points whose own knots did not change.

mod bicubic;
mod bilinear;

pub use bicubic::{BicubicSpline, BicubicSplineInterpolator};
pub use bilinear::{Bilinear, BilinearInterpolator};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MathError, MathResult};
use crate::interpolation::check_axis;

/// Trait for two-dimensional interpolation.
pub trait Interpolator2D: Send + Sync {
    /// Evaluates the surface at `(x, y)` without any range check.
    ///
    /// Outside the grid this extrapolates from the edge cells.
    fn value(&self, x: f64, y: f64) -> f64;

    /// Lower and upper bound of the x axis.
    fn x_range(&self) -> (f64, f64);

    /// Lower and upper bound of the y axis.
    fn y_range(&self) -> (f64, f64);

    /// Checks if `(x, y)` is inside the grid, bounds included.
    fn is_in_range(&self, x: f64, y: f64) -> bool {
        let (x_min, x_max) = self.x_range();
        let (y_min, y_max) = self.y_range();
        x >= x_min && x <= x_max && y >= y_min && y <= y_max
    }

    /// Returns the interpolated value at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` for a non-finite query and
    /// `MathError::ExtrapolationNotAllowed` for a query outside the grid
    /// unless `allow_extrapolation` is set.
    fn interpolate(&self, x: f64, y: f64, allow_extrapolation: bool) -> MathResult<f64> {
        if !x.is_finite() || !y.is_finite() {
            return Err(MathError::invalid_input(format!(
                "query point ({x}, {y}) must be finite"
            )));
        }
        if !allow_extrapolation && !self.is_in_range(x, y) {
            let (x_min, x_max) = self.x_range();
            let (y_min, y_max) = self.y_range();
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                y,
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }
        Ok(self.value(x, y))
    }
}

impl<T: Interpolator2D + ?Sized> Interpolator2D for Box<T> {
    fn value(&self, x: f64, y: f64) -> f64 {
        (**self).value(x, y)
    }

    fn x_range(&self) -> (f64, f64) {
        (**self).x_range()
    }

    fn y_range(&self) -> (f64, f64) {
        (**self).y_range()
    }
}

/// Creates interpolators over a grid.
pub trait Interpolation2DFactory: Send + Sync {
    /// The interpolator type produced.
    type Output: Interpolator2D;

    /// Builds an interpolator over `zs[[j, i]] = f(xs[i], ys[j])`.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is empty or not strictly increasing, the
    /// value shape does not match the axes, or a value is not finite.
    fn build(&self, xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self::Output>;

    /// Returns true if a grid value only influences its neighbouring cells.
    fn is_local(&self) -> bool;

    /// Name of the interpolation scheme.
    fn name(&self) -> &'static str;
}

/// Runtime selection of a 2D interpolation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation2DMethod {
    /// [`Bilinear`]
    #[default]
    Bilinear,
    /// [`BicubicSpline`]
    BicubicSpline,
}

impl Interpolation2DMethod {
    /// Parses a method name such as `"bilinear"` or `"bicubic_spline"`.
    ///
    /// # Errors
    ///
    /// Returns `MathError::InvalidInput` for unknown names.
    pub fn parse(s: &str) -> MathResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "bilinear" => Ok(Self::Bilinear),
            "bicubic" | "bicubicspline" => Ok(Self::BicubicSpline),
            _ => Err(MathError::invalid_input(format!(
                "unknown 2D interpolation method '{s}'"
            ))),
        }
    }
}

impl Interpolation2DFactory for Interpolation2DMethod {
    type Output = Box<dyn Interpolator2D>;

    fn build(&self, xs: &[f64], ys: &[f64], zs: ArrayView2<'_, f64>) -> MathResult<Self::Output> {
        log::trace!("building {} over {}x{} grid", self.name(), ys.len(), xs.len());
        Ok(match self {
            Self::Bilinear => Box::new(Bilinear.build(xs, ys, zs)?),
            Self::BicubicSpline => Box::new(BicubicSpline.build(xs, ys, zs)?),
        })
    }

    fn is_local(&self) -> bool {
        match self {
            Self::Bilinear => Bilinear.is_local(),
            Self::BicubicSpline => BicubicSpline.is_local(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Bilinear => Bilinear.name(),
            Self::BicubicSpline => BicubicSpline.name(),
        }
    }
}

impl fmt::Display for Interpolation2DMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validates a grid before an interpolator is built over it.
pub(crate) fn check_grid(xs: &[f64], ys: &[f64], zs: &ArrayView2<'_, f64>) -> MathResult<()> {
    check_axis("x", xs, 1)?;
    check_axis("y", ys, 1)?;

    let (rows, cols) = zs.dim();
    if rows != ys.len() || cols != xs.len() {
        return Err(MathError::DimensionMismatch {
            rows,
            cols,
            expected_rows: ys.len(),
            expected_cols: xs.len(),
        });
    }

    if let Some(((j, i), z)) = zs.indexed_iter().find(|(_, z)| !z.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "grid value at row {j}, column {i} is not finite ({z})"
        )));
    }

    Ok(())
}
