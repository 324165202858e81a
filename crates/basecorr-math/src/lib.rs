//! # Basecorr Math
//!
//! Two-dimensional interpolation for the Basecorr credit correlation
//! library: bilinear and bicubic spline schemes on rectangular grids,
//! created through factories so surfaces can rebuild them on demand.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::needless_pass_by_value)]

pub mod error;
mod interpolation;
pub mod interpolation2d;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation2d::{
        BicubicSpline, Bilinear, Interpolation2DFactory, Interpolation2DMethod, Interpolator2D,
    };
}

pub use error::{MathError, MathResult};
