//! # Basecorr Credit
//!
//! Base correlation term structures for portfolio credit derivatives.
//!
//! This crate provides:
//!
//! - **Grid validation**: tenor and loss level checks with positional errors
//! - **Maturities**: tranche maturity dates by calendar advance or CDS roll
//!   schedules, with expired tenors dropped from the front
//! - **Quote matrix**: live quotes by loss level and tenor, aligned to the
//!   surviving tenors
//! - **Base correlation**: a (time, loss level) surface that rebuilds itself
//!   whenever a quote or the evaluation date changes
//! - **Configuration**: JSON and TOML surface descriptions
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use basecorr_core::prelude::*;
//! use basecorr_credit::prelude::*;
//!
//! let eval = EvaluationDate::shared(Date::from_ymd(2024, 1, 15).unwrap());
//! let quotes: Vec<Vec<Arc<dyn Quote>>> = [[0.20, 0.25], [0.35, 0.40]]
//!     .iter()
//!     .map(|row| row.iter().map(|v| SimpleQuote::shared(*v) as Arc<dyn Quote>).collect())
//!     .collect();
//!
//! let surface = BaseCorrelationTermStructure::builder()
//!     .with_tenors(vec![Period::years(3), Period::years(5)])
//!     .with_loss_levels(vec![0.03, 0.07])
//!     .with_quotes(quotes)
//!     .with_evaluation_date(eval)
//!     .with_rule(DateGenerationRule::CDS2015)
//!     .build()
//!     .unwrap();
//!
//! let rho = surface.correlation(surface.max_date(), 0.05, false).unwrap();
//! assert!((rho - 0.325).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

pub mod base_correlation;
pub mod config;
pub mod error;
pub mod maturity;
pub mod quote_matrix;
pub mod term_structure;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::base_correlation::{BaseCorrelationBuilder, BaseCorrelationTermStructure};
    pub use crate::config::{BaseCorrelationConfig, Validate, ValidationError};
    pub use crate::error::{CorrelationError, CorrelationResult};
    pub use crate::maturity::{maturity_date, MaturityGrid};
    pub use crate::quote_matrix::{ColumnAlignment, QuoteMatrix};
    pub use crate::term_structure::{
        CorrelationTermStructure, CorrelationTermStructureBase, ReferenceDateSource,
    };
    pub use crate::validation::{check_dimensions, check_loss_levels, check_tenors};
}

pub use error::{CorrelationError, CorrelationResult};
