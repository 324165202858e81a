//! # Basecorr Core
//!
//! Market plumbing for the Basecorr credit correlation library.
//!
//! - **Types**: `Date`, `Period` tenors and `Frequency`
//! - **Calendars**: business day calendars, adjustment and period advance
//! - **Day Counts**: year fractions measured from a reference date
//! - **Schedules**: date generation rules, including the CDS roll rules
//! - **Quotes**: observable market values and the shared evaluation date
//!
//! ## Example
//!
//! ```rust
//! use basecorr_core::prelude::*;
//!
//! let trade = Date::from_ymd(2024, 1, 15).unwrap();
//! let maturity = cds_maturity(trade, Period::years(5), DateGenerationRule::CDS2015).unwrap();
//! assert_eq!(maturity, Some(Date::from_ymd(2028, 12, 20).unwrap()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unnecessary_map_or)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod observer;
pub mod quotes;
pub mod schedule;
pub mod settings;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, CalendarId, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::observer::{Observable, Observer};
    pub use crate::quotes::{DerivedQuote, Quote, SimpleQuote};
    pub use crate::schedule::{cds_maturity, DateGenerationRule, Schedule};
    pub use crate::settings::EvaluationDate;
    pub use crate::types::{Date, Frequency, Period, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Period};
