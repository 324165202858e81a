//! Domain types for dates and tenors.
//!
//! - [`Date`]: Calendar date for financial calculations
//! - [`Period`]: Tenor such as `3M` or `5Y`
//! - [`Frequency`]: Schedule frequency

mod date;
mod frequency;
mod period;

pub use chrono::Weekday;
pub use date::Date;
pub use frequency::Frequency;
pub use period::{Period, TimeUnit};
