//! Correlation term structure abstraction.
//!
//! A correlation term structure maps (time, loss level) to a correlation.
//! Time is measured in years from the reference date with the structure's
//! day count. The reference date either moves with a shared
//! [`EvaluationDate`] (advanced by the settlement lag) or is fixed.

use std::fmt;
use std::sync::{Arc, Weak};

use basecorr_core::calendars::{BusinessDayConvention, Calendar};
use basecorr_core::daycounts::DayCountConvention;
use basecorr_core::observer::Observer;
use basecorr_core::settings::EvaluationDate;
use basecorr_core::types::Date;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{CorrelationError, CorrelationResult};

/// Core abstraction for correlation term structures.
///
/// All correlation term structures are `Send + Sync`.
pub trait CorrelationTermStructure: Send + Sync {
    /// Returns the reference date times are measured from.
    fn reference_date(&self) -> CorrelationResult<Date>;

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> CorrelationResult<f64>;

    /// Latest date the structure is defined for.
    fn max_date(&self) -> Date;

    /// Number of correlation factors. Base correlation is a scalar.
    fn correlation_size(&self) -> usize {
        1
    }

    /// Correlation at `t` years and the given loss level.
    fn correlation_at_time(&self, t: f64, loss_level: f64, extrapolate: bool)
        -> CorrelationResult<f64>;

    /// Correlation at a date and the given loss level.
    fn correlation(&self, date: Date, loss_level: f64, extrapolate: bool) -> CorrelationResult<f64> {
        let t = self.time_from_reference(date)?;
        self.correlation_at_time(t, loss_level, extrapolate)
    }

    /// Time of [`CorrelationTermStructure::max_date`].
    fn max_time(&self) -> CorrelationResult<f64> {
        self.time_from_reference(self.max_date())
    }
}

/// Where the reference date comes from.
#[derive(Clone)]
pub enum ReferenceDateSource {
    /// Evaluation date advanced by the settlement lag; follows every move.
    Moving(Arc<EvaluationDate>),
    /// A fixed reference date.
    Fixed(Date),
}

impl fmt::Debug for ReferenceDateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moving(eval) => write!(f, "Moving({})", eval.date()),
            Self::Fixed(date) => write!(f, "Fixed({date})"),
        }
    }
}

/// Reference date and day count machinery shared by correlation structures.
#[derive(Clone)]
pub struct CorrelationTermStructureBase {
    settlement_days: u32,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    day_count: DayCountConvention,
    source: ReferenceDateSource,
}

impl CorrelationTermStructureBase {
    /// Creates a base whose reference date is `settlement_days` business
    /// days after the evaluation date.
    #[must_use]
    pub fn moving(
        settlement_days: u32,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        day_count: DayCountConvention,
        evaluation_date: Arc<EvaluationDate>,
    ) -> Self {
        Self {
            settlement_days,
            calendar,
            convention,
            day_count,
            source: ReferenceDateSource::Moving(evaluation_date),
        }
    }

    /// Creates a base with a fixed reference date.
    #[must_use]
    pub fn fixed(
        reference_date: Date,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        day_count: DayCountConvention,
    ) -> Self {
        Self {
            settlement_days: 0,
            calendar,
            convention,
            day_count,
            source: ReferenceDateSource::Fixed(reference_date),
        }
    }

    /// Current reference date.
    ///
    /// # Errors
    ///
    /// Propagates calendar errors from the settlement advance.
    pub fn reference_date(&self) -> CorrelationResult<Date> {
        match &self.source {
            ReferenceDateSource::Fixed(date) => Ok(*date),
            ReferenceDateSource::Moving(eval) => {
                let days = i32::try_from(self.settlement_days).map_err(|_| {
                    CorrelationError::invalid_input(format!(
                        "settlement lag of {} days is too large",
                        self.settlement_days
                    ))
                })?;
                Ok(self.calendar.advance_business_days(eval.date(), days)?)
            }
        }
    }

    /// Year fraction between two dates under the structure's day count.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` if the fraction does not fit
    /// an `f64`.
    pub fn year_fraction(&self, start: Date, end: Date) -> CorrelationResult<f64> {
        let fraction = self.day_count.year_fraction(start, end);
        fraction.to_f64().ok_or_else(|| {
            CorrelationError::invalid_input(format!(
                "year fraction {fraction} from {start} to {end} is not representable"
            ))
        })
    }

    /// Year fraction from the current reference date to `date`.
    ///
    /// # Errors
    ///
    /// As for [`CorrelationTermStructureBase::reference_date`].
    pub fn time_from_reference(&self, date: Date) -> CorrelationResult<f64> {
        self.year_fraction(self.reference_date()?, date)
    }

    /// Registers `observer` with the evaluation date of a moving base.
    pub fn subscribe_to_reference(&self, observer: Weak<dyn Observer>) {
        if let ReferenceDateSource::Moving(eval) = &self.source {
            eval.subscribe(observer);
        }
    }

    /// Returns true if the reference date follows the evaluation date.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self.source, ReferenceDateSource::Moving(_))
    }

    /// Settlement lag in business days.
    #[must_use]
    pub fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    /// Calendar.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Business day convention.
    #[must_use]
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Reference date source.
    #[must_use]
    pub fn source(&self) -> &ReferenceDateSource {
        &self.source
    }
}

impl fmt::Debug for CorrelationTermStructureBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationTermStructureBase")
            .field("settlement_days", &self.settlement_days)
            .field("calendar", &self.calendar.name())
            .field("convention", &self.convention)
            .field("day_count", &self.day_count)
            .field("source", &self.source)
            .finish()
    }
}
