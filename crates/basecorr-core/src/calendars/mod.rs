//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with adjustment and period advance
//! - Business day adjustment conventions
//! - A few concrete calendars used by credit index markets

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod conventions;
mod target;

pub use conventions::BusinessDayConvention;
pub use target::TargetCalendar;

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period, TimeUnit};

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by a period and adjusts the result.
    ///
    /// A zero period only adjusts. A period in days moves by business days;
    /// weeks, months and years move by calendar time and then adjust.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
    ) -> CoreResult<Date> {
        self.advance_with_eom(date, period, convention, false)
    }

    /// Like [`Calendar::advance`], with the end-of-month rule: when
    /// `end_of_month` is set and `date` is the last business day of its month,
    /// month and year advances land on the last business day of the target
    /// month.
    fn advance_with_eom(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> CoreResult<Date> {
        if period.length() == 0 {
            return self.adjust(date, convention);
        }

        match period.unit() {
            TimeUnit::Days => self.advance_business_days(date, period.length()),
            TimeUnit::Weeks => self.adjust(date.add_period(period)?, convention),
            TimeUnit::Months | TimeUnit::Years => {
                let shifted = date.add_period(period)?;
                if end_of_month && self.is_end_of_month(date)? {
                    self.end_of_month(shifted)
                } else {
                    self.adjust(shifted, convention)
                }
            }
        }
    }

    /// Moves a date by a number of business days.
    ///
    /// Zero days adjusts to the following business day.
    fn advance_business_days(&self, date: Date, days: i32) -> CoreResult<Date> {
        if days == 0 {
            return self.adjust(date, BusinessDayConvention::Following);
        }

        let direction: i64 = if days > 0 { 1 } else { -1 };
        let mut remaining = days.unsigned_abs();
        let mut result = date;

        while remaining > 0 {
            result = result.add_days(direction);
            let convention = if direction > 0 {
                BusinessDayConvention::Following
            } else {
                BusinessDayConvention::Preceding
            };
            result = self.adjust(result, convention)?;
            remaining -= 1;
        }

        Ok(result)
    }

    /// Returns the last business day of the date's month.
    fn end_of_month(&self, date: Date) -> CoreResult<Date> {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Returns true if the date is on or after the last business day of its month.
    fn is_end_of_month(&self, date: Date) -> CoreResult<bool> {
        Ok(date >= self.end_of_month(date)?)
    }

    /// Counts business days between two dates (exclusive of start, inclusive of end).
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A calendar where every day is a business day.
///
/// Schedule generation steps periods on this calendar before applying
/// the real calendar's adjustment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCalendar;

impl Calendar for NullCalendar {
    fn name(&self) -> &'static str {
        "Null"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// This is also the calendar credit index maturities roll on.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(
            date.as_naive_date().weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        )
    }
}

/// Identifier for the built-in calendars, used by configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarId {
    /// [`NullCalendar`]
    Null,
    /// [`WeekendCalendar`]
    #[default]
    Weekend,
    /// [`TargetCalendar`]
    Target,
}

impl CalendarId {
    /// Converts the calendar ID to a shared Calendar trait object.
    #[must_use]
    pub fn to_calendar(&self) -> Arc<dyn Calendar> {
        match self {
            CalendarId::Null => Arc::new(NullCalendar),
            CalendarId::Weekend => Arc::new(WeekendCalendar),
            CalendarId::Target => Arc::new(TargetCalendar),
        }
    }

    /// Parses a calendar identifier such as `"TARGET"` or `"WEEKEND"`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CalendarError` for unknown identifiers.
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "NULL" => Ok(CalendarId::Null),
            "WEEKEND" | "WEEKENDS_ONLY" => Ok(CalendarId::Weekend),
            "TARGET" | "TARGET2" | "EUR" => Ok(CalendarId::Target),
            other => Err(CoreError::calendar(format!("unknown calendar '{other}'"))),
        }
    }
}
