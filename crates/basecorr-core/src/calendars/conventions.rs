//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Longest run of consecutive holidays a calendar may report before
/// adjustment gives up.
const MAX_HOLIDAY_RUN: u32 = 366;

/// Business day adjustment conventions.
///
/// These conventions specify how to adjust a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    Unadjusted,

    /// Move to the following business day.
    #[default]
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    ModifiedFollowing,

    /// Move to the preceding business day.
    Preceding,

    /// Move to the preceding business day, unless it crosses a month boundary,
    /// in which case move to the following business day.
    ModifiedPreceding,

    /// Modified following, but also moving back when following would cross
    /// the 15th of the month.
    HalfMonthModifiedFollowing,

    /// Move to the nearest business day (following on a tie).
    Nearest,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
            BusinessDayConvention::HalfMonthModifiedFollowing => "Half-Month Modified Following",
            BusinessDayConvention::Nearest => "Nearest",
        };
        write!(f, "{name}")
    }
}

/// Adjusts a date according to the given business day convention.
///
/// # Errors
///
/// Returns `CoreError::CalendarError` if the calendar reports no business
/// day within a year of `date`.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> CoreResult<Date> {
    if convention == BusinessDayConvention::Unadjusted || calendar.is_business_day(date) {
        return Ok(date);
    }

    match convention {
        BusinessDayConvention::Unadjusted => Ok(date),

        BusinessDayConvention::Following => following(date, calendar),

        BusinessDayConvention::ModifiedFollowing => {
            let adjusted = following(date, calendar)?;
            if adjusted.month() != date.month() {
                preceding(date, calendar)
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::HalfMonthModifiedFollowing => {
            let adjusted = following(date, calendar)?;
            if adjusted.month() != date.month() || (date.day() <= 15 && adjusted.day() > 15) {
                preceding(date, calendar)
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::Preceding => preceding(date, calendar),

        BusinessDayConvention::ModifiedPreceding => {
            let adjusted = preceding(date, calendar)?;
            if adjusted.month() != date.month() {
                following(date, calendar)
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::Nearest => {
            let fwd = following(date, calendar)?;
            let back = preceding(date, calendar)?;

            if date.days_between(&fwd) <= back.days_between(&date) {
                Ok(fwd)
            } else {
                Ok(back)
            }
        }
    }
}

/// Next business day on or after `date`.
fn following<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, 1, calendar)
}

/// Previous business day on or before `date`.
fn preceding<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, -1, calendar)
}

fn roll<C: Calendar + ?Sized>(mut date: Date, step: i64, calendar: &C) -> CoreResult<Date> {
    let start = date;
    for _ in 0..MAX_HOLIDAY_RUN {
        if calendar.is_business_day(date) {
            return Ok(date);
        }
        date = date.add_days(step);
    }
    Err(CoreError::calendar(format!(
        "{} has no business day within {MAX_HOLIDAY_RUN} days of {start}",
        calendar.name()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    #[test]
    fn test_following() {
        let cal = WeekendCalendar;

        // Saturday should roll to Monday
        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        let adjusted = adjust(saturday, BusinessDayConvention::Following, &cal).unwrap();

        assert_eq!(adjusted, Date::from_ymd(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_preceding() {
        let cal = WeekendCalendar;

        let sunday = Date::from_ymd(2025, 1, 5).unwrap();
        let adjusted = adjust(sunday, BusinessDayConvention::Preceding, &cal).unwrap();

        assert_eq!(adjusted, Date::from_ymd(2025, 1, 3).unwrap());
    }

    #[test]
    fn test_modified_following_month_end() {
        let cal = WeekendCalendar;

        // Saturday 2024-08-31: following would be September, so roll back
        let saturday = Date::from_ymd(2024, 8, 31).unwrap();
        let adjusted = adjust(saturday, BusinessDayConvention::ModifiedFollowing, &cal).unwrap();

        assert_eq!(adjusted, Date::from_ymd(2024, 8, 30).unwrap());
    }

    #[test]
    fn test_modified_preceding_month_start() {
        let cal = WeekendCalendar;

        // Sunday 2024-09-01: preceding would be August, so roll forward
        let sunday = Date::from_ymd(2024, 9, 1).unwrap();
        let adjusted = adjust(sunday, BusinessDayConvention::ModifiedPreceding, &cal).unwrap();

        assert_eq!(adjusted, Date::from_ymd(2024, 9, 2).unwrap());
    }

    #[test]
    fn test_half_month_modified_following() {
        let cal = WeekendCalendar;

        // Saturday 2024-06-15: following is the 17th, past mid-month
        let saturday = Date::from_ymd(2024, 6, 15).unwrap();
        let adjusted =
            adjust(saturday, BusinessDayConvention::HalfMonthModifiedFollowing, &cal).unwrap();

        assert_eq!(adjusted, Date::from_ymd(2024, 6, 14).unwrap());
    }

    #[test]
    fn test_nearest() {
        let cal = WeekendCalendar;

        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        let sunday = Date::from_ymd(2025, 1, 5).unwrap();

        assert_eq!(
            adjust(saturday, BusinessDayConvention::Nearest, &cal).unwrap(),
            Date::from_ymd(2025, 1, 3).unwrap()
        );
        assert_eq!(
            adjust(sunday, BusinessDayConvention::Nearest, &cal).unwrap(),
            Date::from_ymd(2025, 1, 6).unwrap()
        );
    }

    #[test]
    fn test_unadjusted_keeps_holiday() {
        let cal = WeekendCalendar;
        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        assert_eq!(
            adjust(saturday, BusinessDayConvention::Unadjusted, &cal).unwrap(),
            saturday
        );
    }
}
