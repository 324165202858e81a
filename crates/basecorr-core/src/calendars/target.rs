//! TARGET calendar for Eurozone payments settlement.
//!
//! The calendar iTraxx index tranches adjust on.

use super::Calendar;
use crate::types::{Date, Weekday};

/// TARGET holiday calendar.
///
/// ## Holidays
///
/// - Saturdays and Sundays
/// - New Year's Day (January 1)
/// - Good Friday and Easter Monday (from 2000)
/// - Labour Day (May 1, from 2000)
/// - Christmas Day (December 25)
/// - Boxing Day (December 26, from 2000)
/// - December 31 in 1998, 1999 and 2001
///
/// Holidays falling on a weekend are not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetCalendar;

impl TargetCalendar {
    fn is_target_holiday(date: Date) -> bool {
        let (year, month, day) = (date.year(), date.month(), date.day());

        match (month, day) {
            (1, 1) | (12, 25) => return true,
            (5, 1) | (12, 26) if year >= 2000 => return true,
            (12, 31) if matches!(year, 1998 | 1999 | 2001) => return true,
            _ => {}
        }

        if year >= 2000 {
            let easter = easter_sunday(year);
            let offset = easter.days_between(&date);
            // Good Friday or Easter Monday
            if offset == -2 || offset == 1 {
                return true;
            }
        }

        false
    }
}

impl Calendar for TargetCalendar {
    fn name(&self) -> &'static str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !Self::is_target_holiday(date)
    }
}

/// Easter Sunday (Gregorian) via the anonymous Meeus/Jones/Butcher algorithm.
fn easter_sunday(year: i32) -> Date {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    // The algorithm always yields a day in March or April.
    Date::from(
        chrono::NaiveDate::from_ymd_opt(year, month as u32, day as u32)
            .unwrap_or(chrono::NaiveDate::MIN),
    )
}
