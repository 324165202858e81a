//! Actual day count conventions.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/360 day count convention.
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{360}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(&end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed day count convention.
///
/// The year basis is always 365 days, including leap years. This is the
/// usual time measure for correlation and hazard rate term structures.
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365F"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(start.days_between(&end)) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ISDA day count convention.
///
/// The period is split into the portions falling in leap and non-leap years.
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap year}}{365} + \frac{\text{Days in leap year}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl ActActIsda {
    fn forward_fraction(start: Date, end: Date) -> Decimal {
        let mut total = Decimal::ZERO;
        let mut current = start;

        while current.year() < end.year() {
            let next_year = Date::from(start_of_year(current.year() + 1));
            total += Decimal::from(current.days_between(&next_year))
                / Decimal::from(days_in_year(current));
            current = next_year;
        }

        if current < end {
            total +=
                Decimal::from(current.days_between(&end)) / Decimal::from(days_in_year(current));
        }

        total
    }
}

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start == end {
            Decimal::ZERO
        } else if start < end {
            Self::forward_fraction(start, end)
        } else {
            -Self::forward_fraction(end, start)
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

fn days_in_year(date: Date) -> i64 {
    if date.is_leap_year() {
        366
    } else {
        365
    }
}

fn start_of_year(year: i32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_yo_opt(year, 1).unwrap_or(chrono::NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_act360_quarter() {
        let dc = Act360;
        let start = ymd(2025, 1, 1);
        let end = ymd(2025, 4, 1);

        assert_eq!(dc.day_count(start, end), 90);
        assert_eq!(dc.year_fraction(start, end), dec!(0.25));
    }

    #[test]
    fn test_act365f_leap_year() {
        let dc = Act365Fixed;
        let start = ymd(2024, 1, 1);
        let end = ymd(2025, 1, 1);

        assert_eq!(dc.day_count(start, end), 366);
        assert_eq!(dc.year_fraction(start, end), dec!(366) / dec!(365));
    }

    #[test]
    fn test_act365f_negative() {
        let dc = Act365Fixed;
        let yf = dc.year_fraction(ymd(2025, 1, 1), ymd(2024, 1, 1));
        assert!(yf < Decimal::ZERO);
    }

    #[test]
    fn test_actact_isda_spans_leap_year() {
        let dc = ActActIsda;
        let start = ymd(2023, 7, 1);
        let end = ymd(2024, 7, 1);

        // 184 days in 2023, 182 days in 2024
        let expected = dec!(184) / dec!(365) + dec!(182) / dec!(366);
        assert_eq!(dc.year_fraction(start, end), expected);
        assert_eq!(dc.year_fraction(end, start), -expected);
    }

    #[test]
    fn test_actact_isda_full_years() {
        let dc = ActActIsda;
        assert_eq!(dc.year_fraction(ymd(2024, 1, 1), ymd(2025, 1, 1)), Decimal::ONE);
        assert_eq!(dc.year_fraction(ymd(2025, 1, 1), ymd(2027, 1, 1)), dec!(2));
    }
}
