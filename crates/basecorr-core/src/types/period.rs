//! Periods (tenors) such as `3M`, `5Y` or `2W`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Mul;
use std::str::FromStr;

use super::{Date, Frequency};
use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days
    Days,
    /// Weeks of seven days
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A length of time expressed in a single unit.
///
/// Equality and ordering are by duration, not by representation: `12M == 1Y`
/// and `14D == 2W`. Periods from different unit families (days/weeks versus
/// months/years) are ordered through day bounds, a month spanning 28 to 31
/// days and a year 365 to 366 days. When those bounds overlap the comparison
/// is undecidable and [`PartialOrd`] returns `None`.
///
/// # Example
///
/// ```rust
/// use basecorr_core::types::Period;
///
/// let tenor: Period = "6M".parse().unwrap();
/// assert!(tenor < Period::years(1));
/// assert_eq!(Period::months(12), Period::years(1));
/// assert_eq!(tenor.to_string(), "6M");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period from a length and unit.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// The period between two consecutive dates of a frequency.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPeriod` for `Frequency::Zero`, which has no
    /// regular period.
    pub fn from_frequency(frequency: Frequency) -> CoreResult<Self> {
        if frequency.is_zero() {
            return Err(CoreError::invalid_period(
                "zero-coupon frequency has no regular period",
            ));
        }
        Ok(Self::months(frequency.months_per_period() as i32))
    }

    /// Returns the length in units.
    #[must_use]
    pub const fn length(&self) -> i32 {
        self.length
    }

    /// Returns the unit.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns true if the period is longer than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.length > 0
    }

    /// Returns the period expressed in its family's smallest unit
    /// (days for days/weeks, months for months/years).
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self.unit {
            TimeUnit::Days | TimeUnit::Months => *self,
            TimeUnit::Weeks => Self::days(self.length * 7),
            TimeUnit::Years => Self::months(self.length * 12),
        }
    }

    /// Minimum and maximum number of calendar days the period can span.
    fn day_bounds(&self) -> (i64, i64) {
        let n = i64::from(self.length);
        let (lo, hi) = match self.unit {
            TimeUnit::Days => (n, n),
            TimeUnit::Weeks => (7 * n, 7 * n),
            TimeUnit::Months => (28 * n, 31 * n),
            TimeUnit::Years => (365 * n, 366 * n),
        };
        (lo.min(hi), lo.max(hi))
    }

    fn is_month_based(&self) -> bool {
        matches!(self.unit, TimeUnit::Months | TimeUnit::Years)
    }

    /// Compares two periods, failing when the order is undecidable.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPeriod` when the periods use different unit
    /// families with overlapping day bounds (e.g. `1M` and `30D`).
    pub fn try_cmp(&self, other: &Period) -> CoreResult<Ordering> {
        self.partial_cmp(other).ok_or_else(|| {
            CoreError::invalid_period(format!("undecidable comparison between {self} and {other}"))
        })
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Eq for Period {}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        if normalized.length == 0 {
            0i32.hash(state);
        } else {
            normalized.length.hash(state);
            normalized.unit.hash(state);
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        // A zero period compares by sign only, whatever the units.
        if self.length == 0 || other.length == 0 {
            return Some(self.length.signum().cmp(&other.length.signum()));
        }

        let (a, b) = (self.normalized(), other.normalized());
        if a.is_month_based() == b.is_month_based() {
            return Some(a.length.cmp(&b.length));
        }

        let (a_lo, a_hi) = self.day_bounds();
        let (b_lo, b_hi) = other.day_bounds();
        if a_hi < b_lo {
            Some(Ordering::Less)
        } else if a_lo > b_hi {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl Mul<i32> for Period {
    type Output = Period;

    fn mul(self, rhs: i32) -> Self::Output {
        Period::new(self.length * rhs, self.unit)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    /// Parses strings like `"3M"`, `"10Y"`, `"2w"` or `"-1D"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        if s.len() < 2 {
            return Err(CoreError::invalid_period(format!("cannot parse '{s}'")));
        }

        let (num_str, unit) = s.split_at(s.len() - 1);
        let length: i32 = num_str
            .parse()
            .map_err(|_| CoreError::invalid_period(format!("invalid length in '{s}'")))?;

        let unit = match unit {
            "D" => TimeUnit::Days,
            "W" => TimeUnit::Weeks,
            "M" => TimeUnit::Months,
            "Y" => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(format!(
                    "invalid unit '{other}' in '{s}'"
                )))
            }
        };
        Ok(Period::new(length, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl Date {
    /// Adds a period to the date without any business-day adjustment.
    ///
    /// Months and years clamp the day to the end of the target month.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_period(&self, period: Period) -> CoreResult<Date> {
        match period.unit() {
            TimeUnit::Days => Ok(self.add_days(i64::from(period.length()))),
            TimeUnit::Weeks => Ok(self.add_days(7 * i64::from(period.length()))),
            TimeUnit::Months => self.add_months(period.length()),
            TimeUnit::Years => self.add_years(period.length()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("3M".parse::<Period>().unwrap(), Period::months(3));
        assert_eq!(" 10y ".parse::<Period>().unwrap(), Period::years(10));
        assert_eq!("2W".parse::<Period>().unwrap().to_string(), "2W");
        assert!("M".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
        assert!("xY".parse::<Period>().is_err());
    }

    #[test]
    fn test_equality_by_duration() {
        assert_eq!(Period::months(12), Period::years(1));
        assert_eq!(Period::days(14), Period::weeks(2));
        assert_ne!(Period::months(3), Period::months(6));
        assert_eq!(Period::days(0), Period::months(0));
    }

    #[test]
    fn test_ordering_same_family() {
        assert!(Period::months(3) < Period::months(6));
        assert!(Period::months(18) > Period::years(1));
        assert!(Period::weeks(1) < Period::days(8));
    }

    #[test]
    fn test_ordering_across_families() {
        assert!(Period::days(20) < Period::months(1));
        assert!(Period::days(400) > Period::years(1));
        assert!(Period::days(30).partial_cmp(&Period::months(1)).is_none());
        assert!(Period::days(30).try_cmp(&Period::months(1)).is_err());
    }

    #[test]
    fn test_ordering_against_zero() {
        assert!(Period::months(3) > Period::days(0));
        assert!(Period::days(-1) < Period::days(0));
        assert!(!Period::days(0).is_positive());
    }

    #[test]
    fn test_add_period() {
        let d = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(d.add_period(Period::months(1)).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(d.add_period(Period::weeks(1)).unwrap(), Date::from_ymd(2024, 2, 7).unwrap());
        assert_eq!(d.add_period(Period::years(1)).unwrap(), Date::from_ymd(2025, 1, 31).unwrap());
        assert_eq!(d.add_period(Period::days(-31)).unwrap(), Date::from_ymd(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_multiplication_and_frequency() {
        assert_eq!(Period::months(3) * 4, Period::years(1));
        assert_eq!(Period::from_frequency(Frequency::Quarterly).unwrap(), Period::months(3));
        assert!(Period::from_frequency(Frequency::Zero).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Period::years(5)).unwrap();
        assert_eq!(json, "\"5Y\"");
        let back: Period = serde_json::from_str("\"6M\"").unwrap();
        assert_eq!(back, Period::months(6));
    }
}
