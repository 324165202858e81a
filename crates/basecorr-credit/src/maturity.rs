//! Tranche maturity dates.
//!
//! Converts the tenor grid into concrete maturity dates, either by a plain
//! calendar advance or through a quarterly schedule under a date generation
//! rule. Tenors maturing on or before the reference date are expired and
//! dropped from the front of the grid.

use std::fmt;
use std::sync::Arc;

use basecorr_core::calendars::{BusinessDayConvention, Calendar};
use basecorr_core::schedule::{cds_maturity, DateGenerationRule, Schedule};
use basecorr_core::types::{Date, Frequency, Period};

use crate::error::{CorrelationError, CorrelationResult};

/// Adjusted maturity of a tranche starting on `start` with the given tenor.
///
/// Without a rule the maturity is `calendar.advance(start, tenor, bdc)`.
/// With a rule, a quarterly schedule is generated from `start` to the
/// unadjusted end (the CDS standard maturity for the CDS rules, `start +
/// tenor` otherwise) and its last date is adjusted with `bdc`.
///
/// # Errors
///
/// Returns `CorrelationError::InvalidInput` if a CDS rule yields no maturity
/// for the tenor. Calendar and schedule errors are propagated.
pub fn maturity_date(
    start: Date,
    tenor: Period,
    rule: Option<DateGenerationRule>,
    calendar: &Arc<dyn Calendar>,
    convention: BusinessDayConvention,
) -> CorrelationResult<Date> {
    let Some(rule) = rule else {
        return Ok(calendar.advance(start, tenor, convention)?);
    };

    let end = if rule.is_cds() {
        cds_maturity(start, tenor, rule)?.ok_or_else(|| {
            CorrelationError::invalid_input(format!(
                "no {rule} maturity for tenor {tenor} starting {start}"
            ))
        })?
    } else {
        start.add_period(tenor)?
    };

    let schedule = Schedule::builder(start, end)
        .with_frequency(Frequency::Quarterly)
        .with_calendar(Arc::clone(calendar))
        .with_convention(convention)
        .with_termination_convention(BusinessDayConvention::Unadjusted)
        .with_rule(rule)
        .build()?;

    let last = schedule
        .end_date()
        .ok_or_else(|| CorrelationError::invalid_input("empty maturity schedule"))?;

    Ok(calendar.adjust(last, convention)?)
}

/// The live part of a tenor grid and its maturity dates.
#[derive(Debug, Clone, PartialEq)]
pub struct MaturityGrid {
    dates: Vec<Date>,
    tenors: Vec<Period>,
    expired_count: usize,
}

impl MaturityGrid {
    /// Generates the maturity of every tenor and drops the expired ones.
    ///
    /// # Errors
    ///
    /// Returns `CorrelationError::InvalidInput` if every tenor has expired or
    /// the live maturities are not a strictly increasing suffix of the grid.
    /// Date generation errors are propagated.
    pub fn generate(
        start: Date,
        tenors: &[Period],
        rule: Option<DateGenerationRule>,
        calendar: &Arc<dyn Calendar>,
        convention: BusinessDayConvention,
        reference_date: Date,
    ) -> CorrelationResult<Self> {
        let maturities = tenors
            .iter()
            .map(|tenor| maturity_date(start, *tenor, rule, calendar, convention))
            .collect::<CorrelationResult<Vec<_>>>()?;

        Self::from_maturities(tenors, maturities, reference_date)
    }

    /// Builds the grid from precomputed maturities, one per tenor.
    ///
    /// # Errors
    ///
    /// As for [`MaturityGrid::generate`], and if the lengths differ.
    pub fn from_maturities(
        tenors: &[Period],
        maturities: Vec<Date>,
        reference_date: Date,
    ) -> CorrelationResult<Self> {
        if tenors.len() != maturities.len() {
            return Err(CorrelationError::invalid_input(format!(
                "{} maturities given for {} tenors",
                maturities.len(),
                tenors.len()
            )));
        }

        let expired_count = maturities.iter().take_while(|d| **d <= reference_date).count();
        if expired_count == maturities.len() {
            return Err(CorrelationError::invalid_input(format!(
                "no tranche dates left after removing expired tenors (reference date {reference_date})"
            )));
        }

        let dates = maturities[expired_count..].to_vec();
        if let Some(k) = dates.iter().position(|d| *d <= reference_date) {
            let i = expired_count + k;
            return Err(CorrelationError::invalid_input(format!(
                "tenor {} matures on {} on or before reference date {reference_date} after a live tenor",
                tenors[i], maturities[i]
            )));
        }
        if let Some(k) = dates.windows(2).position(|w| w[1] <= w[0]) {
            let i = expired_count + k;
            return Err(CorrelationError::invalid_input(format!(
                "non increasing tranche dates: {} matures {}, {} matures {}",
                tenors[i],
                maturities[i],
                tenors[i + 1],
                maturities[i + 1]
            )));
        }

        Ok(Self {
            dates,
            tenors: tenors[expired_count..].to_vec(),
            expired_count,
        })
    }

    /// Live maturity dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Live tenors, aligned with [`MaturityGrid::dates`].
    #[must_use]
    pub fn tenors(&self) -> &[Period] {
        &self.tenors
    }

    /// Number of leading tenors dropped as expired.
    #[must_use]
    pub fn expired_count(&self) -> usize {
        self.expired_count
    }

    /// Number of live tenors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false: the grid holds at least one live tenor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of tenors before truncation.
    #[must_use]
    pub fn original_len(&self) -> usize {
        self.expired_count + self.dates.len()
    }

    /// Last maturity date.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}

impl fmt::Display for MaturityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .tenors
            .iter()
            .zip(&self.dates)
            .map(|(t, d)| format!("{t}:{d}"))
            .collect();
        write!(f, "[{}] ({} expired)", cells.join(", "), self.expired_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecorr_core::calendars::WeekendCalendar;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn weekend() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    const FOLLOWING: BusinessDayConvention = BusinessDayConvention::Following;

    fn tenors() -> Vec<Period> {
        vec![Period::months(3), Period::months(6), Period::years(1)]
    }

    #[test]
    fn test_calendar_advance() {
        let cal = weekend();
        let start = ymd(2024, 1, 15);

        assert_eq!(maturity_date(start, Period::months(3), None, &cal, FOLLOWING).unwrap(), ymd(2024, 4, 15));
        assert_eq!(maturity_date(start, Period::years(1), None, &cal, FOLLOWING).unwrap(), ymd(2025, 1, 15));
        // 2024-09-01 is a Sunday
        assert_eq!(
            maturity_date(ymd(2023, 9, 1), Period::years(1), None, &cal, FOLLOWING).unwrap(),
            ymd(2024, 9, 2)
        );
    }

    #[test]
    fn test_schedule_rule_adjusts_last_date() {
        let cal = weekend();
        let rule = Some(DateGenerationRule::Backward);
        assert_eq!(
            maturity_date(ymd(2023, 9, 1), Period::years(1), rule, &cal, FOLLOWING).unwrap(),
            ymd(2024, 9, 2)
        );
    }

    #[test]
    fn test_cds_rules() {
        let cal = weekend();
        let start = ymd(2024, 1, 15);

        assert_eq!(
            maturity_date(start, Period::years(5), Some(DateGenerationRule::CDS2015), &cal, FOLLOWING).unwrap(),
            ymd(2028, 12, 20)
        );
        assert_eq!(
            maturity_date(start, Period::years(5), Some(DateGenerationRule::CDS), &cal, FOLLOWING).unwrap(),
            ymd(2029, 3, 20)
        );
    }

    #[test]
    fn test_old_cds_rule() {
        let cal = weekend();
        let rule = Some(DateGenerationRule::OldCDS);

        assert_eq!(
            maturity_date(ymd(2024, 1, 15), Period::years(5), rule, &cal, FOLLOWING).unwrap(),
            ymd(2029, 3, 20)
        );
        // 19 days to the March roll: the first coupon date moves to June
        assert_eq!(
            maturity_date(ymd(2024, 3, 1), Period::years(5), rule, &cal, FOLLOWING).unwrap(),
            ymd(2029, 3, 20)
        );
        assert_eq!(
            maturity_date(ymd(2024, 3, 25), Period::years(5), rule, &cal, FOLLOWING).unwrap(),
            ymd(2029, 6, 20)
        );
        // 2027-03-20 is a Saturday
        assert_eq!(
            maturity_date(ymd(2024, 1, 15), Period::years(3), rule, &cal, FOLLOWING).unwrap(),
            ymd(2027, 3, 22)
        );
    }

    #[test]
    fn test_old_cds_rejects_zero_tenor() {
        let err = maturity_date(
            ymd(2024, 1, 15),
            Period::months(0),
            Some(DateGenerationRule::OldCDS),
            &weekend(),
            FOLLOWING,
        )
        .unwrap_err();
        assert!(matches!(err, CorrelationError::Core(_)));
    }

    #[test]
    fn test_cds2015_zero_tenor_has_no_maturity() {
        let err = maturity_date(
            ymd(2024, 1, 15),
            Period::months(0),
            Some(DateGenerationRule::CDS2015),
            &weekend(),
            FOLLOWING,
        )
        .unwrap_err();
        assert!(matches!(err, CorrelationError::InvalidInput { .. }));
    }

    #[test]
    fn test_cds_rule_rejects_odd_tenor() {
        let err = maturity_date(
            ymd(2024, 1, 15),
            Period::months(4),
            Some(DateGenerationRule::CDS),
            &weekend(),
            FOLLOWING,
        )
        .unwrap_err();
        assert!(matches!(err, CorrelationError::Core(_)));
    }

    #[test]
    fn test_grid_without_expiry() {
        let reference = ymd(2024, 1, 15);
        let grid = MaturityGrid::generate(reference, &tenors(), None, &weekend(), FOLLOWING, reference).unwrap();

        assert_eq!(grid.dates(), &[ymd(2024, 4, 15), ymd(2024, 7, 15), ymd(2025, 1, 15)]);
        assert_eq!(grid.expired_count(), 0);
        assert_eq!(grid.max_date(), ymd(2025, 1, 15));
        assert_eq!(grid.original_len(), 3);
    }

    #[test]
    fn test_grid_drops_expired_front() {
        let grid = MaturityGrid::generate(
            ymd(2023, 9, 1),
            &tenors(),
            None,
            &weekend(),
            FOLLOWING,
            ymd(2024, 1, 15),
        )
        .unwrap();

        assert_eq!(grid.dates(), &[ymd(2024, 3, 1), ymd(2024, 9, 2)]);
        assert_eq!(grid.tenors(), &[Period::months(6), Period::years(1)]);
        assert_eq!(grid.expired_count(), 1);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_maturity_on_reference_date_is_expired() {
        let tenors = tenors();
        let dates = vec![ymd(2024, 1, 15), ymd(2024, 7, 15), ymd(2025, 1, 15)];
        let grid = MaturityGrid::from_maturities(&tenors, dates, ymd(2024, 1, 15)).unwrap();
        assert_eq!(grid.expired_count(), 1);
    }

    #[test]
    fn test_all_expired() {
        let err = MaturityGrid::generate(
            ymd(2020, 1, 15),
            &tenors(),
            None,
            &weekend(),
            FOLLOWING,
            ymd(2024, 1, 15),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no tranche dates left"));
    }

    #[test]
    fn test_expired_after_live_is_rejected() {
        let dates = vec![ymd(2024, 4, 15), ymd(2024, 1, 10), ymd(2025, 1, 15)];
        let err = MaturityGrid::from_maturities(&tenors(), dates, ymd(2024, 1, 15)).unwrap_err();
        assert!(err.to_string().contains("after a live tenor"));
    }

    #[test]
    fn test_non_increasing_dates_are_rejected() {
        let dates = vec![ymd(2024, 4, 15), ymd(2024, 4, 15), ymd(2025, 1, 15)];
        let err = MaturityGrid::from_maturities(&tenors(), dates, ymd(2024, 1, 15)).unwrap_err();
        assert!(err.to_string().contains("non increasing tranche dates"));
    }

    #[test]
    fn test_display() {
        let dates = vec![ymd(2024, 1, 10), ymd(2024, 7, 15), ymd(2025, 1, 15)];
        let grid = MaturityGrid::from_maturities(&tenors(), dates, ymd(2024, 1, 15)).unwrap();
        assert_eq!(grid.to_string(), "[6M:2024-07-15, 1Y:2025-01-15] (1 expired)");
    }
}
