//! Schedule generation.
//!
//! A [`Schedule`] is the sequence of adjusted dates between an effective and
//! a termination date, stepped by a tenor under a [`DateGenerationRule`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use basecorr_core::calendars::{BusinessDayConvention, WeekendCalendar};
//! use basecorr_core::schedule::{DateGenerationRule, Schedule};
//! use basecorr_core::types::{Date, Frequency};
//!
//! let schedule = Schedule::builder(
//!     Date::from_ymd(2024, 1, 15).unwrap(),
//!     Date::from_ymd(2025, 1, 15).unwrap(),
//! )
//! .with_frequency(Frequency::Quarterly)
//! .with_calendar(Arc::new(WeekendCalendar))
//! .with_convention(BusinessDayConvention::Following)
//! .with_rule(DateGenerationRule::Backward)
//! .build()
//! .unwrap();
//!
//! assert_eq!(schedule.len(), 5);
//! ```

mod cds;
mod rule;

pub use cds::{cds_maturity, is_cds_tenor, next_twentieth, previous_twentieth};
pub use rule::DateGenerationRule;

use std::fmt;
use std::sync::Arc;

use crate::calendars::{BusinessDayConvention, Calendar, NullCalendar};
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency, Period, Weekday};

/// Minimum distance in calendar days between the effective date and the
/// first roll date under [`DateGenerationRule::OldCDS`].
const OLD_CDS_STUB_DAYS: i64 = 30;

/// A generated date schedule.
#[derive(Clone)]
pub struct Schedule {
    dates: Vec<Date>,
    is_regular: Vec<bool>,
    tenor: Period,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    termination_convention: BusinessDayConvention,
    rule: DateGenerationRule,
    end_of_month: bool,
}

impl Schedule {
    /// Starts building a schedule between two dates.
    #[must_use]
    pub fn builder(effective: Date, termination: Date) -> ScheduleBuilder {
        ScheduleBuilder::new(effective, termination)
    }

    /// All schedule dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the schedule has no dates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First date.
    #[must_use]
    pub fn start_date(&self) -> Option<Date> {
        self.dates.first().copied()
    }

    /// Last date.
    #[must_use]
    pub fn end_date(&self) -> Option<Date> {
        self.dates.last().copied()
    }

    /// Whether the period ending at `dates()[i]` is regular (`i >= 1`).
    #[must_use]
    pub fn is_regular(&self, i: usize) -> Option<bool> {
        i.checked_sub(1).and_then(|k| self.is_regular.get(k)).copied()
    }

    /// Iterates over consecutive `(start, end)` date pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// The tenor between regular dates.
    #[must_use]
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// The calendar used for adjustments.
    #[must_use]
    pub fn calendar(&self) -> &Arc<dyn Calendar> {
        &self.calendar
    }

    /// Convention applied to every date but the termination date.
    #[must_use]
    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Convention applied to the termination date.
    #[must_use]
    pub fn termination_convention(&self) -> BusinessDayConvention {
        self.termination_convention
    }

    /// The generation rule.
    #[must_use]
    pub fn rule(&self) -> DateGenerationRule {
        self.rule
    }

    /// Whether the end-of-month rule was applied.
    #[must_use]
    pub fn end_of_month(&self) -> bool {
        self.end_of_month
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("dates", &self.dates)
            .field("tenor", &self.tenor)
            .field("calendar", &self.calendar.name())
            .field("convention", &self.convention)
            .field("termination_convention", &self.termination_convention)
            .field("rule", &self.rule)
            .field("end_of_month", &self.end_of_month)
            .finish()
    }
}

/// Builder for [`Schedule`].
///
/// Defaults: quarterly tenor, null calendar, `Following` convention, the
/// termination date adjusted with the same convention, backward generation,
/// end-of-month off.
#[derive(Clone)]
pub struct ScheduleBuilder {
    effective: Date,
    termination: Date,
    tenor: Period,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    termination_convention: Option<BusinessDayConvention>,
    rule: DateGenerationRule,
    end_of_month: bool,
}

impl ScheduleBuilder {
    fn new(effective: Date, termination: Date) -> Self {
        Self {
            effective,
            termination,
            tenor: Period::months(3),
            calendar: Arc::new(NullCalendar),
            convention: BusinessDayConvention::Following,
            termination_convention: None,
            rule: DateGenerationRule::Backward,
            end_of_month: false,
        }
    }

    /// Sets the tenor between regular dates.
    #[must_use]
    pub fn with_tenor(mut self, tenor: Period) -> Self {
        self.tenor = tenor;
        self
    }

    /// Sets the tenor from a frequency. `Frequency::Zero` selects the zero rule.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.tenor = Period::from_frequency(frequency).unwrap_or(Period::years(0));
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the termination date convention.
    #[must_use]
    pub fn with_termination_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.termination_convention = Some(convention);
        self
    }

    /// Sets the date generation rule.
    #[must_use]
    pub fn with_rule(mut self, rule: DateGenerationRule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Generates the schedule.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSchedule` if the effective date is not
    /// before the termination date, the tenor is negative, the end-of-month
    /// rule is combined with a 20th or third-Wednesday rule, or generation
    /// degenerates to a single date. Calendar errors are propagated.
    pub fn build(self) -> CoreResult<Schedule> {
        let ScheduleBuilder {
            effective,
            termination,
            mut tenor,
            calendar,
            convention,
            termination_convention,
            mut rule,
            end_of_month,
        } = self;
        let termination_convention = termination_convention.unwrap_or(convention);

        if effective >= termination {
            return Err(CoreError::invalid_schedule(format!(
                "effective date {effective} must be before termination date {termination}"
            )));
        }
        if tenor.length() < 0 {
            return Err(CoreError::invalid_schedule(format!(
                "non-positive tenor {tenor}"
            )));
        }
        if tenor.length() == 0 {
            rule = DateGenerationRule::Zero;
        }
        if end_of_month
            && (rule.is_twentieth() || rule == DateGenerationRule::ThirdWednesday)
        {
            return Err(CoreError::invalid_schedule(format!(
                "end-of-month convention incompatible with {rule} date generation rule"
            )));
        }

        let adjust = |date: Date, bdc: BusinessDayConvention| calendar.adjust(date, bdc);
        let null = NullCalendar;

        let mut dates: Vec<Date> = Vec::new();
        let mut is_regular: Vec<bool> = Vec::new();
        let seed: Date;

        match rule {
            DateGenerationRule::Zero => {
                tenor = Period::years(0);
                seed = effective;
                dates.push(effective);
                dates.push(termination);
                is_regular.push(true);
            }

            DateGenerationRule::Backward => {
                dates.push(termination);
                seed = termination;
                let mut periods = 1;
                loop {
                    let temp = null.advance_with_eom(
                        seed,
                        tenor * -periods,
                        convention,
                        end_of_month,
                    )?;
                    if temp < effective {
                        break;
                    }
                    if adjust(last(&dates)?, convention)? != adjust(temp, convention)? {
                        dates.push(temp);
                        is_regular.push(true);
                    }
                    periods += 1;
                }
                if adjust(last(&dates)?, convention)? != adjust(effective, convention)? {
                    dates.push(effective);
                    is_regular.push(false);
                }
                dates.reverse();
                is_regular.reverse();
            }

            DateGenerationRule::Forward
            | DateGenerationRule::ThirdWednesday
            | DateGenerationRule::Twentieth
            | DateGenerationRule::TwentiethIMM
            | DateGenerationRule::OldCDS
            | DateGenerationRule::CDS
            | DateGenerationRule::CDS2015 => {
                let modern_cds =
                    matches!(rule, DateGenerationRule::CDS | DateGenerationRule::CDS2015);

                if modern_cds {
                    let prev20th = previous_twentieth(effective, rule)?;
                    if adjust(prev20th, convention)? > effective {
                        dates.push(prev20th.add_months(-3)?);
                        is_regular.push(true);
                    }
                    dates.push(prev20th);
                } else {
                    dates.push(effective);
                }
                let mut start = last(&dates)?;

                if rule.is_twentieth() {
                    let mut next20th = next_twentieth(effective, rule)?;
                    if rule == DateGenerationRule::OldCDS
                        && effective.days_between(&next20th) < OLD_CDS_STUB_DAYS
                    {
                        next20th = next_twentieth(next20th.add_days(1), rule)?;
                    }
                    if next20th != effective {
                        dates.push(next20th);
                        is_regular.push(modern_cds);
                        start = next20th;
                    }
                }
                seed = start;

                let mut periods = 1;
                loop {
                    let temp =
                        null.advance_with_eom(seed, tenor * periods, convention, end_of_month)?;
                    if temp > termination {
                        break;
                    }
                    if adjust(last(&dates)?, convention)? != adjust(temp, convention)? {
                        dates.push(temp);
                        is_regular.push(true);
                    }
                    periods += 1;
                }

                if adjust(last(&dates)?, termination_convention)?
                    != adjust(termination, termination_convention)?
                {
                    if rule.is_twentieth() {
                        dates.push(next_twentieth(termination, rule)?);
                        is_regular.push(true);
                    } else {
                        dates.push(termination);
                        is_regular.push(false);
                    }
                }
            }
        }

        let n = dates.len();

        if rule == DateGenerationRule::ThirdWednesday {
            for date in dates.iter_mut().take(n - 1).skip(1) {
                *date = Date::nth_weekday(3, Weekday::Wed, date.month(), date.year())?;
            }
        }

        if convention != BusinessDayConvention::Unadjusted && rule != DateGenerationRule::OldCDS {
            dates[0] = adjust(dates[0], convention)?;
        }

        if termination_convention != BusinessDayConvention::Unadjusted
            && !matches!(rule, DateGenerationRule::CDS | DateGenerationRule::CDS2015)
        {
            dates[n - 1] = adjust(dates[n - 1], termination_convention)?;
        }

        let month_end_seed = end_of_month && calendar.is_end_of_month(seed)?;
        for date in dates.iter_mut().take(n - 1).skip(1) {
            *date = if month_end_seed {
                adjust(calendar.end_of_month(*date)?, convention)?
            } else {
                adjust(*date, convention)?
            };
        }

        // Adjustment may collapse the last two or the first two dates.
        if dates.len() >= 2 && dates[dates.len() - 2] >= dates[dates.len() - 1] {
            let k = dates.len() - 2;
            if is_regular.len() >= 2 {
                let r = is_regular.len() - 2;
                is_regular[r] = dates[k] == dates[k + 1];
            }
            dates[k] = dates[k + 1];
            dates.pop();
            is_regular.pop();
        }
        if dates.len() >= 2 && dates[1] <= dates[0] {
            if is_regular.len() >= 2 {
                is_regular[1] = dates[1] == dates[0];
            }
            dates[1] = dates[0];
            dates.remove(0);
            is_regular.remove(0);
        }

        if dates.len() < 2 {
            return Err(CoreError::invalid_schedule(format!(
                "degenerate single date schedule from {effective} to {termination} ({rule})"
            )));
        }

        log::trace!(
            "generated {} schedule dates {effective} -> {termination} ({rule}, {tenor})",
            dates.len()
        );

        Ok(Schedule {
            dates,
            is_regular,
            tenor,
            calendar,
            convention,
            termination_convention,
            rule,
            end_of_month,
        })
    }
}

impl fmt::Debug for ScheduleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduleBuilder")
            .field("effective", &self.effective)
            .field("termination", &self.termination)
            .field("tenor", &self.tenor)
            .field("calendar", &self.calendar.name())
            .field("rule", &self.rule)
            .finish()
    }
}

fn last(dates: &[Date]) -> CoreResult<Date> {
    dates
        .last()
        .copied()
        .ok_or_else(|| CoreError::invalid_schedule("empty schedule"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    fn ymd(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn weekend() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    #[test]
    fn test_backward_quarterly() {
        let schedule = Schedule::builder(ymd(2024, 1, 15), ymd(2025, 1, 15))
            .with_calendar(weekend())
            .build()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[
                ymd(2024, 1, 15),
                ymd(2024, 4, 15),
                ymd(2024, 7, 15),
                ymd(2024, 10, 15),
                ymd(2025, 1, 15),
            ]
        );
        assert_eq!(schedule.periods().count(), 4);
    }

    #[test]
    fn test_backward_short_front_stub() {
        let schedule = Schedule::builder(ymd(2024, 2, 1), ymd(2024, 9, 16))
            .with_calendar(weekend())
            .build()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[ymd(2024, 2, 1), ymd(2024, 3, 18), ymd(2024, 6, 17), ymd(2024, 9, 16)]
        );
        assert_eq!(schedule.is_regular(1), Some(false));
        assert_eq!(schedule.is_regular(2), Some(true));
    }

    #[test]
    fn test_forward_generation() {
        let schedule = Schedule::builder(ymd(2024, 6, 3), ymd(2025, 3, 3))
            .with_calendar(weekend())
            .with_rule(DateGenerationRule::Forward)
            .build()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[ymd(2024, 6, 3), ymd(2024, 9, 3), ymd(2024, 12, 3), ymd(2025, 3, 3)]
        );
    }

    #[test]
    fn test_unadjusted_termination() {
        // 2024-09-01 is a Sunday
        let schedule = Schedule::builder(ymd(2024, 3, 1), ymd(2024, 9, 1))
            .with_calendar(weekend())
            .with_termination_convention(BusinessDayConvention::Unadjusted)
            .build()
            .unwrap();

        assert_eq!(schedule.end_date(), Some(ymd(2024, 9, 1)));
        assert_eq!(schedule.start_date(), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_zero_rule() {
        let schedule = Schedule::builder(ymd(2024, 1, 15), ymd(2029, 1, 15))
            .with_frequency(Frequency::Zero)
            .build()
            .unwrap();

        assert_eq!(schedule.dates(), &[ymd(2024, 1, 15), ymd(2029, 1, 15)]);
        assert_eq!(schedule.rule(), DateGenerationRule::Zero);
    }

    #[test]
    fn test_cds2015_schedule() {
        let schedule = Schedule::builder(ymd(2024, 1, 15), ymd(2028, 12, 20))
            .with_calendar(weekend())
            .with_termination_convention(BusinessDayConvention::Unadjusted)
            .with_rule(DateGenerationRule::CDS2015)
            .build()
            .unwrap();

        let dates = schedule.dates();
        assert_eq!(dates[0], ymd(2023, 12, 20));
        assert_eq!(dates[1], ymd(2024, 3, 20));
        assert_eq!(*dates.last().unwrap(), ymd(2028, 12, 20));
        // Dec 2023 through Dec 2028 quarterly
        assert_eq!(dates.len(), 21);
    }

    #[test]
    fn test_twentieth_rule_rolls_termination() {
        let schedule = Schedule::builder(ymd(2024, 1, 15), ymd(2024, 7, 15))
            .with_calendar(weekend())
            .with_termination_convention(BusinessDayConvention::Unadjusted)
            .with_rule(DateGenerationRule::TwentiethIMM)
            .build()
            .unwrap();

        assert_eq!(
            schedule.dates(),
            &[ymd(2024, 1, 15), ymd(2024, 3, 20), ymd(2024, 6, 20), ymd(2024, 9, 20)]
        );
    }

    #[test]
    fn test_old_cds_short_stub_skips_first_roll() {
        // Only 5 days to the March roll: first coupon moves to June
        let schedule = Schedule::builder(ymd(2024, 3, 15), ymd(2025, 3, 20))
            .with_calendar(weekend())
            .with_termination_convention(BusinessDayConvention::Unadjusted)
            .with_rule(DateGenerationRule::OldCDS)
            .build()
            .unwrap();

        assert_eq!(schedule.dates()[0], ymd(2024, 3, 15));
        assert_eq!(schedule.dates()[1], ymd(2024, 6, 20));
    }

    #[test]
    fn test_third_wednesday() {
        let schedule = Schedule::builder(ymd(2024, 1, 17), ymd(2024, 7, 17))
            .with_calendar(weekend())
            .with_rule(DateGenerationRule::ThirdWednesday)
            .build()
            .unwrap();

        assert_eq!(schedule.dates()[1], ymd(2024, 4, 17));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(Schedule::builder(ymd(2024, 1, 15), ymd(2024, 1, 15)).build().is_err());
        assert!(Schedule::builder(ymd(2024, 1, 15), ymd(2025, 1, 15))
            .with_tenor(Period::months(-3))
            .build()
            .is_err());
        assert!(Schedule::builder(ymd(2024, 1, 15), ymd(2025, 1, 15))
            .with_rule(DateGenerationRule::CDS)
            .with_end_of_month(true)
            .build()
            .is_err());
    }
}
