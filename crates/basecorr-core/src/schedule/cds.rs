//! CDS roll dates.
//!
//! Standard CDS contracts roll on the 20th of March, June, September and
//! December. Since December 2015 the on-the-run maturity only moves
//! semi-annually, on the March and September rolls.

use super::DateGenerationRule;
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period, TimeUnit};

fn twentieth_of(date: Date) -> CoreResult<Date> {
    Date::from_ymd(date.year(), date.month(), 20)
}

/// The 20th of a month on or before `date`.
///
/// For the IMM-restricted rules the result is moved back to the previous
/// IMM month.
pub fn previous_twentieth(date: Date, rule: DateGenerationRule) -> CoreResult<Date> {
    let mut result = twentieth_of(date)?;
    if result > date {
        result = result.add_months(-1)?;
    }
    if rule.is_imm_twentieth() {
        let skip = result.month() % 3;
        if skip != 0 {
            result = result.add_months(-(skip as i32))?;
        }
    }
    Ok(result)
}

/// The 20th of a month on or after `date`.
///
/// For the IMM-restricted rules the result is moved forward to the next
/// IMM month.
pub fn next_twentieth(date: Date, rule: DateGenerationRule) -> CoreResult<Date> {
    let mut result = twentieth_of(date)?;
    if result < date {
        result = result.add_months(1)?;
    }
    if rule.is_imm_twentieth() {
        let month = result.month();
        if month % 3 != 0 {
            result = result.add_months((3 - month % 3) as i32)?;
        }
    }
    Ok(result)
}

/// Returns true if `tenor` can be rolled on CDS dates: whole years or a
/// multiple of 3 months.
#[must_use]
pub fn is_cds_tenor(tenor: Period) -> bool {
    match tenor.unit() {
        TimeUnit::Years => true,
        TimeUnit::Months => tenor.length() % 3 == 0,
        TimeUnit::Days | TimeUnit::Weeks => false,
    }
}

/// Standard maturity of a CDS traded on `trade_date` with the given tenor.
///
/// Returns `Ok(None)` when the contract has no maturity: a zero tenor under
/// [`DateGenerationRule::CDS2015`] traded between the December and March
/// rolls, or between the June and September rolls.
///
/// # Errors
///
/// Returns `CoreError::InvalidSchedule` if the rule is not a CDS rule, the
/// tenor is neither whole years nor a multiple of 3 months, the tenor is
/// `0M` under `OldCDS`, or the computed maturity is not after the trade date.
pub fn cds_maturity(
    trade_date: Date,
    tenor: Period,
    rule: DateGenerationRule,
) -> CoreResult<Option<Date>> {
    if !rule.is_cds() {
        return Err(CoreError::invalid_schedule(format!(
            "CDS maturity requires a CDS date generation rule, got {rule}"
        )));
    }

    if !is_cds_tenor(tenor) {
        return Err(CoreError::invalid_schedule(format!(
            "CDS maturity expects a tenor that is a multiple of 3 months, got {tenor}"
        )));
    }

    if rule == DateGenerationRule::OldCDS && tenor.length() == 0 {
        return Err(CoreError::invalid_schedule(
            "a tenor of 0M is not supported for OldCDS",
        ));
    }

    let mut anchor = previous_twentieth(trade_date, rule)?;
    if rule == DateGenerationRule::CDS2015 && matches!(anchor.month(), 6 | 12) {
        if tenor.length() == 0 {
            return Ok(None);
        }
        anchor = anchor.add_months(-3)?;
    }

    let maturity = anchor.add_period(tenor)?.add_months(3)?;
    if maturity <= trade_date {
        return Err(CoreError::invalid_schedule(format!(
            "CDS maturity {maturity} for tenor {tenor} is not after trade date {trade_date}"
        )));
    }

    log::trace!("cds maturity {tenor} from {trade_date} ({rule}): {maturity}");
    Ok(Some(maturity))
}
