//! Grid validation.
//!
//! Pure checks run at construction, before any quote is read.

use std::cmp::Ordering;

use basecorr_core::types::Period;

use crate::error::{CorrelationError, CorrelationResult};

/// English ordinal of a 1-based position: `1st`, `2nd`, `3rd`, `11th`, `22nd`.
#[must_use]
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Checks that tenors are non-empty, start strictly positive and are
/// strictly increasing.
///
/// # Errors
///
/// Returns `CorrelationError::InvalidInput` naming the offending positions
/// and values.
pub fn check_tenors(tenors: &[Period]) -> CorrelationResult<()> {
    let first = tenors
        .first()
        .ok_or_else(|| CorrelationError::invalid_input("no tranche tenors given"))?;

    if !first.is_positive() {
        return Err(CorrelationError::invalid_input(format!(
            "first tranche tenor is not positive ({first})"
        )));
    }

    for (i, pair) in tenors.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        match next.partial_cmp(&prev) {
            Some(Ordering::Greater) => {}
            Some(_) => {
                return Err(CorrelationError::invalid_input(format!(
                    "non increasing tranche tenor: {} is {prev}, {} is {next}",
                    ordinal(i + 1),
                    ordinal(i + 2)
                )));
            }
            None => {
                return Err(CorrelationError::invalid_input(format!(
                    "undecidable tranche tenor order: {} is {prev}, {} is {next}",
                    ordinal(i + 1),
                    ordinal(i + 2)
                )));
            }
        }
    }

    Ok(())
}

/// Checks that loss levels are non-empty fractions in (0, 1] and strictly
/// increasing.
///
/// # Errors
///
/// Returns `CorrelationError::InvalidInput` naming the offending positions
/// and values.
pub fn check_loss_levels(levels: &[f64]) -> CorrelationResult<()> {
    let first = *levels
        .first()
        .ok_or_else(|| CorrelationError::invalid_input("no loss levels given"))?;

    if let Some(i) = levels.iter().position(|l| l.is_nan()) {
        return Err(CorrelationError::invalid_input(format!(
            "{} loss level is not a number",
            ordinal(i + 1)
        )));
    }

    if first <= 0.0 {
        return Err(CorrelationError::invalid_input(format!(
            "first loss level is not positive ({first})"
        )));
    }
    if first > 1.0 {
        return Err(CorrelationError::invalid_input(format!(
            "first loss level larger than 100% ({first})"
        )));
    }

    for (i, pair) in levels.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        if next <= prev {
            return Err(CorrelationError::invalid_input(format!(
                "non increasing losses: {} is {prev}, {} is {next}",
                ordinal(i + 1),
                ordinal(i + 2)
            )));
        }
        if next > 1.0 {
            return Err(CorrelationError::invalid_input(format!(
                "{} loss level larger than 100% ({next})",
                ordinal(i + 2)
            )));
        }
    }

    Ok(())
}

/// Checks a correlation matrix shape against the grid.
///
/// # Errors
///
/// Returns `CorrelationError::InvalidInput` on any mismatch.
pub fn check_dimensions(
    rows: usize,
    columns: usize,
    loss_count: usize,
    tenor_count: usize,
) -> CorrelationResult<()> {
    if rows != loss_count {
        return Err(CorrelationError::invalid_input(format!(
            "mismatch between number of loss levels ({loss_count}) and number of rows ({rows}) in the correlation matrix"
        )));
    }
    if columns != tenor_count {
        return Err(CorrelationError::invalid_input(format!(
            "mismatch between number of tranche tenors ({tenor_count}) and number of columns ({columns}) in the correlation matrix"
        )));
    }
    Ok(())
}
