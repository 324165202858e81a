//! Property tests for the base correlation surface.
//!
//! Random tenor grids, loss grids and start dates are checked against the
//! maturity generator, the tail column alignment and knot reproduction.

use std::collections::BTreeSet;
use std::sync::Arc;

use basecorr_core::prelude::*;
use basecorr_credit::prelude::*;
use proptest::prelude::*;

fn reference() -> Date {
    Date::from_ymd(2024, 1, 15).unwrap()
}

fn quote_value(row: usize, column: usize) -> f64 {
    0.10 + 0.05 * row as f64 + 0.01 * column as f64
}

fn quote_table(rows: usize, columns: usize) -> Vec<Vec<Arc<dyn Quote>>> {
    (0..rows)
        .map(|i| {
            (0..columns)
                .map(|j| SimpleQuote::shared(quote_value(i, j)) as Arc<dyn Quote>)
                .collect()
        })
        .collect()
}

fn tenors(months: &BTreeSet<i32>) -> Vec<Period> {
    months.iter().map(|m| Period::months(*m)).collect()
}

fn losses(points: &BTreeSet<u32>) -> Vec<f64> {
    points.iter().map(|p| f64::from(*p) / 100.0).collect()
}

proptest! {
    #[test]
    fn prop_columns_align_to_tail(
        months in prop::collection::btree_set(1i32..=120, 2..7),
        points in prop::collection::btree_set(1u32..=100, 2..5),
        days_back in 0i64..720,
    ) {
        let tenors = tenors(&months);
        let losses = losses(&points);
        let start = reference().add_days(-days_back);
        let calendar: Arc<dyn Calendar> = Arc::new(WeekendCalendar);

        let grid = MaturityGrid::generate(
            start, &tenors, None, &calendar, BusinessDayConvention::Following, reference(),
        );
        prop_assume!(grid.is_ok());
        let grid = grid.unwrap();

        let surface = BaseCorrelationTermStructure::builder()
            .with_tenors(tenors.clone())
            .with_loss_levels(losses.clone())
            .with_quotes(quote_table(losses.len(), tenors.len()))
            .with_reference_date(reference())
            .with_start_date(start)
            .build()
            .unwrap();

        let expired = tenors.len() - surface.tranche_dates().len();
        prop_assert_eq!(surface.column_alignment().offset(), expired);
        prop_assert_eq!(surface.tenors(), &tenors[expired..]);
        prop_assert_eq!(surface.tranche_dates(), grid.dates());
        prop_assert!(surface.tranche_dates().iter().all(|d| *d > reference()));

        let correlations = surface.correlations().unwrap();
        for i in 0..losses.len() {
            for j in 0..surface.tranche_dates().len() {
                prop_assert_eq!(correlations[[i, j]], quote_value(i, expired + j));
            }
        }
    }

    #[test]
    fn prop_max_date_is_last_maturity(
        months in prop::collection::btree_set(1i32..=120, 2..7),
    ) {
        let tenors = tenors(&months);
        let surface = BaseCorrelationTermStructure::builder()
            .with_tenors(tenors.clone())
            .with_loss_levels(vec![0.03, 0.07])
            .with_quotes(quote_table(2, tenors.len()))
            .with_reference_date(reference())
            .build()
            .unwrap();

        let last = tenors[tenors.len() - 1];
        let expected = surface
            .calendar()
            .advance(reference(), last, BusinessDayConvention::Following)
            .unwrap();
        prop_assert_eq!(surface.max_date(), expected);
    }

    #[test]
    fn prop_knots_are_reproduced(
        months in prop::collection::btree_set(1i32..=120, 2..6),
        points in prop::collection::btree_set(1u32..=100, 2..5),
    ) {
        let tenors = tenors(&months);
        let losses = losses(&points);
        let surface = BaseCorrelationTermStructure::builder()
            .with_tenors(tenors.clone())
            .with_loss_levels(losses.clone())
            .with_quotes(quote_table(losses.len(), tenors.len()))
            .with_reference_date(reference())
            .build()
            .unwrap();

        let times = surface.tranche_times().unwrap();
        for (i, loss) in losses.iter().enumerate() {
            for (j, t) in times.iter().enumerate() {
                let value = surface.correlation_at_time(*t, *loss, false).unwrap();
                prop_assert!((value - quote_value(i, j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn prop_out_of_grid_requires_extrapolation(
        dt in 0.01f64..5.0,
        loss in 0.0f64..1.0,
    ) {
        let tenors = vec![Period::months(6), Period::years(1), Period::years(2)];
        let surface = BaseCorrelationTermStructure::builder()
            .with_tenors(tenors)
            .with_loss_levels(vec![0.03, 0.07, 0.10])
            .with_quotes(quote_table(3, 3))
            .with_reference_date(reference())
            .build()
            .unwrap();

        let t = surface.max_time().unwrap() + dt;
        let denied = surface.correlation_at_time(t, loss, false);
        let is_extrapolation_error = matches!(denied, Err(CorrelationError::ExtrapolationNotAllowed { .. }));
        prop_assert!(is_extrapolation_error);
        prop_assert!(surface.correlation_at_time(t, loss, true).unwrap().is_finite());
    }
}
