//! Property tests for CDS roll date maturities.

use basecorr_core::prelude::*;
use proptest::prelude::*;

fn trade_date(offset: i64) -> Date {
    Date::from_ymd(2000, 1, 1).unwrap().add_days(offset)
}

proptest! {
    #[test]
    fn cds_maturities_fall_on_imm_twentieths(
        offset in 0i64..15_000,
        years in 1i32..=10,
    ) {
        let trade = trade_date(offset);
        let maturity = cds_maturity(trade, Period::years(years), DateGenerationRule::CDS)
            .unwrap()
            .unwrap();

        prop_assert_eq!(maturity.day(), 20);
        prop_assert_eq!(maturity.month() % 3, 0);
        prop_assert!(maturity > trade);
    }

    #[test]
    fn cds2015_maturities_roll_semi_annually(
        offset in 0i64..15_000,
        years in 1i32..=10,
    ) {
        let trade = trade_date(offset);
        let maturity = cds_maturity(trade, Period::years(years), DateGenerationRule::CDS2015)
            .unwrap()
            .unwrap();

        prop_assert_eq!(maturity.day(), 20);
        prop_assert!(matches!(maturity.month(), 6 | 12), "{}", maturity);
        prop_assert!(maturity > trade);
    }

    #[test]
    fn longer_tenors_mature_later(
        offset in 0i64..15_000,
        years in 1i32..=9,
    ) {
        let trade = trade_date(offset);
        let rule = DateGenerationRule::CDS2015;
        let short = cds_maturity(trade, Period::years(years), rule).unwrap().unwrap();
        let long = cds_maturity(trade, Period::years(years + 1), rule).unwrap().unwrap();

        prop_assert_eq!(long, short.add_months(12).unwrap());
    }
}
