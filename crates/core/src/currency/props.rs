//! Property-based tests for rate parsing and cross-rates.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::exchange::cross_rate;
use super::parser::parse_decimal;
use super::types::Currency;

/// Strategy to generate positive selling rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn quote(code: &str, selling: Decimal) -> Currency {
    let mut currency = Currency::base(code, code, Utc::now());
    currency.forex_selling = selling;
    currency
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A currency converted to itself is always exactly 1.
    #[test]
    fn prop_same_currency_rate_is_one(selling in positive_rate()) {
        let currency = quote("USD", selling);
        prop_assert_eq!(cross_rate(&currency, &currency).unwrap(), Decimal::ONE);
    }

    /// Going there and back within one rate set multiplies to 1.
    #[test]
    fn prop_reciprocal_rates_multiply_to_one(a in positive_rate(), b in positive_rate()) {
        let from = quote("AAA", a);
        let to = quote("BBB", b);

        let product = cross_rate(&from, &to).unwrap() * cross_rate(&to, &from).unwrap();
        prop_assert!(
            (product - Decimal::ONE).abs() < Decimal::new(1, 12),
            "product {} too far from 1", product
        );
    }

    /// Rates from the base currency equal the target's selling rate.
    #[test]
    fn prop_rate_from_base_is_target_selling(selling in positive_rate()) {
        let base = quote("TRY", Decimal::ONE);
        let target = quote("USD", selling);
        prop_assert_eq!(cross_rate(&base, &target).unwrap(), selling);
    }

    /// Arbitrary field text never panics and never yields a negative rate.
    #[test]
    fn prop_parse_decimal_total(raw in ".{0,40}") {
        let value = parse_decimal(Some(&raw));
        prop_assert!(!value.is_sign_negative());
    }

    /// Well-formed rate text parses back to the same value.
    #[test]
    fn prop_parse_decimal_reads_plain_rates(rate in positive_rate()) {
        prop_assert_eq!(parse_decimal(Some(&rate.to_string())), rate);
    }
}
