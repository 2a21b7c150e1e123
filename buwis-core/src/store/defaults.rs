//! Bundled fallback bracket table.
//!
//! When the bracket store cannot be reached, [`crate::store::BracketRepository`]
//! serves this table for the most recent known tax year instead of failing
//! the calculation. It must be kept in sync with the store's seed data when
//! a new year's schedule is published.

use rust_decimal::Decimal;

use crate::models::TaxBracket;

/// The most recent tax year the bundled table covers.
pub const DEFAULT_TAX_YEAR: i32 = 2024;

/// The bundled graduated schedule for [`DEFAULT_TAX_YEAR`].
pub fn default_brackets() -> Vec<TaxBracket> {
    vec![
        row(1, 0, Some(250_000), 0, 0),
        row(2, 250_000, Some(400_000), 0, 20),
        row(3, 400_000, Some(800_000), 30_000, 25),
        row(4, 800_000, Some(2_000_000), 130_000, 30),
        row(5, 2_000_000, Some(8_000_000), 490_000, 32),
        row(6, 8_000_000, None, 2_410_000, 35),
    ]
}

fn row(
    bracket_order: i32,
    min_income: i64,
    max_income: Option<i64>,
    base_tax: i64,
    rate_percent: i64,
) -> TaxBracket {
    TaxBracket {
        tax_year: DEFAULT_TAX_YEAR,
        bracket_order,
        min_income: Decimal::new(min_income, 0),
        max_income: max_income.map(|m| Decimal::new(m, 0)),
        base_tax: Decimal::new(base_tax, 0),
        rate: Decimal::new(rate_percent, 2),
        excess_over_threshold: Decimal::new(min_income, 0),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn table_is_contiguous_and_ordered() {
        let brackets = default_brackets();

        for pair in brackets.windows(2) {
            assert!(pair[0].bracket_order < pair[1].bracket_order);
            assert_eq!(pair[0].max_income, Some(pair[1].min_income));
            assert!(pair[0].rate <= pair[1].rate);
        }
    }

    #[test]
    fn exactly_one_open_ended_top_bracket() {
        let brackets = default_brackets();

        let open_ended = brackets.iter().filter(|b| b.max_income.is_none()).count();

        assert_eq!(open_ended, 1);
        assert!(brackets.last().unwrap().max_income.is_none());
    }

    #[test]
    fn excess_over_threshold_mirrors_min_income() {
        for bracket in default_brackets() {
            assert_eq!(bracket.excess_over_threshold, bracket.min_income);
        }
    }

    #[test]
    fn top_bracket_values() {
        let brackets = default_brackets();
        let top = brackets.last().unwrap();

        assert_eq!(top.min_income, dec!(8000000));
        assert_eq!(top.base_tax, dec!(2410000));
        assert_eq!(top.rate, dec!(0.35));
    }
}
