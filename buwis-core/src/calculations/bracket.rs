//! Graduated bracket tax kernel.
//!
//! This is the shared core used by the individual and business engines: walk
//! an ordered rate schedule, tax the slice of income falling inside each
//! bracket at that bracket's marginal rate, and report the per-bracket
//! breakdown alongside the total.
//!
//! The total is the sum of the per-bracket slices and nothing else. A
//! bracket's `base_tax` is the published cumulative tax below its floor; the
//! kernel never adds it on top of the summed slices, because the slices
//! below the floor already account for it. The two views agree on any
//! well-formed schedule, which the tests pin down.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use buwis_core::calculations::BracketTaxCalculator;
//! use buwis_core::store::defaults::default_brackets;
//!
//! let brackets = default_brackets();
//! let tax = BracketTaxCalculator::new(&brackets)
//!     .compute(dec!(500000))
//!     .unwrap();
//!
//! // 0 on the first 250k, 20% on the next 150k, 25% on the last 100k.
//! assert_eq!(tax.total_tax, dec!(55000));
//! assert_eq!(tax.marginal_rate_percent, dec!(25));
//! assert_eq!(tax.breakdown.len(), 3);
//! ```

use rust_decimal::Decimal;

use crate::calculations::ValidationError;
use crate::calculations::common::round_half_up;
use crate::models::{BracketSlice, BracketTax, TaxBracket};

/// Computes graduated tax over an ordered bracket schedule.
///
/// Brackets must be sorted by `min_income` in ascending order and cover all
/// income ranges (the last bracket has `max_income` as `None`), which is what
/// [`crate::store::BracketRepository`] returns.
#[derive(Debug, Clone)]
pub struct BracketTaxCalculator<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketTaxCalculator<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Runs `taxable_income` through the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeAmount`] for negative income and
    /// [`ValidationError::NoBrackets`] when the schedule is empty.
    pub fn compute(
        &self,
        taxable_income: Decimal,
    ) -> Result<BracketTax, ValidationError> {
        if taxable_income < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount {
                field: "taxable_income",
                value: taxable_income,
            });
        }
        if self.brackets.is_empty() {
            return Err(ValidationError::NoBrackets);
        }

        let mut total_tax = Decimal::ZERO;
        let mut marginal_rate_percent = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for bracket in self.brackets {
            if taxable_income <= bracket.min_income {
                break;
            }

            let upper = bracket
                .max_income
                .unwrap_or(taxable_income)
                .min(taxable_income);
            let slice = upper - bracket.min_income;
            if slice <= Decimal::ZERO {
                continue;
            }

            let tax_amount = round_half_up(slice * bracket.rate);
            total_tax += tax_amount;
            marginal_rate_percent = bracket.rate * Decimal::ONE_HUNDRED;
            breakdown.push(BracketSlice {
                bracket_order: bracket.bracket_order,
                min_income: bracket.min_income,
                max_income: bracket.max_income,
                taxable_amount: slice,
                rate_percent: bracket.rate * Decimal::ONE_HUNDRED,
                tax_amount,
            });
        }

        Ok(BracketTax {
            total_tax: round_half_up(total_tax),
            marginal_rate_percent,
            breakdown,
        })
    }
}
