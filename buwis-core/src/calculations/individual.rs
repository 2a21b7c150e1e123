//! Annual individual income tax.
//!
//! Computes the year-end reconciliation for a compensation earner: exempt
//! the 13th month pay and other benefits up to the combined statutory
//! ceiling, apply the elected deduction regime, run the remainder through
//! the graduated schedule, and offset tax already withheld.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use buwis_core::calculations::IndividualTaxEngine;
//! use buwis_core::models::{DeductionType, IndividualTaxInput};
//! use buwis_core::store::defaults::default_brackets;
//!
//! let brackets = default_brackets();
//! let input = IndividualTaxInput {
//!     tax_year: 2024,
//!     annual_income: dec!(1000000),
//!     thirteenth_month_pay: dec!(100000),
//!     other_benefits: dec!(20000),
//!     deduction_type: DeductionType::Standard,
//!     itemized_deduction: None,
//!     withholding_paid: dec!(150000),
//! };
//!
//! let result = IndividualTaxEngine::new(&brackets).calculate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(940000));
//! assert_eq!(result.tax_due, dec!(172000));
//! assert_eq!(result.amount_payable, dec!(22000));
//! ```

use rust_decimal::Decimal;

use crate::calculations::ValidationError;
use crate::calculations::bracket::BracketTaxCalculator;
use crate::calculations::common::{ensure_non_negative, max, round_half_up};
use crate::models::{DeductionType, IndividualTaxInput, IndividualTaxResult, TaxBracket};

/// Combined annual ceiling on tax-exempt 13th month pay and other benefits.
/// One shared ceiling, not one per income kind.
pub const BENEFITS_EXEMPTION_CAP: Decimal = rust_decimal_macros::dec!(90000);

/// Flat deduction for filers who do not itemize.
pub const STANDARD_DEDUCTION: Decimal = rust_decimal_macros::dec!(90000);

/// Year-end individual income tax computation over a bracket schedule.
#[derive(Debug, Clone)]
pub struct IndividualTaxEngine<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> IndividualTaxEngine<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Calculates annual tax due, the settlement against withholding, and
    /// the effective and marginal rates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for any negative monetary input or an
    /// empty bracket schedule.
    pub fn calculate(
        &self,
        input: &IndividualTaxInput,
    ) -> Result<IndividualTaxResult, ValidationError> {
        ensure_non_negative("annual_income", input.annual_income)?;
        ensure_non_negative("thirteenth_month_pay", input.thirteenth_month_pay)?;
        ensure_non_negative("other_benefits", input.other_benefits)?;
        ensure_non_negative("withholding_paid", input.withholding_paid)?;
        if let Some(itemized) = input.itemized_deduction {
            ensure_non_negative("itemized_deduction", itemized)?;
        }

        let exempt_income =
            self.exempt_income(input.thirteenth_month_pay, input.other_benefits);
        let gross_income = round_half_up(
            input.annual_income + input.thirteenth_month_pay + input.other_benefits,
        );
        let deduction = self.deduction(input);
        let taxable_income = max(
            round_half_up(gross_income - exempt_income - deduction),
            Decimal::ZERO,
        );

        let tax = BracketTaxCalculator::new(self.brackets).compute(taxable_income)?;

        let amount_payable = max(
            round_half_up(tax.total_tax - input.withholding_paid),
            Decimal::ZERO,
        );
        let refund = max(
            round_half_up(input.withholding_paid - tax.total_tax),
            Decimal::ZERO,
        );
        let effective_rate_percent = if gross_income.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(tax.total_tax / gross_income * Decimal::ONE_HUNDRED)
        };

        Ok(IndividualTaxResult {
            gross_income,
            exempt_income,
            taxable_income,
            tax_due: tax.total_tax,
            withholding_paid: input.withholding_paid,
            amount_payable,
            refund,
            effective_rate_percent,
            marginal_rate_percent: tax.marginal_rate_percent,
            breakdown: tax.breakdown,
        })
    }

    /// Exempt portion of the 13th month pay and other benefits.
    ///
    /// The 13th month pay consumes the ceiling first; other benefits are
    /// exempt only up to whatever remains of it.
    fn exempt_income(
        &self,
        thirteenth_month_pay: Decimal,
        other_benefits: Decimal,
    ) -> Decimal {
        let from_thirteenth = thirteenth_month_pay.min(BENEFITS_EXEMPTION_CAP);
        let remaining_cap = BENEFITS_EXEMPTION_CAP - from_thirteenth;
        from_thirteenth + other_benefits.min(remaining_cap)
    }

    /// The deduction for the elected regime. An itemized election with no
    /// amount supplied is an itemized deduction of zero, not an error.
    fn deduction(
        &self,
        input: &IndividualTaxInput,
    ) -> Decimal {
        match input.deduction_type {
            DeductionType::Standard => STANDARD_DEDUCTION,
            DeductionType::Itemized => input.itemized_deduction.unwrap_or(Decimal::ZERO),
        }
    }
}
