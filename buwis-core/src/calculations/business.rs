//! Business income tax option comparison.
//!
//! Self-employed filers can pay either a flat percentage of gross receipts
//! or graduated bracket tax on net income. This engine computes both and
//! recommends the cheaper one. The flat option is always a percentage of
//! gross receipts; deductions never reduce it. When the optional standard
//! deduction is taken, a fixed percentage of gross receipts replaces the
//! actual deductions for the graduated option.
//!
//! Equal totals recommend the flat option: it comes with lighter
//! bookkeeping obligations, so it wins ties.

use rust_decimal::Decimal;

use crate::calculations::ValidationError;
use crate::calculations::bracket::BracketTaxCalculator;
use crate::calculations::common::{ensure_non_negative, max, round_half_up};
use crate::models::{BusinessTaxInput, BusinessTaxResult, TaxBracket, TaxOption};

/// Flat tax rate on gross receipts.
pub const FLAT_RATE: Decimal = rust_decimal_macros::dec!(0.08);

/// Optional standard deduction, as a fraction of gross receipts.
pub const OSD_RATE: Decimal = rust_decimal_macros::dec!(0.40);

/// Flat-versus-graduated comparison over a bracket schedule.
#[derive(Debug, Clone)]
pub struct BusinessTaxEngine<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BusinessTaxEngine<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Computes both statutory options and the recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for negative monetary inputs or an empty
    /// bracket schedule.
    pub fn calculate(
        &self,
        input: &BusinessTaxInput,
    ) -> Result<BusinessTaxResult, ValidationError> {
        ensure_non_negative("gross_receipts", input.gross_receipts)?;
        ensure_non_negative("total_deductions", input.total_deductions)?;

        let eight_percent_tax = round_half_up(input.gross_receipts * FLAT_RATE);

        let net_income = max(
            round_half_up(input.gross_receipts - input.total_deductions),
            Decimal::ZERO,
        );
        let graduated_taxable_income = if input.use_optional_standard_deduction {
            round_half_up(input.gross_receipts - input.gross_receipts * OSD_RATE)
        } else {
            net_income
        };

        let graduated =
            BracketTaxCalculator::new(self.brackets).compute(graduated_taxable_income)?;

        let recommended_option = if graduated.total_tax < eight_percent_tax {
            TaxOption::Graduated
        } else {
            TaxOption::FlatEightPercent
        };

        Ok(BusinessTaxResult {
            eight_percent_tax,
            graduated_tax: graduated.total_tax,
            recommended_option,
            net_income,
            graduated_taxable_income,
            graduated_breakdown: graduated.breakdown,
        })
    }
}
