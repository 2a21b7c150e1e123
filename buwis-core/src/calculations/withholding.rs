//! Flat-rate withholding at source.
//!
//! A fixed rate table keyed by income category and residency. No bracket
//! logic: the withheld amount is the payment times the rate. Compensation
//! carries a zero rate for residents because payroll already withholds it
//! under the graduated schedule; non-residents pay a uniform 25% across
//! every category.

use rust_decimal::Decimal;

use crate::calculations::ValidationError;
use crate::calculations::common::{ensure_non_negative, round_half_up};
use crate::models::{IncomeCategory, WithholdingTaxInput};

const NON_RESIDENT_RATE: Decimal = rust_decimal_macros::dec!(0.25);

/// The withholding rate for a category/residency pair, as a fraction.
pub fn withholding_rate(
    category: IncomeCategory,
    is_resident: bool,
) -> Decimal {
    if !is_resident {
        return NON_RESIDENT_RATE;
    }
    match category {
        IncomeCategory::Compensation => Decimal::ZERO,
        IncomeCategory::ProfessionalFees => Decimal::new(10, 2),
        IncomeCategory::Rent => Decimal::new(5, 2),
        IncomeCategory::Dividends => Decimal::new(10, 2),
        IncomeCategory::Interest => Decimal::new(20, 2),
        IncomeCategory::Royalties => Decimal::new(20, 2),
    }
}

/// The amount to withhold from a payment.
///
/// # Errors
///
/// Returns [`ValidationError::NegativeAmount`] for a negative payment.
pub fn compute_withholding(input: &WithholdingTaxInput) -> Result<Decimal, ValidationError> {
    ensure_non_negative("amount", input.amount)?;
    Ok(round_half_up(
        input.amount * withholding_rate(input.category, input.is_resident),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn input(
        category: IncomeCategory,
        is_resident: bool,
        amount: Decimal,
    ) -> WithholdingTaxInput {
        WithholdingTaxInput {
            tax_year: 2024,
            amount,
            category,
            is_resident,
        }
    }

    #[test]
    fn professional_fees_resident() {
        let withheld =
            compute_withholding(&input(IncomeCategory::ProfessionalFees, true, dec!(50000)))
                .unwrap();

        assert_eq!(withheld, dec!(5000));
    }

    #[test]
    fn professional_fees_non_resident() {
        let withheld =
            compute_withholding(&input(IncomeCategory::ProfessionalFees, false, dec!(50000)))
                .unwrap();

        assert_eq!(withheld, dec!(12500));
    }

    #[test]
    fn compensation_resident_is_not_withheld_here() {
        let withheld =
            compute_withholding(&input(IncomeCategory::Compensation, true, dec!(80000))).unwrap();

        assert_eq!(withheld, dec!(0));
    }

    #[test]
    fn compensation_non_resident_pays_the_uniform_rate() {
        let withheld =
            compute_withholding(&input(IncomeCategory::Compensation, false, dec!(80000))).unwrap();

        assert_eq!(withheld, dec!(20000));
    }

    #[test]
    fn resident_rate_table() {
        assert_eq!(withholding_rate(IncomeCategory::Compensation, true), dec!(0));
        assert_eq!(
            withholding_rate(IncomeCategory::ProfessionalFees, true),
            dec!(0.10)
        );
        assert_eq!(withholding_rate(IncomeCategory::Rent, true), dec!(0.05));
        assert_eq!(withholding_rate(IncomeCategory::Dividends, true), dec!(0.10));
        assert_eq!(withholding_rate(IncomeCategory::Interest, true), dec!(0.20));
        assert_eq!(withholding_rate(IncomeCategory::Royalties, true), dec!(0.20));
    }

    #[test]
    fn non_resident_rate_is_uniform() {
        for category in [
            IncomeCategory::Compensation,
            IncomeCategory::ProfessionalFees,
            IncomeCategory::Rent,
            IncomeCategory::Dividends,
            IncomeCategory::Interest,
            IncomeCategory::Royalties,
        ] {
            assert_eq!(withholding_rate(category, false), dec!(0.25));
        }
    }

    #[test]
    fn rejects_negative_amount() {
        let result = compute_withholding(&input(IncomeCategory::Rent, true, dec!(-1)));

        assert_eq!(
            result,
            Err(ValidationError::NegativeAmount {
                field: "amount",
                value: dec!(-1),
            })
        );
    }
}
