use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_bracket::BracketSlice;

/// Which deduction regime an individual filer elected. The two regimes are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionType {
    Standard,
    Itemized,
}

impl DeductionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Itemized => "itemized",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Self::Standard),
            "itemized" => Some(Self::Itemized),
            _ => None,
        }
    }
}

/// Inputs for an annual individual income tax computation.
///
/// All monetary fields must be non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualTaxInput {
    pub tax_year: i32,

    /// Basic salary for the year, before the 13th month and other benefits.
    pub annual_income: Decimal,

    pub thirteenth_month_pay: Decimal,

    /// De minimis and other benefits outside the 13th month pay.
    pub other_benefits: Decimal,

    pub deduction_type: DeductionType,

    /// Consulted only when `deduction_type` is [`DeductionType::Itemized`].
    /// A missing amount is treated as an itemized deduction of zero.
    pub itemized_deduction: Option<Decimal>,

    /// Tax already withheld from compensation during the year.
    pub withholding_paid: Decimal,
}

/// Result of an annual individual income tax computation.
///
/// `amount_payable` and `refund` are mutually exclusive; at most one of them
/// is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualTaxResult {
    pub gross_income: Decimal,
    pub exempt_income: Decimal,
    pub taxable_income: Decimal,
    pub tax_due: Decimal,
    pub withholding_paid: Decimal,
    pub amount_payable: Decimal,
    pub refund: Decimal,
    /// Tax due over gross income, as a percentage (zero when gross is zero).
    pub effective_rate_percent: Decimal,
    pub marginal_rate_percent: Decimal,
    pub breakdown: Vec<BracketSlice>,
}
