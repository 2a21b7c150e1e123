use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income categories subject to withholding at source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeCategory {
    /// Salary income. Withheld through payroll under the graduated schedule,
    /// so the flat-rate table carries it at zero for residents.
    Compensation,
    ProfessionalFees,
    Rent,
    Dividends,
    Interest,
    Royalties,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compensation => "compensation",
            Self::ProfessionalFees => "professional_fees",
            Self::Rent => "rent",
            Self::Dividends => "dividends",
            Self::Interest => "interest",
            Self::Royalties => "royalties",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compensation" => Some(Self::Compensation),
            "professional_fees" => Some(Self::ProfessionalFees),
            "rent" => Some(Self::Rent),
            "dividends" => Some(Self::Dividends),
            "interest" => Some(Self::Interest),
            "royalties" => Some(Self::Royalties),
            _ => None,
        }
    }
}

/// Inputs for a flat-rate withholding computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingTaxInput {
    pub tax_year: i32,
    pub amount: Decimal,
    pub category: IncomeCategory,
    pub is_resident: bool,
}
