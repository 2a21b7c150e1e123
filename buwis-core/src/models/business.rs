use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax_bracket::BracketSlice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessType {
    SoleProprietorship,
    Professional,
    MixedIncomeEarner,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoleProprietorship => "sole_proprietorship",
            Self::Professional => "professional",
            Self::MixedIncomeEarner => "mixed_income_earner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sole_proprietorship" => Some(Self::SoleProprietorship),
            "professional" => Some(Self::Professional),
            "mixed_income_earner" => Some(Self::MixedIncomeEarner),
            _ => None,
        }
    }
}

/// The two statutory computation options for business income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxOption {
    /// Flat percentage tax on gross receipts.
    FlatEightPercent,
    /// Graduated bracket tax on net (or OSD-reduced) income.
    Graduated,
}

impl TaxOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlatEightPercent => "8%",
            Self::Graduated => "graduated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "8%" => Some(Self::FlatEightPercent),
            "graduated" => Some(Self::Graduated),
            _ => None,
        }
    }
}

/// Inputs for a business income tax comparison.
///
/// All monetary fields must be non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTaxInput {
    pub tax_year: i32,
    pub gross_receipts: Decimal,
    pub total_deductions: Decimal,
    pub business_type: BusinessType,
    /// Take the optional standard deduction (a fixed percentage of gross
    /// receipts) in place of actual deductions for the graduated option.
    pub use_optional_standard_deduction: bool,
}

/// Result of comparing the flat and graduated computation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTaxResult {
    pub eight_percent_tax: Decimal,
    pub graduated_tax: Decimal,
    pub recommended_option: TaxOption,
    /// Gross receipts less actual deductions, floored at zero.
    pub net_income: Decimal,
    /// The taxable income the graduated option was computed on (net income,
    /// or the OSD-reduced amount when the OSD flag is set).
    pub graduated_taxable_income: Decimal,
    pub graduated_breakdown: Vec<BracketSlice>,
}
