use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a tax year's graduated rate schedule.
///
/// Brackets are immutable reference data. For a given year they are ordered
/// by ascending `bracket_order`/`min_income`, contiguous (`min_income` of
/// bracket *n+1* equals `max_income` of bracket *n*), and exactly one bracket
/// is open-ended (`max_income` is `None`). `base_tax` is the cumulative tax
/// owed on income below `min_income` as published in the schedule;
/// `excess_over_threshold` mirrors `min_income` the way the published tables
/// print it ("plus X% of the excess over ...").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub tax_year: i32,
    pub bracket_order: i32,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    /// Marginal rate as a fraction (0.25 for 25%).
    pub rate: Decimal,
    pub excess_over_threshold: Decimal,
    pub is_active: bool,
}

/// One row of a computed per-bracket breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub bracket_order: i32,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    /// The portion of taxable income that fell inside this bracket.
    pub taxable_amount: Decimal,
    pub rate_percent: Decimal,
    pub tax_amount: Decimal,
}

/// Result of running taxable income through a graduated rate schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub total_tax: Decimal,
    /// Rate applied to the last peso of taxable income, as a percentage.
    pub marginal_rate_percent: Decimal,
    /// Breakdown rows in ascending bracket order.
    pub breakdown: Vec<BracketSlice>,
}
