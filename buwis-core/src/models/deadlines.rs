use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxpayerCategory {
    Individual,
    Business,
    Corporate,
}

impl TaxpayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Business => "business",
            Self::Corporate => "corporate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "business" => Some(Self::Business),
            "corporate" => Some(Self::Corporate),
            _ => None,
        }
    }
}

/// Payment calendar for one taxpayer category in one tax year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineSchedule {
    /// Annual return filing deadline (in the year after the tax year).
    pub annual: NaiveDate,
    /// Quarterly payment deadlines, first quarter first.
    pub quarterly: [NaiveDate; 4],
}

/// Derived deadline calendar for a tax year. Purely computed; nothing here
/// is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDeadlineSet {
    pub tax_year: i32,
    pub individual: DeadlineSchedule,
    pub business: DeadlineSchedule,
    pub corporate: DeadlineSchedule,
}

impl TaxDeadlineSet {
    pub fn for_category(&self, category: TaxpayerCategory) -> &DeadlineSchedule {
        match category {
            TaxpayerCategory::Individual => &self.individual,
            TaxpayerCategory::Business => &self.business,
            TaxpayerCategory::Corporate => &self.corporate,
        }
    }
}
