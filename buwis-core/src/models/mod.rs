mod business;
mod deadlines;
mod individual;
mod tax_bracket;
mod withholding;

pub use business::{BusinessTaxInput, BusinessTaxResult, BusinessType, TaxOption};
pub use deadlines::{DeadlineSchedule, TaxDeadlineSet, TaxpayerCategory};
pub use individual::{DeductionType, IndividualTaxInput, IndividualTaxResult};
pub use tax_bracket::{BracketSlice, BracketTax, TaxBracket};
pub use withholding::{IncomeCategory, WithholdingTaxInput};
