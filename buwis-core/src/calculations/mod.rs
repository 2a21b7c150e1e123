//! Tax calculation engines.
//!
//! Every engine here is a pure, synchronous computation over typed records:
//! the bracket kernel shared by the income engines, the individual and
//! business annual computations, the flat-rate withholding table, and the
//! deadline calendar. Bracket rows come in from the caller (usually via
//! [`crate::store::BracketRepository`]); nothing in this module performs I/O.

pub mod bracket;
pub mod business;
pub mod common;
pub mod deadlines;
pub mod individual;
pub mod withholding;

pub use bracket::BracketTaxCalculator;
pub use business::BusinessTaxEngine;
pub use deadlines::deadline_schedule;
pub use individual::IndividualTaxEngine;
pub use withholding::{compute_withholding, withholding_rate};

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the calculation engines.
///
/// Validation is strict: a negative monetary input is rejected, never
/// clamped. Everything past validation is deterministic arithmetic with no
/// failure modes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount {
        field: &'static str,
        value: Decimal,
    },

    #[error("no tax brackets provided")]
    NoBrackets,
}
