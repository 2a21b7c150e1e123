//! Shared helpers for the calculation engines.

use rust_decimal::Decimal;

use crate::calculations::ValidationError;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (midpoints round away from zero, standard financial convention).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use buwis_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Rejects negative monetary inputs.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(())
}
