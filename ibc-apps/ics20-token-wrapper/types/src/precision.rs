//! Integer decimal scaling between the counterparty precision of a token and
//! its native precision.
use ibc_app_transfer_types::{Amount, U256};

use crate::error::TokenWrapperError;

/// Largest decimal difference whose conversion factor, `10^d`, still fits in
/// a 256-bit amount.
pub const MAX_DECIMAL_DIFFERENCE: u32 = 77;

/// Returns `10^decimal_difference`, or `None` if it does not fit in 256 bits.
pub fn conversion_factor(decimal_difference: u32) -> Option<U256> {
    let ten = U256::from(10u8);
    let mut factor = U256::one();
    for _ in 0..decimal_difference {
        factor = factor.checked_mul(ten)?;
    }
    Some(factor)
}

/// Converts a counterparty amount into native precision by floor division
/// with `10^decimal_difference`.
///
/// Dust that would round down to nothing is rejected rather than silently
/// dropped.
pub fn scale_down(amount: Amount, decimal_difference: u32) -> Result<Amount, TokenWrapperError> {
    let non_positive = || TokenWrapperError::NonPositiveResult {
        amount,
        decimal_difference,
    };

    let Some(factor) = conversion_factor(decimal_difference) else {
        return Err(non_positive());
    };

    let scaled = U256::from(amount) / factor;
    if scaled.is_zero() {
        return Err(non_positive());
    }

    Ok(scaled.into())
}

/// Converts a native amount into counterparty precision by multiplying with
/// `10^decimal_difference`.
pub fn scale_up(amount: Amount, decimal_difference: u32) -> Result<Amount, TokenWrapperError> {
    let amount_u256 = U256::from(amount);
    if amount_u256.is_zero() {
        return Err(TokenWrapperError::NonPositiveResult {
            amount,
            decimal_difference,
        });
    }

    let scaled = conversion_factor(decimal_difference)
        .and_then(|factor| amount_u256.checked_mul(factor))
        .ok_or(TokenWrapperError::ConversionOverflow {
            amount,
            decimal_difference,
        })?;

    if scaled.is_zero() {
        return Err(TokenWrapperError::NonPositiveResult {
            amount,
            decimal_difference,
        });
    }

    Ok(scaled.into())
}
