// src/amount.rs
use alloy::primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// $STAX has 9 decimals
pub const TOKEN_DECIMALS: u32 = 9;
/// Native ETH value is denominated in wei
pub const NATIVE_DECIMALS: u32 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount {raw} does not fit a decimal with {decimals} decimals")]
    Overflow { raw: U256, decimals: u32 },
}

/// Scale a raw on-chain integer by `decimals`
pub fn scale(raw: U256, decimals: u32) -> Result<Decimal, AmountError> {
    let overflow = || AmountError::Overflow { raw, decimals };

    let as_u128: u128 = raw.try_into().map_err(|_| overflow())?;
    let as_i128 = i128::try_from(as_u128).map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(as_i128, decimals).map_err(|_| overflow())
}

/// Render with exactly two fractional digits, `.` as decimal point and no
/// thousands separator (`1234567.50`)
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
