use std::str::FromStr;

use alloy::primitives::U256;
use rust_decimal::Decimal;

use crate::{
    constants::USD_DECIMALS,
    errors::{Result, RiskError},
};

/// Parses a user-typed decimal amount.
///
/// Accepts plain (`"12.5"`) and scientific (`"1.25e1"`) notation. Anything
/// else, including negative numbers, a leading `+` and `_` digit separators, is
/// rejected with [`RiskError::InvalidAmount`].
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();

    if trimmed.starts_with('+') || trimmed.contains('_') {
        return Err(RiskError::InvalidAmount(input.to_string()));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| RiskError::InvalidAmount(input.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(RiskError::InvalidAmount(input.to_string()));
    }

    Ok(value.normalize())
}

/// Converts a raw on-chain amount into native units using the token decimals
///
/// # Errors
///
/// Returns an error if the value or the number of decimals cannot be represented
/// by a 96-bit decimal
pub fn base_units_to_decimal(value: U256, decimals: u8) -> Result<Decimal> {
    let unrepresentable = || RiskError::UnrepresentableUnits { value, decimals };

    let value_u128 = u128::try_from(value).map_err(|_| unrepresentable())?;
    let value_i128 = i128::try_from(value_u128).map_err(|_| unrepresentable())?;

    Decimal::try_from_i128_with_scale(value_i128, decimals as u32)
        .map(|d| d.normalize())
        .map_err(|_| unrepresentable())
}

/// `amount × price`, where the price is expressed in the market reference currency
pub fn to_market_reference_currency(amount: Decimal, price: Decimal) -> Result<Decimal> {
    amount
        .checked_mul(price)
        .ok_or(RiskError::Overflow("amount in market reference currency"))
}

/// Converts a market-reference amount to USD with the reference price feed,
/// which carries [`USD_DECIMALS`] decimals.
///
/// The price is scaled down before the multiplication so that only amounts
/// whose USD value itself exceeds the decimal range overflow.
pub fn market_reference_to_usd(
    amount_in_market_reference: Decimal,
    market_reference_price_in_usd: Decimal,
) -> Result<Decimal> {
    let usd_unit = Decimal::from(10u64.pow(USD_DECIMALS));

    market_reference_price_in_usd
        .checked_div(usd_unit)
        .and_then(|price_in_usd| amount_in_market_reference.checked_mul(price_in_usd))
        .ok_or(RiskError::Overflow("amount in USD"))
}

/// Health factor of a position: `collateral × liquidation threshold / borrows`.
///
/// Returns `None` when there is nothing borrowed, the health factor is not
/// defined in that case.
pub fn calculate_health_factor_from_balances(
    collateral_in_market_reference: Decimal,
    borrows_in_market_reference: Decimal,
    liquidation_threshold: Decimal,
) -> Result<Option<Decimal>> {
    if borrows_in_market_reference.is_zero() {
        return Ok(None);
    }

    collateral_in_market_reference
        .checked_mul(liquidation_threshold)
        .and_then(|weighted| weighted.checked_div(borrows_in_market_reference))
        .map(Some)
        .ok_or(RiskError::Overflow("health factor"))
}
