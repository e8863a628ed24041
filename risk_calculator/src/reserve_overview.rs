use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    borrow,
    errors::{Result, RiskError},
    market::MarketSnapshot,
    math_helper,
    supply::max_amount,
};

/// What the user can do with a reserve, shown on the reserve page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveActionsSummary {
    pub symbol: String,
    pub wallet_balance: Decimal,
    pub wallet_balance_usd: Decimal,
    pub available_to_supply: Decimal,
    pub available_to_borrow: Decimal,
    pub can_borrow: bool,
}

/// Summarizes the supply and borrow headroom of the user on one reserve
///
/// # Errors
///
/// * [`RiskError::NegativeValue`] - The snapshot carries a negative figure
/// * [`RiskError::ReserveNotFound`] - No reserve with this underlying asset
/// * [`RiskError::Overflow`] - The amounts do not fit a decimal
pub fn summarize_reserve_actions(
    snapshot: &MarketSnapshot,
    underlying_asset: Address,
) -> Result<ReserveActionsSummary> {
    snapshot.validate()?;

    let reserve = snapshot
        .find_reserve(underlying_asset)
        .ok_or(RiskError::ReserveNotFound(underlying_asset))?;
    let user = snapshot.user.as_ref();

    let wallet_balance = snapshot.wallet_balances.get(underlying_asset);
    let wallet_balance_usd = math_helper::market_reference_to_usd(
        math_helper::to_market_reference_currency(
            wallet_balance,
            reserve.price_in_market_reference_currency,
        )?,
        snapshot.market_reference_price_in_usd,
    )?;

    let can_borrow = borrow::asset_can_be_borrowed_by_user(reserve, user);
    let available_to_borrow = if can_borrow {
        borrow::max_amount_available_to_borrow(
            reserve,
            user,
            snapshot.market_reference_price_in_usd,
        )?
    } else {
        Decimal::ZERO
    };

    Ok(ReserveActionsSummary {
        symbol: reserve.symbol.clone(),
        wallet_balance,
        wallet_balance_usd,
        available_to_supply: max_amount::max_amount_available_to_supply(
            wallet_balance,
            reserve,
            underlying_asset,
        ),
        available_to_borrow,
        can_borrow,
    })
}
