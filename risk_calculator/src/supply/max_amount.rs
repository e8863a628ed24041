use alloy::primitives::Address;
use rust_decimal::Decimal;

use crate::{
    constants::{NATIVE_ASSET_ADDRESS, NATIVE_GAS_RESERVE, SUPPLY_CAP_MARGIN},
    models::Reserve,
};

/// Largest amount of `asset` the user can supply to `reserve`.
///
/// Starts from the wallet balance, keeps some native balance for gas and stays
/// slightly below the remaining supply cap so the transaction does not revert
/// on interest accrued in between.
pub fn max_amount_available_to_supply(
    wallet_balance: Decimal,
    reserve: &Reserve,
    asset: Address,
) -> Decimal {
    let mut max_amount = wallet_balance;

    if max_amount > Decimal::ZERO && asset == NATIVE_ASSET_ADDRESS {
        max_amount -= NATIVE_GAS_RESERVE;
    }

    if reserve.has_supply_cap() {
        let remaining_cap = (reserve.supply_cap - reserve.total_liquidity) * SUPPLY_CAP_MARGIN;
        max_amount = max_amount.min(remaining_cap);
    }

    max_amount.max(Decimal::ZERO)
}
