use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    constants::BORROW_MARGIN,
    errors::Result,
    math_helper,
    models::{Reserve, UserAccountSnapshot},
};

/// Whether the user may open a borrow on `reserve` at all
pub fn asset_can_be_borrowed_by_user(reserve: &Reserve, user: Option<&UserAccountSnapshot>) -> bool {
    if !reserve.borrowing_enabled || !reserve.is_active || reserve.is_frozen {
        return false;
    }

    if user.is_some_and(|user| user.is_in_isolation_mode) && !reserve.borrowable_in_isolation {
        return false;
    }

    true
}

/// Largest amount of `reserve` the user can borrow, in native units
///
/// # Arguments
/// * `reserve` - Reserve to borrow from
/// * `user` - Current account figures, if the wallet has an account
/// * `market_reference_price_in_usd` - Reference currency price with 8 decimals
///
/// # Returns
/// * `Result<Decimal>` - Borrowable amount, zero when nothing can be borrowed
pub fn max_amount_available_to_borrow(
    reserve: &Reserve,
    user: Option<&UserAccountSnapshot>,
    market_reference_price_in_usd: Decimal,
) -> Result<Decimal> {
    let Some(user) = user else {
        return Ok(Decimal::ZERO);
    };

    let price = reserve.price_in_market_reference_currency;
    let Some(user_limit) = user
        .available_borrows_market_reference_currency
        .checked_div(price)
    else {
        // unpriced reserve
        return Ok(Decimal::ZERO);
    };

    let mut max_amount = user_limit.min(reserve.available_liquidity);

    if reserve.has_borrow_cap() {
        max_amount = max_amount.min(reserve.borrow_cap - reserve.total_debt);
    }

    if user.is_in_isolation_mode && !reserve.debt_ceiling.is_zero() {
        let price_in_usd = math_helper::market_reference_to_usd(price, market_reference_price_in_usd)?;
        let remaining_ceiling = reserve.debt_ceiling - reserve.isolation_mode_total_debt;

        if let Some(ceiling_amount) = remaining_ceiling.checked_div(price_in_usd) {
            max_amount = max_amount.min(ceiling_amount);
        }
    }

    let should_add_margin = user.has_borrows() || user_limit < reserve.available_liquidity;
    if should_add_margin {
        max_amount *= BORROW_MARGIN;
    }

    debug!(
        "Max borrow of {}: {} (user limit {}, pool liquidity {})",
        reserve.symbol, max_amount, user_limit, reserve.available_liquidity
    );

    Ok(max_amount.max(Decimal::ZERO))
}
