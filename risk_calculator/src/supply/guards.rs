use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Reserve;

/// Reason a supply cannot be submitted
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockingError {
    NotEnoughBalance,
    CapReached,
}

impl fmt::Display for BlockingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockingError::NotEnoughBalance => write!(f, "Not enough balance on your wallet"),
            BlockingError::CapReached => write!(f, "Cap reached. Lower supply amount"),
        }
    }
}

/// Whether supplying `amount` would push the reserve past its supply cap.
/// Uncapped reserves never report true.
pub fn is_supply_cap_reached(reserve: &Reserve, amount: Decimal) -> bool {
    reserve.has_supply_cap() && amount > reserve.supply_cap - reserve.total_liquidity
}

/// First guard that blocks the supply, checked in order: wallet balance, then cap
pub fn evaluate_blocking_error(
    reserve: &Reserve,
    amount: Decimal,
    wallet_balance: Decimal,
) -> Option<BlockingError> {
    if amount > wallet_balance {
        Some(BlockingError::NotEnoughBalance)
    } else if is_supply_cap_reached(reserve, amount) {
        Some(BlockingError::CapReached)
    } else {
        None
    }
}
