use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    constants::SUPPLY_CAP_WARNING_RATIO,
    models::{Reserve, UserAccountSnapshot},
};

/// Static notice attached to a specific asset
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetAdvisory {
    /// The token rebases, balances change without transfers
    RebasingToken,
    /// The asset can be staked in the safety module instead
    StakingAvailable,
    /// Part of the balance may be locked in staking and fail to transfer
    StakedBalance,
}

impl AssetAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            AssetAdvisory::RebasingToken => {
                "This asset is a rebasing token and does not behave like a standard ERC20."
            }
            AssetAdvisory::StakingAvailable => {
                "This asset can also be staked in the safety module for rewards."
            }
            AssetAdvisory::StakedBalance => {
                "Check that the amount is not currently staked, otherwise the transaction may fail."
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum AdvisoryCondition {
    Always,
    StakingEnabled,
    NonZeroMaxSupply,
}

const ASSET_ADVISORIES: &[(&str, AssetAdvisory, AdvisoryCondition)] = &[
    ("AMPL", AssetAdvisory::RebasingToken, AdvisoryCondition::Always),
    ("AAVE", AssetAdvisory::StakingAvailable, AdvisoryCondition::StakingEnabled),
    ("SNX", AssetAdvisory::StakedBalance, AdvisoryCondition::NonZeroMaxSupply),
];

/// Advisories that apply to supplying `symbol`
pub fn asset_advisories(
    symbol: &str,
    staking_enabled: bool,
    max_amount_to_supply: Decimal,
) -> Vec<AssetAdvisory> {
    ASSET_ADVISORIES
        .iter()
        .filter(|(advisory_symbol, _, _)| *advisory_symbol == symbol)
        .filter(|(_, _, condition)| match condition {
            AdvisoryCondition::Always => true,
            AdvisoryCondition::StakingEnabled => staking_enabled,
            AdvisoryCondition::NonZeroMaxSupply => !max_amount_to_supply.is_zero(),
        })
        .map(|(_, advisory, _)| *advisory)
        .collect()
}

/// True when the reserve has used at least 99% of its supply cap, but not all of it
pub fn is_supply_cap_nearly_reached(reserve: &Reserve) -> bool {
    if !reserve.has_supply_cap() {
        return false;
    }

    match reserve.total_liquidity.checked_div(reserve.supply_cap) {
        Some(ratio) => ratio >= SUPPLY_CAP_WARNING_RATIO && ratio < Decimal::ONE,
        None => false,
    }
}

/// Whether supplying `reserve` would switch the user into isolation mode.
///
/// That happens when the user is not isolated yet, the reserve is isolated,
/// no other reserve is used as collateral and an existing balance of this
/// reserve is not already collateral. A wallet without an account is treated
/// as an empty account.
pub fn is_entering_isolation_mode(reserve: &Reserve, user: Option<&UserAccountSnapshot>) -> bool {
    if !reserve.is_isolated {
        return false;
    }

    let Some(user) = user else {
        return true;
    };

    if user.is_in_isolation_mode || user.has_other_collateral(reserve.underlying_asset) {
        return false;
    }

    match user.position(reserve.underlying_asset) {
        Some(position) if !position.underlying_balance.is_zero() => {
            !position.usage_as_collateral_enabled_on_user
        }
        _ => true,
    }
}

/// Non-blocking notices shown next to a supply
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyWarnings {
    pub supply_cap_nearly_reached: bool,
    pub entering_isolation_mode: bool,
    pub advisories: Vec<AssetAdvisory>,
}
