use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{errors::Result, math_helper};

fn enabled() -> bool {
    true
}

/// A lending-pool asset as seen by the frontend.
///
/// Amounts are in native units of the asset, the price and the debt figures
/// of isolation mode in their own currency (see field docs). A cap of zero
/// means the reserve is uncapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reserve {
    pub symbol: String,
    pub underlying_asset: Address,
    #[serde(default)]
    pub supply_cap: Decimal,
    #[serde(default)]
    pub borrow_cap: Decimal,
    pub total_liquidity: Decimal,
    #[serde(default)]
    pub total_debt: Decimal,
    #[serde(default)]
    pub available_liquidity: Decimal,
    /// Formatted threshold, e.g. `0.825`
    pub liquidation_threshold: Decimal,
    pub price_in_market_reference_currency: Decimal,
    #[serde(default)]
    pub is_isolated: bool,
    #[serde(default = "enabled")]
    pub usage_as_collateral_enabled: bool,
    #[serde(default = "enabled")]
    pub borrowing_enabled: bool,
    #[serde(default = "enabled")]
    pub is_active: bool,
    #[serde(default)]
    pub is_frozen: bool,
    #[serde(default)]
    pub borrowable_in_isolation: bool,
    /// USD, zero when the reserve has no debt ceiling
    #[serde(default)]
    pub debt_ceiling: Decimal,
    /// USD
    #[serde(default)]
    pub isolation_mode_total_debt: Decimal,
}

impl Reserve {
    pub fn has_supply_cap(&self) -> bool {
        !self.supply_cap.is_zero()
    }

    pub fn has_borrow_cap(&self) -> bool {
        !self.borrow_cap.is_zero()
    }

    pub(crate) fn decimal_fields(&self) -> [(&'static str, Decimal); 9] {
        [
            ("supplyCap", self.supply_cap),
            ("borrowCap", self.borrow_cap),
            ("totalLiquidity", self.total_liquidity),
            ("totalDebt", self.total_debt),
            ("availableLiquidity", self.available_liquidity),
            ("liquidationThreshold", self.liquidation_threshold),
            (
                "priceInMarketReferenceCurrency",
                self.price_in_market_reference_currency,
            ),
            ("debtCeiling", self.debt_ceiling),
            ("isolationModeTotalDebt", self.isolation_mode_total_debt),
        ]
    }
}

/// A user's position in a single reserve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReservePosition {
    pub underlying_asset: Address,
    pub underlying_balance: Decimal,
    #[serde(default)]
    pub usage_as_collateral_enabled_on_user: bool,
}

/// Aggregated account figures of a wallet, in the market reference currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountSnapshot {
    pub total_collateral_market_reference_currency: Decimal,
    pub total_borrows_market_reference_currency: Decimal,
    #[serde(default)]
    pub available_borrows_market_reference_currency: Decimal,
    pub current_liquidation_threshold: Decimal,
    /// `None` when the account has no debt. Negative values coming from the
    /// pool helpers (`-1`) are read as `None`.
    #[serde(default, deserialize_with = "deserialize_health_factor")]
    pub health_factor: Option<Decimal>,
    #[serde(default)]
    pub is_in_isolation_mode: bool,
    #[serde(default)]
    pub isolated_reserve: Option<Address>,
    #[serde(default)]
    pub user_reserves: Vec<UserReservePosition>,
}

fn deserialize_health_factor<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Decimal>::deserialize(deserializer)?;
    Ok(value.filter(|hf| !hf.is_sign_negative()))
}

impl UserAccountSnapshot {
    /// Finds the user's position in the given reserve
    pub fn position(&self, underlying_asset: Address) -> Option<&UserReservePosition> {
        self.user_reserves
            .iter()
            .find(|position| position.underlying_asset == underlying_asset)
    }

    pub fn has_borrows(&self) -> bool {
        !self.total_borrows_market_reference_currency.is_zero()
    }

    /// Whether any reserve other than `underlying_asset` is used as collateral
    pub fn has_other_collateral(&self, underlying_asset: Address) -> bool {
        self.user_reserves.iter().any(|position| {
            position.usage_as_collateral_enabled_on_user
                && position.underlying_asset != underlying_asset
        })
    }

    /// Whether this user is isolated on exactly the given reserve
    pub fn is_isolated_on(&self, underlying_asset: Address) -> bool {
        self.is_in_isolation_mode && self.isolated_reserve == Some(underlying_asset)
    }
}

/// Wallet balances in native units, keyed by asset address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletBalances(HashMap<Address, Decimal>);

impl WalletBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: Address, amount: Decimal) {
        self.0.insert(asset, amount);
    }

    /// Stores a raw on-chain balance, scaled down by the token decimals
    pub fn insert_base_units(&mut self, asset: Address, raw: U256, decimals: u8) -> Result<()> {
        let amount = math_helper::base_units_to_decimal(raw, decimals)?;
        self.insert(asset, amount);
        Ok(())
    }

    /// Balance of `asset`; zero for unknown assets
    pub fn get(&self, asset: Address) -> Decimal {
        self.0.get(&asset).copied().unwrap_or_default()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Address, &Decimal)> {
        self.0.iter()
    }
}
