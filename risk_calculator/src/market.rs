use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::NATIVE_ASSET_ADDRESS,
    errors::{Result, RiskError},
    models::{Reserve, UserAccountSnapshot, UserReservePosition, WalletBalances},
};

/// Per-market settings the calculator needs besides the reserve data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConfig {
    /// Symbol of the reserve that backs the native asset, e.g. `WETH`
    pub wrapped_base_asset_symbol: String,
    /// Symbol of the native asset, e.g. `ETH`
    pub base_asset_symbol: String,
    #[serde(default)]
    pub staking_enabled: bool,
}

/// Everything the calculator reads, captured at one point in time.
///
/// This is the explicit context a frontend passes in on every recomputation
/// in place of its shared stores. The calculator never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub reserves: Vec<Reserve>,
    /// `None` when the wallet has no account on the pool
    #[serde(default)]
    pub user: Option<UserAccountSnapshot>,
    #[serde(default)]
    pub wallet_balances: WalletBalances,
    /// Price of one unit of the reference currency in USD, with 8 decimals
    pub market_reference_price_in_usd: Decimal,
    pub market: MarketConfig,
}

/// The reserve, position and balance a supply of a given asset acts on
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyTarget<'a> {
    pub reserve: &'a Reserve,
    pub user_reserve: Option<&'a UserReservePosition>,
    pub wallet_balance: Decimal,
    /// True when the native asset is supplied through its wrapped reserve
    pub supply_unwrapped: bool,
    pub display_symbol: &'a str,
}

impl MarketSnapshot {
    /// Finds a reserve by its underlying asset
    pub fn find_reserve(&self, underlying_asset: Address) -> Option<&Reserve> {
        self.reserves
            .iter()
            .find(|reserve| reserve.underlying_asset == underlying_asset)
    }

    /// Resolves what a supply of `asset` acts on.
    ///
    /// The native asset maps to the wrapped base-asset reserve; the user
    /// position follows the resolved reserve while the wallet balance stays
    /// keyed by the requested asset.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::ReserveNotFound`] if no reserve backs the asset
    pub fn resolve_supply_target(&self, asset: Address) -> Result<SupplyTarget<'_>> {
        let supply_unwrapped = asset == NATIVE_ASSET_ADDRESS;

        let reserve = if supply_unwrapped {
            self.reserves
                .iter()
                .find(|reserve| reserve.symbol == self.market.wrapped_base_asset_symbol)
        } else {
            self.find_reserve(asset)
        }
        .ok_or(RiskError::ReserveNotFound(asset))?;

        let user_reserve = self
            .user
            .as_ref()
            .and_then(|user| user.position(reserve.underlying_asset));

        let display_symbol = if supply_unwrapped {
            self.market.base_asset_symbol.as_str()
        } else {
            reserve.symbol.as_str()
        };

        debug!(
            "Resolved supply of {} to reserve {} ({})",
            asset, reserve.symbol, reserve.underlying_asset
        );

        Ok(SupplyTarget {
            reserve,
            user_reserve,
            wallet_balance: self.wallet_balances.get(asset),
            supply_unwrapped,
            display_symbol,
        })
    }

    /// Checks that every monetary figure in the snapshot is non-negative.
    ///
    /// A user health factor is exempt: a negative one was already read as undefined.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative(
            || "marketReferencePriceInUsd".to_string(),
            self.market_reference_price_in_usd,
        )?;

        for reserve in &self.reserves {
            for (name, value) in reserve.decimal_fields() {
                ensure_non_negative(|| format!("{}.{}", reserve.symbol, name), value)?;
            }
        }

        if let Some(user) = &self.user {
            let totals = [
                (
                    "totalCollateralMarketReferenceCurrency",
                    user.total_collateral_market_reference_currency,
                ),
                (
                    "totalBorrowsMarketReferenceCurrency",
                    user.total_borrows_market_reference_currency,
                ),
                (
                    "availableBorrowsMarketReferenceCurrency",
                    user.available_borrows_market_reference_currency,
                ),
                (
                    "currentLiquidationThreshold",
                    user.current_liquidation_threshold,
                ),
            ];
            for (name, value) in totals {
                ensure_non_negative(|| format!("user.{}", name), value)?;
            }

            for position in &user.user_reserves {
                ensure_non_negative(
                    || format!("user.{}.underlyingBalance", position.underlying_asset),
                    position.underlying_balance,
                )?;
            }
        }

        for (asset, amount) in self.wallet_balances.iter() {
            ensure_non_negative(|| format!("walletBalances.{}", asset), *amount)?;
        }

        Ok(())
    }
}

fn ensure_non_negative(field: impl FnOnce() -> String, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RiskError::NegativeValue {
            field: field(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy::primitives::address;
    use rust_decimal_macros::dec;

    pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
    pub const AMPL: Address = address!("d46ba6d942050d489dbd938a2c909a5d5039a161");

    pub fn reserve(symbol: &str, underlying_asset: Address) -> Reserve {
        Reserve {
            symbol: symbol.to_string(),
            underlying_asset,
            supply_cap: Decimal::ZERO,
            borrow_cap: Decimal::ZERO,
            total_liquidity: dec!(1000),
            total_debt: dec!(400),
            available_liquidity: dec!(600),
            liquidation_threshold: dec!(0.8),
            price_in_market_reference_currency: dec!(1),
            is_isolated: false,
            usage_as_collateral_enabled: true,
            borrowing_enabled: true,
            is_active: true,
            is_frozen: false,
            borrowable_in_isolation: false,
            debt_ceiling: Decimal::ZERO,
            isolation_mode_total_debt: Decimal::ZERO,
        }
    }

    pub fn user() -> UserAccountSnapshot {
        UserAccountSnapshot {
            total_collateral_market_reference_currency: dec!(100),
            total_borrows_market_reference_currency: dec!(40),
            available_borrows_market_reference_currency: dec!(35),
            current_liquidation_threshold: dec!(0.8),
            health_factor: Some(dec!(2)),
            is_in_isolation_mode: false,
            isolated_reserve: None,
            user_reserves: Vec::new(),
        }
    }

    pub fn snapshot() -> MarketSnapshot {
        let mut wallet_balances = WalletBalances::new();
        wallet_balances.insert(WETH, dec!(2));
        wallet_balances.insert(NATIVE_ASSET_ADDRESS, dec!(5));
        wallet_balances.insert(DAI, dec!(1000));

        MarketSnapshot {
            reserves: vec![reserve("WETH", WETH), reserve("DAI", DAI)],
            user: Some(user()),
            wallet_balances,
            market_reference_price_in_usd: dec!(100000000),
            market: MarketConfig {
                wrapped_base_asset_symbol: "WETH".to_string(),
                base_asset_symbol: "ETH".to_string(),
                staking_enabled: false,
            },
        }
    }

    #[test]
    fn test_resolve_erc20_target() {
        let mut market = snapshot();
        market.user.as_mut().unwrap().user_reserves.push(UserReservePosition {
            underlying_asset: DAI,
            underlying_balance: dec!(10),
            usage_as_collateral_enabled_on_user: true,
        });

        let target = market.resolve_supply_target(DAI).unwrap();

        assert_eq!(target.reserve.symbol, "DAI");
        assert_eq!(target.display_symbol, "DAI");
        assert_eq!(target.wallet_balance, dec!(1000));
        assert!(!target.supply_unwrapped);
        assert_eq!(target.user_reserve.unwrap().underlying_balance, dec!(10));
    }

    #[test]
    fn test_resolve_native_target() {
        let mut market = snapshot();
        market.user.as_mut().unwrap().user_reserves.push(UserReservePosition {
            underlying_asset: WETH,
            underlying_balance: dec!(1),
            usage_as_collateral_enabled_on_user: false,
        });

        let target = market.resolve_supply_target(NATIVE_ASSET_ADDRESS).unwrap();

        assert_eq!(target.reserve.underlying_asset, WETH);
        assert_eq!(target.display_symbol, "ETH");
        assert!(target.supply_unwrapped);
        // balance of the native asset, not of the wrapped token
        assert_eq!(target.wallet_balance, dec!(5));
        assert_eq!(target.user_reserve.unwrap().underlying_balance, dec!(1));
    }

    #[test]
    fn test_resolve_unknown_asset() {
        let market = snapshot();
        assert_eq!(
            market.resolve_supply_target(AMPL),
            Err(RiskError::ReserveNotFound(AMPL))
        );

        let mut market = snapshot();
        market.market.wrapped_base_asset_symbol = "WMATIC".to_string();
        assert_eq!(
            market.resolve_supply_target(NATIVE_ASSET_ADDRESS),
            Err(RiskError::ReserveNotFound(NATIVE_ASSET_ADDRESS))
        );
    }

    #[test]
    fn test_resolve_without_user() {
        let mut market = snapshot();
        market.user = None;

        let target = market.resolve_supply_target(WETH).unwrap();
        assert!(target.user_reserve.is_none());
    }

    #[test]
    fn test_validate_snapshot() {
        assert_eq!(snapshot().validate(), Ok(()));

        let mut market = snapshot();
        market.reserves[1].total_liquidity = dec!(-1);
        assert_eq!(
            market.validate(),
            Err(RiskError::NegativeValue {
                field: "DAI.totalLiquidity".to_string(),
                value: dec!(-1),
            })
        );

        let mut market = snapshot();
        market.user.as_mut().unwrap().total_borrows_market_reference_currency = dec!(-0.5);
        assert!(matches!(
            market.validate(),
            Err(RiskError::NegativeValue { field, .. }) if field == "user.totalBorrowsMarketReferenceCurrency"
        ));

        let mut market = snapshot();
        market.wallet_balances.insert(DAI, dec!(-3));
        assert!(market.validate().is_err());
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "reserves": [{
                "symbol": "WETH",
                "underlyingAsset": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
                "supplyCap": "1000",
                "totalLiquidity": "990.5",
                "liquidationThreshold": "0.825",
                "priceInMarketReferenceCurrency": "1"
            }],
            "walletBalances": {
                "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee": "3"
            },
            "marketReferencePriceInUsd": "325000000000",
            "market": { "wrappedBaseAssetSymbol": "WETH", "baseAssetSymbol": "ETH" }
        }"#;

        let market: MarketSnapshot = serde_json::from_str(json).unwrap();

        assert!(market.user.is_none());
        assert!(!market.market.staking_enabled);
        assert_eq!(market.validate(), Ok(()));

        let target = market.resolve_supply_target(NATIVE_ASSET_ADDRESS).unwrap();
        assert_eq!(target.reserve.supply_cap, dec!(1000));
        assert_eq!(target.wallet_balance, dec!(3));
    }
}
