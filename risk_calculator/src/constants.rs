use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimals of the reference currency -> USD price feed
pub const USD_DECIMALS: u32 = 8;

/// Marker address the pool uses for the chain's native asset.
/// Supplies of it go through the wrapped base-asset reserve.
pub const NATIVE_ASSET_ADDRESS: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Text amount that stands for "supply everything available"
pub const MAX_AMOUNT_SENTINEL: &str = "-1";

/// Native balance left in the wallet to pay for gas
pub const NATIVE_GAS_RESERVE: Decimal = dec!(0.001);

/// Share of the remaining supply cap that the max button will use
pub const SUPPLY_CAP_MARGIN: Decimal = dec!(0.995);

/// Utilization of the supply cap from which the near-cap warning is shown
pub const SUPPLY_CAP_WARNING_RATIO: Decimal = dec!(0.99);

/// Share of the borrowable amount offered when the user already has debt
pub const BORROW_MARGIN: Decimal = dec!(0.99);

/// Health factor under which a position can be liquidated
pub const LIQUIDATION_HEALTH_FACTOR: Decimal = Decimal::ONE;

pub const DEFAULT_AT_RISK_HEALTH_FACTOR: Decimal = dec!(1.1);
