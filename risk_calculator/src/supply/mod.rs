pub mod guards;
pub mod max_amount;
pub mod projection;
pub mod warnings;

use std::str::FromStr;

use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
    constants::MAX_AMOUNT_SENTINEL,
    errors::{Result, RiskError},
    health_factor::{HealthFactorStatus, RiskSettings},
    market::MarketSnapshot,
    math_helper,
};

pub use guards::BlockingError;
pub use projection::HealthFactorProjection;
pub use warnings::{AssetAdvisory, SupplyWarnings};

/// Amount typed in the supply form
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum SupplyAmount {
    Exact(Decimal),
    /// Everything that can be supplied, see [`max_amount::max_amount_available_to_supply`]
    Max,
}

impl SupplyAmount {
    /// Parses the form input. An empty input is a zero amount and `-1` asks
    /// for the maximum.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Ok(SupplyAmount::Exact(Decimal::ZERO));
        }
        if trimmed == MAX_AMOUNT_SENTINEL {
            return Ok(SupplyAmount::Max);
        }

        math_helper::parse_amount(trimmed)
            .map(SupplyAmount::Exact)
            .map_err(|_| RiskError::InvalidAmount(input.to_string()))
    }

    pub fn resolve(self, max_amount: Decimal) -> Decimal {
        match self {
            SupplyAmount::Exact(amount) => amount,
            SupplyAmount::Max => max_amount,
        }
    }
}

impl FromStr for SupplyAmount {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A hypothetical supply of `amount` of `underlying_asset`
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct SupplyRequest {
    pub underlying_asset: Address,
    pub amount: SupplyAmount,
}

impl SupplyRequest {
    pub fn new(underlying_asset: Address, amount: &str) -> Result<Self> {
        Ok(Self {
            underlying_asset,
            amount: SupplyAmount::parse(amount)?,
        })
    }
}

/// Everything a supply form displays and gates on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyPreview {
    pub symbol: String,
    pub reserve_underlying_asset: Address,
    pub amount_to_supply: Decimal,
    pub max_amount_to_supply: Decimal,
    /// `None` when a blocked amount is too large to value
    pub amount_in_usd: Option<Decimal>,
    pub health_factor: Option<Decimal>,
    pub health_factor_after: Option<Decimal>,
    pub health_factor_status_after: Option<HealthFactorStatus>,
    /// Only meaningful for users with debt supplying a collateral asset
    pub show_health_factor: bool,
    pub used_as_collateral: bool,
    pub blocking_error: Option<BlockingError>,
    pub warnings: SupplyWarnings,
}

impl SupplyPreview {
    /// Whether the submit action must stay disabled
    pub fn is_blocked(&self) -> bool {
        self.blocking_error.is_some()
    }
}

/// Computes the supply preview for `request` against `snapshot`.
///
/// This is a pure function of its inputs: the caller re-invokes it whenever
/// the typed amount or any part of the snapshot changes.
///
/// The blocking guards are evaluated before the projection. An amount too
/// large to value still comes back as a blocked preview, with no USD amount
/// and the current health factor.
///
/// # Errors
///
/// * [`RiskError::NegativeValue`] - The snapshot carries a negative figure
/// * [`RiskError::ReserveNotFound`] - No reserve backs the requested asset
/// * [`RiskError::Overflow`] - The amounts of an unblocked supply do not fit a decimal
pub fn preview_supply(
    snapshot: &MarketSnapshot,
    request: &SupplyRequest,
    settings: &RiskSettings,
) -> Result<SupplyPreview> {
    snapshot.validate()?;

    let target = snapshot.resolve_supply_target(request.underlying_asset)?;
    let reserve = target.reserve;
    let user = snapshot.user.as_ref();

    let max_amount_to_supply = max_amount::max_amount_available_to_supply(
        target.wallet_balance,
        reserve,
        request.underlying_asset,
    );
    let amount_to_supply = request.amount.resolve(max_amount_to_supply);

    let blocking_error =
        guards::evaluate_blocking_error(reserve, amount_to_supply, target.wallet_balance);

    if let Some(error) = blocking_error {
        debug!("Supply of {} {} blocked: {}", amount_to_supply, reserve.symbol, error);
    }

    let projection = match projection::project_health_factor(
        reserve,
        user,
        amount_to_supply,
        snapshot.market_reference_price_in_usd,
    ) {
        Ok(projection) => Some(projection),
        Err(RiskError::Overflow(quantity)) if blocking_error.is_some() => {
            debug!(
                "Skipping projection of blocked supply of {} {}: {} overflows",
                amount_to_supply, reserve.symbol, quantity
            );
            None
        }
        Err(e) => return Err(e),
    };

    let health_factor = user.and_then(|user| user.health_factor);
    let health_factor_after = projection
        .as_ref()
        .map_or(health_factor, |projection| projection.health_factor_after);

    let warnings = SupplyWarnings {
        supply_cap_nearly_reached: warnings::is_supply_cap_nearly_reached(reserve),
        entering_isolation_mode: warnings::is_entering_isolation_mode(reserve, user),
        advisories: warnings::asset_advisories(
            &reserve.symbol,
            snapshot.market.staking_enabled,
            max_amount_to_supply,
        ),
    };

    let show_health_factor = user.is_some_and(|user| user.has_borrows())
        && reserve.usage_as_collateral_enabled;

    Ok(SupplyPreview {
        symbol: target.display_symbol.to_string(),
        reserve_underlying_asset: reserve.underlying_asset,
        amount_to_supply,
        max_amount_to_supply,
        amount_in_usd: projection.map(|projection| projection.amount_in_usd),
        health_factor,
        health_factor_after,
        health_factor_status_after: settings.classify(health_factor_after),
        show_health_factor,
        used_as_collateral: target
            .user_reserve
            .is_some_and(|position| position.usage_as_collateral_enabled_on_user),
        blocking_error,
        warnings,
    })
}
