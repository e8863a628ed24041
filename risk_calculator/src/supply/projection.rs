use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
    errors::{Result, RiskError},
    math_helper,
    models::{Reserve, UserAccountSnapshot},
};

/// Account figures after a hypothetical supply.
///
/// The projected fields are `None` when there is no user account to project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactorProjection {
    pub amount_in_market_reference_currency: Decimal,
    pub amount_in_usd: Decimal,
    pub total_collateral_after: Option<Decimal>,
    pub liquidation_threshold_after: Option<Decimal>,
    pub health_factor_after: Option<Decimal>,
}

/// Whether a supply of `reserve` would add to the user's collateral.
///
/// Outside isolation mode only non-isolated reserves count; inside it only the
/// reserve the user is isolated on does.
pub fn counts_as_collateral(reserve: &Reserve, user: &UserAccountSnapshot) -> bool {
    (!user.is_in_isolation_mode && !reserve.is_isolated)
        || user.is_isolated_on(reserve.underlying_asset)
}

/// Projects the user's account after supplying `amount` of `reserve`
///
/// # Arguments
/// * `reserve` - Reserve being supplied to
/// * `user` - Current account figures, if the wallet has an account
/// * `amount` - Amount to supply, in native units
/// * `market_reference_price_in_usd` - Reference currency price with 8 decimals
///
/// # Returns
/// * `Result<HealthFactorProjection>` - The projection, or an overflow error
pub fn project_health_factor(
    reserve: &Reserve,
    user: Option<&UserAccountSnapshot>,
    amount: Decimal,
    market_reference_price_in_usd: Decimal,
) -> Result<HealthFactorProjection> {
    let amount_in_market_reference_currency = math_helper::to_market_reference_currency(
        amount,
        reserve.price_in_market_reference_currency,
    )?;
    let amount_in_usd = math_helper::market_reference_to_usd(
        amount_in_market_reference_currency,
        market_reference_price_in_usd,
    )?;

    let Some(user) = user else {
        return Ok(HealthFactorProjection {
            amount_in_market_reference_currency,
            amount_in_usd,
            total_collateral_after: None,
            liquidation_threshold_after: None,
            health_factor_after: None,
        });
    };

    let total_collateral_after = user
        .total_collateral_market_reference_currency
        .checked_add(amount_in_market_reference_currency)
        .ok_or(RiskError::Overflow("total collateral after supply"))?;

    let liquidation_threshold_after = blended_liquidation_threshold(
        user,
        reserve,
        amount_in_market_reference_currency,
        total_collateral_after,
    )?;

    let mut health_factor_after = user.health_factor;

    if !amount.is_zero() && user.has_borrows() && counts_as_collateral(reserve, user) {
        health_factor_after = math_helper::calculate_health_factor_from_balances(
            total_collateral_after,
            user.total_borrows_market_reference_currency,
            liquidation_threshold_after,
        )?;
    }

    debug!(
        "Projected supply of {} {}: {} USD, health factor {:?} -> {:?}",
        amount, reserve.symbol, amount_in_usd, user.health_factor, health_factor_after
    );

    Ok(HealthFactorProjection {
        amount_in_market_reference_currency,
        amount_in_usd,
        total_collateral_after: Some(total_collateral_after),
        liquidation_threshold_after: Some(liquidation_threshold_after),
        health_factor_after,
    })
}

/// Collateral-weighted average of the current threshold and the reserve's
fn blended_liquidation_threshold(
    user: &UserAccountSnapshot,
    reserve: &Reserve,
    amount_in_market_reference_currency: Decimal,
    total_collateral_after: Decimal,
) -> Result<Decimal> {
    if total_collateral_after.is_zero() {
        return Ok(user.current_liquidation_threshold);
    }

    let overflow = || RiskError::Overflow("liquidation threshold after supply");

    let current_weight = user
        .total_collateral_market_reference_currency
        .checked_mul(user.current_liquidation_threshold)
        .ok_or_else(overflow)?;
    let added_weight = amount_in_market_reference_currency
        .checked_mul(reserve.liquidation_threshold)
        .ok_or_else(overflow)?;

    current_weight
        .checked_add(added_weight)
        .and_then(|weight| weight.checked_div(total_collateral_after))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::tests::{reserve, user, DAI, WETH};
    use alloy::primitives::address;
    use rust_decimal_macros::dec;

    const ONE_USD: Decimal = dec!(100000000);

    #[test]
    fn test_amount_conversion() {
        let mut weth = reserve("WETH", WETH);
        weth.price_in_market_reference_currency = dec!(2000);

        let projection = project_health_factor(&weth, None, dec!(1), ONE_USD).unwrap();

        assert_eq!(projection.amount_in_market_reference_currency, dec!(2000));
        assert_eq!(projection.amount_in_usd, dec!(2000));
        assert_eq!(projection.total_collateral_after, None);
        assert_eq!(projection.liquidation_threshold_after, None);
        assert_eq!(projection.health_factor_after, None);
    }

    #[test]
    fn test_projection_blends_threshold() {
        let mut dai = reserve("DAI", DAI);
        dai.liquidation_threshold = dec!(0.5);
        // collateral 100 @ 0.8, borrows 40
        let user = user();

        let projection = project_health_factor(&dai, Some(&user), dec!(100), ONE_USD).unwrap();

        assert_eq!(projection.total_collateral_after, Some(dec!(200)));
        assert_eq!(projection.liquidation_threshold_after, Some(dec!(0.65)));
        assert_eq!(projection.health_factor_after, Some(dec!(3.25)));
    }

    #[test]
    fn test_zero_amount_keeps_health_factor() {
        let dai = reserve("DAI", DAI);
        let mut user = user();
        // deliberately inconsistent with the formula
        user.health_factor = Some(dec!(1.7));

        let projection = project_health_factor(&dai, Some(&user), Decimal::ZERO, ONE_USD).unwrap();

        assert_eq!(projection.amount_in_usd, Decimal::ZERO);
        assert_eq!(projection.health_factor_after, Some(dec!(1.7)));
    }

    #[test]
    fn test_zero_borrows_keeps_health_factor() {
        let dai = reserve("DAI", DAI);
        let mut user = user();
        user.total_borrows_market_reference_currency = Decimal::ZERO;
        user.health_factor = None;

        let projection = project_health_factor(&dai, Some(&user), dec!(50), ONE_USD).unwrap();

        assert_eq!(projection.total_collateral_after, Some(dec!(150)));
        assert_eq!(projection.health_factor_after, None);
    }

    #[test]
    fn test_isolated_reserve_does_not_move_health_factor() {
        let mut isolated = reserve("DAI", DAI);
        isolated.is_isolated = true;
        let user = user();

        let projection = project_health_factor(&isolated, Some(&user), dec!(100), ONE_USD).unwrap();

        assert_eq!(projection.health_factor_after, user.health_factor);
        // the threshold is still projected, only the health factor is held
        assert_eq!(projection.liquidation_threshold_after, Some(dec!(0.8)));
    }

    #[test]
    fn test_isolated_user_supplying_isolated_reserve() {
        let mut isolated = reserve("DAI", DAI);
        isolated.is_isolated = true;
        let mut user = user();
        user.is_in_isolation_mode = true;
        user.isolated_reserve = Some(DAI);

        let projection = project_health_factor(&isolated, Some(&user), dec!(100), ONE_USD).unwrap();
        assert_eq!(projection.health_factor_after, Some(dec!(4)));

        // isolated on another asset: nothing changes
        user.isolated_reserve = Some(address!("d46ba6d942050d489dbd938a2c909a5d5039a161"));
        let projection = project_health_factor(&isolated, Some(&user), dec!(100), ONE_USD).unwrap();
        assert_eq!(projection.health_factor_after, Some(dec!(2)));

        // isolated user supplying a regular reserve: nothing changes either
        let regular = reserve("WETH", WETH);
        user.isolated_reserve = Some(DAI);
        let projection = project_health_factor(&regular, Some(&user), dec!(100), ONE_USD).unwrap();
        assert_eq!(projection.health_factor_after, Some(dec!(2)));
    }

    #[test]
    fn test_empty_account_keeps_current_threshold() {
        let mut dai = reserve("DAI", DAI);
        dai.price_in_market_reference_currency = Decimal::ZERO;
        let mut user = user();
        user.total_collateral_market_reference_currency = Decimal::ZERO;

        let projection = project_health_factor(&dai, Some(&user), dec!(10), ONE_USD).unwrap();

        assert_eq!(projection.total_collateral_after, Some(Decimal::ZERO));
        assert_eq!(projection.liquidation_threshold_after, Some(dec!(0.8)));
        assert_eq!(projection.health_factor_after, Some(Decimal::ZERO));
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut dai = reserve("DAI", DAI);
        dai.price_in_market_reference_currency = Decimal::MAX;

        assert_eq!(
            project_health_factor(&dai, None, dec!(2), ONE_USD),
            Err(RiskError::Overflow("amount in market reference currency"))
        );
    }
}
