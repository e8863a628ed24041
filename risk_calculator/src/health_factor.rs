use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AT_RISK_HEALTH_FACTOR, LIQUIDATION_HEALTH_FACTOR};

/// Risk band a health factor falls into
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthFactorStatus {
    Liquidatable,
    AtRisk,
    Healthy,
}

impl HealthFactorStatus {
    /// Determines the risk band of a health factor
    ///
    /// # Arguments
    /// * `health_factor` - Health factor of the position
    /// * `at_risk_threshold` - Highest health factor still considered at risk
    pub fn from_health_factor(health_factor: Decimal, at_risk_threshold: Decimal) -> Self {
        if health_factor < LIQUIDATION_HEALTH_FACTOR {
            HealthFactorStatus::Liquidatable
        } else if health_factor <= at_risk_threshold {
            HealthFactorStatus::AtRisk
        } else {
            HealthFactorStatus::Healthy
        }
    }
}

/// Caller-tunable knobs of the calculator
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSettings {
    pub at_risk_health_factor: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            at_risk_health_factor: DEFAULT_AT_RISK_HEALTH_FACTOR,
        }
    }
}

impl RiskSettings {
    pub fn classify(&self, health_factor: Option<Decimal>) -> Option<HealthFactorStatus> {
        health_factor
            .map(|hf| HealthFactorStatus::from_health_factor(hf, self.at_risk_health_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_health_factor_status() {
        let threshold = dec!(1.1);

        assert_eq!(
            HealthFactorStatus::from_health_factor(dec!(0.99), threshold),
            HealthFactorStatus::Liquidatable
        );
        assert_eq!(
            HealthFactorStatus::from_health_factor(dec!(1), threshold),
            HealthFactorStatus::AtRisk
        );
        assert_eq!(
            HealthFactorStatus::from_health_factor(dec!(1.1), threshold),
            HealthFactorStatus::AtRisk
        );
        assert_eq!(
            HealthFactorStatus::from_health_factor(dec!(1.1001), threshold),
            HealthFactorStatus::Healthy
        );
    }

    #[test]
    fn test_classify_undefined_health_factor() {
        let settings = RiskSettings::default();
        assert_eq!(settings.classify(None), None);
        assert_eq!(
            settings.classify(Some(dec!(3))),
            Some(HealthFactorStatus::Healthy)
        );
    }
}
