use std::path::PathBuf;

use alloy::primitives::Address;
use anyhow::Result;
use risk_calculator::{constants::DEFAULT_AT_RISK_HEALTH_FACTOR, RiskSettings};
use rust_decimal::Decimal;

use super::env_helper::{load_env_var, load_env_var_or};

#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// JSON file holding the captured market snapshot
    pub snapshot_path: PathBuf,
    pub underlying_asset: Address,
    /// Raw form input; `-1` supplies the maximum
    pub supply_amount: String,
    pub at_risk_health_factor: Decimal,
}

impl LocalConfig {
    pub fn load_from_env() -> Result<Self> {
        Ok(Self {
            snapshot_path: load_env_var("SNAPSHOT_PATH")?,
            underlying_asset: load_env_var("UNDERLYING_ASSET")?,
            supply_amount: load_env_var_or("SUPPLY_AMOUNT", String::new())?,
            at_risk_health_factor: load_env_var_or(
                "AT_RISK_HEALTH_FACTOR",
                DEFAULT_AT_RISK_HEALTH_FACTOR,
            )?,
        })
    }

    pub fn risk_settings(&self) -> RiskSettings {
        RiskSettings {
            at_risk_health_factor: self.at_risk_health_factor,
        }
    }
}
