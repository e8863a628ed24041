use std::path::Path;

use anyhow::{Context, Result};
use risk_calculator::MarketSnapshot;
use tracing::info;

/// Reads a market snapshot from a JSON file and checks its figures
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a valid snapshot, or
/// carries a negative amount
pub fn load_snapshot(path: &Path) -> Result<MarketSnapshot> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read snapshot file {}", path.display()))?;

    let snapshot = parse_snapshot(&content)
        .context(format!("Invalid snapshot in {}", path.display()))?;

    info!(
        "Loaded snapshot with {} reserves ({} account)",
        snapshot.reserves.len(),
        if snapshot.user.is_some() { "with" } else { "without" }
    );

    Ok(snapshot)
}

pub fn parse_snapshot(content: &str) -> Result<MarketSnapshot> {
    let snapshot: MarketSnapshot =
        serde_json::from_str(content).context("Failed to parse snapshot JSON")?;
    snapshot.validate().context("Snapshot failed validation")?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/snapshot.json")
    }

    #[test]
    fn test_load_fixture() {
        let snapshot = load_snapshot(&fixture()).unwrap();

        assert_eq!(snapshot.reserves.len(), 3);
        assert!(snapshot.user.is_some());
        assert_eq!(snapshot.market.wrapped_base_asset_symbol, "WETH");
    }

    #[test]
    fn test_fixture_previews() {
        use risk_calculator::{
            constants::NATIVE_ASSET_ADDRESS, preview_supply, AssetAdvisory, BlockingError,
            RiskSettings, SupplyRequest,
        };
        use rust_decimal_macros::dec;

        let snapshot = load_snapshot(&fixture()).unwrap();
        let settings = RiskSettings::default();

        let request = SupplyRequest::new(NATIVE_ASSET_ADDRESS, "1").unwrap();
        let eth = preview_supply(&snapshot, &request, &settings).unwrap();

        assert_eq!(eth.symbol, "ETH");
        assert_eq!(eth.max_amount_to_supply, dec!(3.499));
        assert_eq!(eth.amount_in_usd, Some(dec!(3000)));
        assert_eq!(eth.health_factor_after, Some(dec!(2.26875)));
        assert!(eth.used_as_collateral);
        assert!(eth.show_health_factor);
        assert!(!eth.is_blocked());

        let aave_address = snapshot.reserves[2].underlying_asset;
        let request = SupplyRequest::new(aave_address, "50").unwrap();
        let aave = preview_supply(&snapshot, &request, &settings).unwrap();

        assert_eq!(aave.blocking_error, Some(BlockingError::NotEnoughBalance));
        assert_eq!(aave.warnings.advisories, vec![AssetAdvisory::StakingAvailable]);
        // WETH is already collateral, so no isolation switch
        assert!(!aave.warnings.entering_isolation_mode);
        assert_eq!(aave.health_factor_after, Some(dec!(2.0625)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_snapshot(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot file"));
    }

    #[test]
    fn test_negative_figure_rejected() {
        let content = std::fs::read_to_string(fixture())
            .unwrap()
            .replace("\"totalLiquidity\": \"940\"", "\"totalLiquidity\": \"-940\"");

        let err = parse_snapshot(&content).unwrap_err();
        assert_eq!(err.to_string(), "Snapshot failed validation");
    }
}
