use anyhow::{Context, Result};
use risk_calculator::{preview_supply, summarize_reserve_actions, SupplyPreview, SupplyRequest};
use supply_preview::{
    config::LocalConfig,
    utils::{self, snapshot::load_snapshot},
};
use tracing::{error, info, warn};

/// Main entry point of the supply preview
///
/// This function performs the following steps:
/// 1. Initializes the pre-run environment
/// 2. Loads the configuration and the market snapshot
/// 3. Computes the supply preview and the reserve summary
/// 4. Prints both as JSON on stdout
fn main() -> Result<()> {
    init_pre_run()?;

    info!("Starting the supply preview");

    let local_config = LocalConfig::load_from_env()?;

    if let Err(e) = run(&local_config) {
        let error_message = e
            .chain()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        error!("Supply preview failed with error: {}", error_message);
        return Err(anyhow::anyhow!("Supply preview failed: {}", error_message));
    }

    Ok(())
}

/// Initializes the pre-run environment
///
/// This function performs the following steps:
/// 1. Loads environment variables from the `.env` file, if there is one
/// 2. Sets up the logger
fn init_pre_run() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::logger::setup_logger().context("Failed to setup logger")?;
    Ok(())
}

fn run(local_config: &LocalConfig) -> Result<()> {
    let snapshot = load_snapshot(&local_config.snapshot_path)?;

    let request = SupplyRequest::new(local_config.underlying_asset, &local_config.supply_amount)
        .context("Invalid SUPPLY_AMOUNT")?;

    let preview = preview_supply(&snapshot, &request, &local_config.risk_settings())
        .context("Failed to compute the supply preview")?;
    log_preview(&preview);

    let reserve_summary = summarize_reserve_actions(&snapshot, preview.reserve_underlying_asset)
        .context("Failed to summarize the reserve")?;

    let output = serde_json::json!({
        "supply": preview,
        "reserve": reserve_summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn log_preview(preview: &SupplyPreview) {
    info!(
        "Supplying {} {} ({:?} USD), health factor {:?} -> {:?}",
        preview.amount_to_supply,
        preview.symbol,
        preview.amount_in_usd,
        preview.health_factor,
        preview.health_factor_after
    );

    if let Some(blocking_error) = preview.blocking_error {
        warn!("Supply of {} is blocked: {}", preview.symbol, blocking_error);
    }

    if preview.warnings.supply_cap_nearly_reached {
        warn!("{} supply cap is nearly reached", preview.symbol);
    }

    if preview.warnings.entering_isolation_mode {
        warn!("Supplying {} enters isolation mode", preview.symbol);
    }

    for advisory in &preview.warnings.advisories {
        info!("{}: {}", preview.symbol, advisory.message());
    }
}
