//! Health-factor projection and action gating for supplying to a lending pool.
//!
//! Everything here is a pure function of a [`MarketSnapshot`]: the caller
//! captures reserves, the user account and wallet balances, and re-invokes
//! [`preview_supply`] whenever any of them or the typed amount changes.

pub mod borrow;
pub mod constants;
pub mod errors;
pub mod health_factor;
pub mod market;
pub mod math_helper;
pub mod models;
pub mod reserve_overview;
pub mod supply;

pub use errors::{Result, RiskError};
pub use health_factor::{HealthFactorStatus, RiskSettings};
pub use market::{MarketConfig, MarketSnapshot, SupplyTarget};
pub use models::{Reserve, UserAccountSnapshot, UserReservePosition, WalletBalances};
pub use reserve_overview::{summarize_reserve_actions, ReserveActionsSummary};
pub use supply::{
    preview_supply, AssetAdvisory, BlockingError, SupplyAmount, SupplyPreview, SupplyRequest,
    SupplyWarnings,
};
