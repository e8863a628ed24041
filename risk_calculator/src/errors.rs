use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised before or during a risk computation.
///
/// Every variant is local to the request that caused it: the caller blocks
/// the action and shows the message, nothing else is affected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("Invalid amount `{0}`: expected a non-negative decimal number")]
    InvalidAmount(String),

    #[error("Negative value for {field}: {value}")]
    NegativeValue { field: String, value: Decimal },

    #[error("Value {value} with {decimals} decimals does not fit a decimal")]
    UnrepresentableUnits { value: U256, decimals: u8 },

    #[error("No reserve found for asset {0}")]
    ReserveNotFound(Address),

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, RiskError>;
