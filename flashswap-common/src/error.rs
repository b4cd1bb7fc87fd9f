use thiserror::Error;

use crate::models::Amount;

/// Errors returned by chain clients (`AssetClient`, `FlashSwapContract`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport or connection failure while talking to the node.
    #[error("Network error: {0}")]
    Network(String),
    /// The transaction was rejected or mined with a failed status. Carries the revert reason.
    #[error("Transaction reverted: {0}")]
    Reverted(String),
    /// The node answered with data we could not interpret.
    #[error("Decoding error: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unknown asset symbol: {0}")]
    UnknownAsset(String),
    #[error("Invalid amount '{value}' for {decimals} decimals: {reason}")]
    InvalidAmount { value: String, decimals: u32, reason: String },
    #[error(
        "Insufficient funding for {symbol}: required {required} base units, \
         funding account holds {available}"
    )]
    InsufficientFunding { symbol: String, required: Amount, available: Amount },
    #[error(
        "Top-up of {symbol} not reflected on-chain: required {required}, target holds {actual}"
    )]
    FundingNotVerified { symbol: String, required: Amount, actual: Amount },
    #[error("Transfer of {symbol} failed: {reason}")]
    TransferFailed { symbol: String, reason: String },
    #[error("Flash swap execution failed: {0}")]
    FlashSwapExecution(String),
    #[error(transparent)]
    Network(ClientError),
}

impl From<ClientError> for HarnessError {
    fn from(value: ClientError) -> Self {
        HarnessError::Network(value)
    }
}
