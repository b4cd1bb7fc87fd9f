use std::{error::Error, fmt::Display};

use alloy::{
    primitives::Bytes,
    rpc::json_rpc::ErrorPayload,
    sol_types::{Panic, Revert, SolError},
    transports::{RpcError as AlloyRpcError, TransportErrorKind},
};
use flashswap_common::ClientError;
use thiserror::Error;

/// Alloy RPC error type alias for convenience.
pub(crate) type AlloyError = AlloyRpcError<TransportErrorKind>;

#[derive(Error, Debug)]
pub struct ReqwestError {
    pub msg: String,
    #[source]
    pub source: AlloyError,
}

impl Display for ReqwestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.msg, self.source)
    }
}

#[derive(Error, Debug)]
pub enum RequestError {
    Reqwest(ReqwestError),
}

impl Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Reqwest(e) => write!(f, "{}: {}", e.msg, e.source),
        }
    }
}

#[derive(Error, Debug)]
pub enum RPCError {
    #[error("RPC setup error: {0}")]
    SetupError(String),
    #[error("Request error: {0}")]
    RequestError(RequestError),
    #[error("Execution reverted: {0}")]
    Reverted(String),
    #[error("Encode error: {0}")]
    EncodeError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl RPCError {
    pub(crate) fn from_alloy<S: ToString>(msg: S, error: AlloyError) -> Self {
        RPCError::RequestError(RequestError::Reqwest(ReqwestError {
            msg: msg.to_string(),
            source: error,
        }))
    }

    /// Like [`RPCError::from_alloy`], but error responses from the node are treated as a
    /// rejected execution and turned into [`RPCError::Reverted`].
    pub(crate) fn from_execution<S: ToString>(msg: S, error: AlloyError) -> Self {
        match error {
            AlloyRpcError::ErrorResp(payload) => RPCError::Reverted(revert_reason(&payload)),
            other => RPCError::from_alloy(msg, other),
        }
    }
}

impl From<RPCError> for ClientError {
    fn from(value: RPCError) -> Self {
        match value {
            RPCError::Reverted(reason) => ClientError::Reverted(reason),
            RPCError::DecodeError(msg) | RPCError::EncodeError(msg) => ClientError::Decode(msg),
            other => ClientError::Network(extract_error_chain(&other)),
        }
    }
}

/// Extension trait for adding RPC context to Results containing Alloy errors.
///
/// Similar to `anyhow::Context`, this trait provides ergonomic error wrapping
/// that converts Alloy RPC errors into `RPCError` with contextual messages.
pub(crate) trait RpcResultExt<T> {
    /// Wraps the error with context, converting it to an `RPCError`.
    fn rpc_context<C: Display>(self, context: C) -> Result<T, RPCError>;

    /// Wraps the error with lazily-evaluated context.
    fn with_rpc_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T, RPCError>;
}

impl<T> RpcResultExt<T> for Result<T, AlloyError> {
    fn rpc_context<C: Display>(self, context: C) -> Result<T, RPCError> {
        self.map_err(|e| RPCError::from_alloy(context.to_string(), e))
    }

    fn with_rpc_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T, RPCError> {
        self.map_err(|e| RPCError::from_alloy(f().to_string(), e))
    }
}

/// Extracts a human readable revert reason from a JSON-RPC error response.
///
/// Standard `Error(string)` and `Panic(uint256)` payloads are decoded; anything else falls back
/// to the node's error message.
pub(crate) fn revert_reason(payload: &ErrorPayload) -> String {
    match payload.try_data_as::<Bytes>() {
        Some(Ok(data)) => decode_revert_data(&data).unwrap_or_else(|| payload.message.to_string()),
        _ => payload.message.to_string(),
    }
}

/// Decodes revert data returned by a failed call. Returns `None` for empty data.
pub(crate) fn decode_revert_data(data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(revert.reason);
    }
    if let Ok(panic) = Panic::abi_decode(data) {
        return Some(format!("panic code {:#x}", panic.code));
    }
    Some(format!("custom error {}", Bytes::copy_from_slice(data)))
}

/// Helper function to extract the full error chain including source errors
pub(crate) fn extract_error_chain(error: &dyn Error) -> String {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();

    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }

    if chain.len() == 1 {
        chain[0].clone()
    } else {
        format!("{} (caused by: {})", chain[0], chain[1..].join(" -> "))
    }
}
