//! Common test fixtures and utilities for flashswap-ethereum tests
//!
//! Tests run against a mockito server that answers JSON-RPC requests by method name.

use std::time::Duration;

use mockito::{Matcher, ServerGuard};
use serde_json::{json, Value};

use crate::rpc::EthereumRpcClient;

// Addresses of a fresh hardhat node: first default account and first deployed contract
pub const SIGNER_STR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const CONTRACT_STR: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const DAI_STR: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

pub const TX_HASH: &str = "0x9f8e9bd1e3f43b4ed1f2a6c3b0a9bb6f5f5d73f8d2d9b0f1c8fa4c3e2a1b0c0d";

/// A JSON-RPC success envelope around `result`.
pub fn rpc_result(result: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": 0, "result": result})
}

/// A mined receipt for [`TX_HASH`] in block 17.
pub fn receipt_json(success: bool, contract_address: Option<&str>) -> Value {
    json!({
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0x0b4e2e9d1b6c5f0f8c1d8f1d2d0e5b5a6b4c3d2e1f0a9b8c7d6e5f4a3b2c1d0e",
        "blockNumber": "0x11",
        "from": SIGNER_STR,
        "to": if contract_address.is_some() { Value::Null } else { json!(CONTRACT_STR) },
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "contractAddress": contract_address,
        "logs": [],
        "status": if success { "0x1" } else { "0x0" },
    })
}

/// A mockito server standing in for an Ethereum node.
pub struct MockNode {
    pub server: ServerGuard,
}

impl MockNode {
    pub async fn new() -> Self {
        Self { server: mockito::Server::new_async().await }
    }

    /// Answers every request for `method` with `body`.
    pub async fn respond(&mut self, method: &str, body: Value) {
        self.server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;
    }

    /// Answers `eth_call` requests whose calldata starts with `selector` (hex, no prefix).
    pub async fn respond_to_call(&mut self, selector: &str, body: Value) {
        self.server
            .mock("POST", "/")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({ "method": "eth_call" })),
                Matcher::Regex(format!(r#""input":"0x{selector}"#)),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;
    }

    pub fn client(&self) -> EthereumRpcClient {
        EthereumRpcClient::new(&self.server.url())
            .expect("Failed to create client")
            .with_receipt_poll_interval(Duration::from_millis(1))
    }
}
