use std::time::Duration;

use alloy::{
    primitives::{Address, Bytes, TxHash, U256, U64},
    rpc::{
        client::{ClientBuilder, ReqwestClient},
        types::{BlockNumberOrTag, TransactionRequest},
    },
    transports::http::reqwest,
};
use flashswap_common::models::transaction::TransactionReceipt;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

use crate::{errors::RpcResultExt, RPCError};

/// Interval between two `eth_getTransactionReceipt` polls unless configured otherwise.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Receipt fields the harness relies on. Kept minimal so that receipts from dev nodes that omit
/// optional fields still deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcReceipt {
    transaction_hash: TxHash,
    block_number: Option<U64>,
    gas_used: U64,
    /// Missing on pre-Byzantium receipts, which carry a state root instead.
    status: Option<U64>,
    contract_address: Option<Address>,
}

impl From<RpcReceipt> for TransactionReceipt {
    fn from(value: RpcReceipt) -> Self {
        TransactionReceipt {
            transaction_hash: value.transaction_hash,
            block_number: value
                .block_number
                .map(|n| n.to::<u64>())
                .unwrap_or_default(),
            gas_used: value.gas_used.to::<u64>(),
            success: value
                .status
                .map_or(true, |status| status == U64::from(1)),
            contract_address: value.contract_address,
        }
    }
}

/// This struct wraps the ReqwestClient and provides the Ethereum RPC methods the harness needs.
///
/// Transactions are submitted through `eth_sendTransaction`, so the sending account has to be
/// unlocked on the node. Requests are never retried: a failing call fails the scenario.
/// It is cheap to clone, as the `inner` internally uses an Arc for the ReqwestClient.
#[derive(Clone, Debug)]
pub struct EthereumRpcClient {
    inner: ReqwestClient,
    receipt_poll_interval: Duration,
}

impl EthereumRpcClient {
    /// Creates a new EthereumRpcClient with the given RPC URL, polling for receipts every
    /// [`DEFAULT_RECEIPT_POLL_INTERVAL`].
    pub fn new(rpc_url: &str) -> Result<Self, RPCError> {
        let url = rpc_url
            .parse()
            .map_err(|e| RPCError::SetupError(format!("Invalid RPC URL: {}", e)))?;

        let http_client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| RPCError::SetupError(format!("Failed to create HTTP client: {e}")))?;

        let rpc = ClientBuilder::default().http_with_client(http_client, url);

        Ok(Self {
            inner: rpc,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        })
    }

    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }

    #[instrument(level = "debug", skip(self))]
    pub(crate) async fn eth_get_balance(
        &self,
        block_id: BlockNumberOrTag,
        address: Address,
    ) -> Result<U256, RPCError> {
        self.inner
            .request("eth_getBalance", (address, block_id))
            .await
            .with_rpc_context(|| {
                format!("Failed to get balance for address {address}, block {block_id}")
            })
    }

    /// Executes a read-only call.
    /// See https://ethereum.org/en/developers/docs/apis/json-rpc/#eth_call
    ///
    /// Returns the output data from the call. A reverting call is reported as
    /// [`RPCError::Reverted`].
    #[instrument(level = "debug", skip(self, request))]
    pub(crate) async fn eth_call(
        &self,
        request: &TransactionRequest,
        block: BlockNumberOrTag,
    ) -> Result<Bytes, RPCError> {
        self.inner
            .request("eth_call", (request, block))
            .await
            .map_err(|e| {
                RPCError::from_execution(
                    format!("Failed to send an eth_call request for block {block}"),
                    e,
                )
            })
    }

    #[instrument(level = "debug", skip(self, request))]
    pub(crate) async fn eth_send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, RPCError> {
        self.inner
            .request("eth_sendTransaction", (request,))
            .await
            .map_err(|e| RPCError::from_execution("Failed to send transaction", e))
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) async fn eth_get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<Option<RpcReceipt>, RPCError> {
        self.inner
            .request("eth_getTransactionReceipt", (tx_hash,))
            .await
            .rpc_context(format!("Failed to get receipt for transaction {tx_hash}"))
    }

    /// Polls until the transaction is included in a block. There is no timeout: a transaction
    /// that never gets mined blocks the caller.
    pub(crate) async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<RpcReceipt, RPCError> {
        loop {
            match self
                .eth_get_transaction_receipt(tx_hash)
                .await?
            {
                Some(receipt) if receipt.block_number.is_some() => return Ok(receipt),
                _ => {
                    trace!(%tx_hash, "Transaction not mined yet");
                    tokio::time::sleep(self.receipt_poll_interval).await;
                }
            }
        }
    }

    /// Submits a transaction and waits for it to be mined.
    ///
    /// A transaction mined with a failed status is turned into [`RPCError::Reverted`]. The reason
    /// is recovered by replaying the request with `eth_call` on the parent block state.
    #[instrument(level = "debug", skip_all, fields(from = ?request.from, to = ?request.to))]
    pub async fn send_transaction_and_wait(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransactionReceipt, RPCError> {
        let tx_hash = self
            .eth_send_transaction(request)
            .await?;
        debug!(%tx_hash, "Transaction submitted, waiting for inclusion");

        let receipt: TransactionReceipt = self
            .wait_for_receipt(tx_hash)
            .await?
            .into();
        if receipt.success {
            return Ok(receipt);
        }

        warn!(%tx_hash, block = receipt.block_number, "Transaction mined with failed status");
        let parent = BlockNumberOrTag::Number(receipt.block_number.saturating_sub(1));
        let reason = match self.eth_call(request, parent).await {
            Err(RPCError::Reverted(reason)) => reason,
            Ok(_) => format!("transaction {tx_hash} mined with failed status"),
            Err(e) => return Err(e),
        };
        Err(RPCError::Reverted(reason))
    }
}
