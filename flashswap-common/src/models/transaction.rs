use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// Gas limit used for every state mutating call unless configured otherwise.
pub const DEFAULT_GAS_LIMIT: u64 = 9_000_000;

/// Gas price in wei (60 gwei) used for every state mutating call unless configured otherwise.
pub const DEFAULT_GAS_PRICE: u128 = 60_000_000_000;

/// An account the node can sign transactions for.
///
/// The harness never holds key material: transactions are submitted with `eth_sendTransaction`
/// and signed by the node, which must have this account unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signer {
    address: Address,
}

impl Signer {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

/// Transaction parameters fixed for a whole run instead of being estimated from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOverrides {
    pub gas_limit: u64,
    pub gas_price: u128,
}

impl TransactionOverrides {
    pub fn new(gas_limit: u64, gas_price: u128) -> Self {
        Self { gas_limit, gas_price }
    }
}

impl Default for TransactionOverrides {
    fn default() -> Self {
        Self { gas_limit: DEFAULT_GAS_LIMIT, gas_price: DEFAULT_GAS_PRICE }
    }
}

/// Outcome of a transaction once it was included in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub success: bool,
    /// Address of the created contract for deployment transactions.
    pub contract_address: Option<Address>,
}
