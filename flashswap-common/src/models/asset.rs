use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Address reserved for the chain's native asset. No token contract lives there.
pub const NATIVE_ASSET_ADDRESS: Address = Address::ZERO;

/// Precision of the native asset (wei per ether).
pub const NATIVE_DECIMALS: u32 = 18;

/// Largest precision an ERC-20 token can declare, `decimals()` returns a `uint8`.
pub const MAX_DECIMALS: u32 = u8::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    /// The ledger's intrinsic unit of value, moved with value transfers.
    Native,
    /// A contract-issued fungible token following EIP-20.
    Erc20,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub address: Address,
    pub kind: AssetKind,
    /// Statically known precision. `None` means it has to be read from the token contract.
    pub decimals: Option<u32>,
}

impl Asset {
    pub fn native(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            address: NATIVE_ASSET_ADDRESS,
            kind: AssetKind::Native,
            decimals: Some(NATIVE_DECIMALS),
        }
    }

    pub fn erc20(symbol: &str, address: Address, decimals: Option<u32>) -> Self {
        Self { symbol: symbol.to_string(), address, kind: AssetKind::Erc20, decimals }
    }

    pub fn is_native(&self) -> bool {
        self.kind == AssetKind::Native
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.symbol, self.address)
    }
}
