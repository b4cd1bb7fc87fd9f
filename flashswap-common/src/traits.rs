use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::{
    models::{
        asset::Asset,
        transaction::{Signer, TransactionOverrides, TransactionReceipt},
        Amount,
    },
    ClientError,
};

/// Balance, transfer and metadata access for every asset kind the harness supports.
///
/// Implementations dispatch on [`Asset::kind`] so callers never need to care whether they move
/// the native asset or a token.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait AssetClient: Send + Sync {
    /// Returns the balance of `account` in base units at the latest block.
    async fn balance_of(&self, asset: &Asset, account: Address) -> Result<Amount, ClientError>;

    /// Moves `amount` base units of `asset` from `from` to `to`.
    ///
    /// Must only return once the transaction is included in a block, so that subsequent balance
    /// reads observe its effect. A transaction mined with a failed status is reported as
    /// [`ClientError::Reverted`].
    async fn transfer(
        &self,
        asset: &Asset,
        from: &Signer,
        to: Address,
        amount: &Amount,
        overrides: &TransactionOverrides,
    ) -> Result<TransactionReceipt, ClientError>;

    /// Returns the precision of `asset`: 18 for the native asset, otherwise the value declared
    /// by the token contract.
    async fn decimals_of(&self, asset: &Asset) -> Result<u32, ClientError>;
}

/// Arguments of the contract's `flashSwap` entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSwapCall {
    pub borrow_asset: Address,
    pub amount: Amount,
    pub pay_asset: Address,
    pub user_data: Bytes,
}

/// The deployed contract under test.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait FlashSwapContract: Send + Sync {
    fn address(&self) -> Address;

    /// Submits the borrow/repay call and waits for its inclusion. Reverts are reported as
    /// [`ClientError::Reverted`] with the decoded reason.
    async fn flash_swap(
        &self,
        sender: &Signer,
        call: &FlashSwapCall,
        overrides: &TransactionOverrides,
    ) -> Result<TransactionReceipt, ClientError>;
}
