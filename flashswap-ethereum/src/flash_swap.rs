//! Binding for the flash swap contract under test.
//!
//! The contract borrows `_amount` of `_tokenBorrow` from a liquidity pool and repays it in
//! `_tokenPay` inside the swap callback, paying the pool fee out of its own balance.

use alloy::{
    core::sol,
    primitives::{Address, Bytes, TxKind, U256},
    rpc::types::{TransactionInput, TransactionRequest},
    sol_types::SolCall,
};
use async_trait::async_trait;
use flashswap_common::{
    models::transaction::{Signer, TransactionOverrides, TransactionReceipt},
    traits::{FlashSwapCall, FlashSwapContract},
    ClientError,
};
use tracing::{info, instrument};

use crate::{rpc::EthereumRpcClient, BigUintCodec, RPCError};

sol! {
    function flashSwap(
        address _tokenBorrow,
        uint256 _amount,
        address _tokenPay,
        bytes _userData
    ) external;
}

/// Encode flashSwap(address,uint256,address,bytes) call
pub fn encode_flash_swap(call: &FlashSwapCall) -> Result<Vec<u8>, RPCError> {
    Ok(flashSwapCall {
        _tokenBorrow: call.borrow_asset,
        _amount: U256::try_from_biguint(&call.amount)?,
        _tokenPay: call.pay_asset,
        _userData: call.user_data.clone(),
    }
    .abi_encode())
}

#[derive(Clone, Debug)]
pub struct EvmFlashSwapContract {
    rpc: EthereumRpcClient,
    address: Address,
}

impl EvmFlashSwapContract {
    /// Binds to a contract that is already deployed at `address`.
    pub fn attach(rpc: EthereumRpcClient, address: Address) -> Self {
        Self { rpc, address }
    }

    /// Deploys the contract from its creation bytecode, with the ABI encoded `constructor_args`
    /// appended, and binds to the created address.
    #[instrument(skip_all, fields(deployer = %deployer.address()))]
    pub async fn deploy(
        rpc: EthereumRpcClient,
        deployer: &Signer,
        bytecode: &Bytes,
        constructor_args: &Bytes,
        overrides: &TransactionOverrides,
    ) -> Result<Self, RPCError> {
        let init_code: Bytes = [bytecode.as_ref(), constructor_args.as_ref()]
            .concat()
            .into();
        let request = TransactionRequest {
            from: Some(deployer.address()),
            to: None,
            gas: Some(overrides.gas_limit),
            gas_price: Some(overrides.gas_price),
            input: TransactionInput::new(init_code),
            ..Default::default()
        };

        let receipt = rpc
            .send_transaction_and_wait(&request)
            .await?;
        let address = receipt.contract_address.ok_or_else(|| {
            RPCError::DecodeError(format!(
                "Deployment receipt {} carries no contract address",
                receipt.transaction_hash
            ))
        })?;
        info!(%address, tx_hash = %receipt.transaction_hash, "Deployed flash swap contract");

        Ok(Self::attach(rpc, address))
    }
}

#[async_trait]
impl FlashSwapContract for EvmFlashSwapContract {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(contract = %self.address, amount = %call.amount)
    )]
    async fn flash_swap(
        &self,
        sender: &Signer,
        call: &FlashSwapCall,
        overrides: &TransactionOverrides,
    ) -> Result<TransactionReceipt, ClientError> {
        let request = TransactionRequest {
            from: Some(sender.address()),
            to: Some(TxKind::Call(self.address)),
            gas: Some(overrides.gas_limit),
            gas_price: Some(overrides.gas_price),
            input: TransactionInput::new(encode_flash_swap(call)?.into()),
            ..Default::default()
        };
        Ok(self
            .rpc
            .send_transaction_and_wait(&request)
            .await?)
    }
}
