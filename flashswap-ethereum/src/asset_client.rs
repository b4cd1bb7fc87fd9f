use alloy::{
    primitives::{Address, TxKind, U256},
    rpc::types::{BlockNumberOrTag, TransactionInput, TransactionRequest},
};
use async_trait::async_trait;
use flashswap_common::{
    models::{
        asset::{Asset, NATIVE_DECIMALS},
        transaction::{Signer, TransactionOverrides, TransactionReceipt},
    },
    traits::AssetClient,
    Amount, ClientError,
};
use tracing::{debug, instrument};

use crate::{
    erc20::{
        decode_balance_of, decode_decimals, encode_balance_of, encode_decimals, encode_transfer,
    },
    rpc::EthereumRpcClient,
    BigUintCodec,
};

/// [`AssetClient`] talking to an EVM node.
///
/// The native asset is read with `eth_getBalance` and moved with a plain value transfer; every
/// other asset goes through its ERC-20 contract.
#[derive(Clone, Debug)]
pub struct EvmAssetClient {
    rpc: EthereumRpcClient,
}

impl EvmAssetClient {
    pub fn new(rpc: EthereumRpcClient) -> Self {
        Self { rpc }
    }

    fn transfer_request(
        asset: &Asset,
        from: &Signer,
        to: Address,
        amount: U256,
        overrides: &TransactionOverrides,
    ) -> TransactionRequest {
        let request = TransactionRequest {
            from: Some(from.address()),
            gas: Some(overrides.gas_limit),
            gas_price: Some(overrides.gas_price),
            ..Default::default()
        };
        if asset.is_native() {
            TransactionRequest { to: Some(TxKind::Call(to)), value: Some(amount), ..request }
        } else {
            TransactionRequest {
                to: Some(TxKind::Call(asset.address)),
                input: TransactionInput::new(encode_transfer(to, amount).into()),
                ..request
            }
        }
    }

    async fn call(&self, token: Address, calldata: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(token)),
            input: TransactionInput::new(calldata.into()),
            ..Default::default()
        };
        Ok(self
            .rpc
            .eth_call(&request, BlockNumberOrTag::Latest)
            .await?
            .to_vec())
    }
}

#[async_trait]
impl AssetClient for EvmAssetClient {
    #[instrument(level = "debug", skip(self), fields(asset = %asset))]
    async fn balance_of(&self, asset: &Asset, owner: Address) -> Result<Amount, ClientError> {
        let balance = if asset.is_native() {
            self.rpc
                .eth_get_balance(BlockNumberOrTag::Latest, owner)
                .await?
        } else {
            let output = self
                .call(asset.address, encode_balance_of(owner))
                .await?;
            decode_balance_of(&output)?
        };
        debug!(%balance, "Fetched balance");
        Ok(balance.to_biguint())
    }

    #[instrument(
        level = "debug",
        skip(self, overrides),
        fields(asset = %asset, from = %from.address(), amount = %amount)
    )]
    async fn transfer(
        &self,
        asset: &Asset,
        from: &Signer,
        to: Address,
        amount: &Amount,
        overrides: &TransactionOverrides,
    ) -> Result<TransactionReceipt, ClientError> {
        let value = U256::try_from_biguint(amount)?;
        let request = Self::transfer_request(asset, from, to, value, overrides);
        Ok(self
            .rpc
            .send_transaction_and_wait(&request)
            .await?)
    }

    #[instrument(level = "debug", skip(self), fields(asset = %asset))]
    async fn decimals_of(&self, asset: &Asset) -> Result<u32, ClientError> {
        if asset.is_native() {
            return Ok(NATIVE_DECIMALS);
        }
        let output = self
            .call(asset.address, encode_decimals())
            .await?;
        Ok(decode_decimals(&output)?.into())
    }
}
