//! Prepares and issues the flash swap call for a scenario.

use std::sync::Arc;

use alloy_primitives::Bytes;
use tracing::{debug, info, instrument};

use crate::{
    funding::{FeeCoverageGuarantor, FundingOutcome},
    models::{
        amount::{format_units, parse_units},
        asset::Asset,
        scenario::Scenario,
        transaction::{Signer, TransactionOverrides, TransactionReceipt},
        Amount,
    },
    registry::AssetRegistry,
    traits::{AssetClient, FlashSwapCall, FlashSwapContract},
    ClientError, HarnessError,
};

/// Opaque payload forwarded to the contract's swap callback.
const USER_DATA: [u8; 1] = [0x00];

/// Everything that happened while running one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSwapReport {
    pub borrow_amount: Amount,
    pub fee_cushion: Amount,
    pub funding: FundingOutcome,
    pub receipt: TransactionReceipt,
}

pub struct FlashSwapInvoker {
    registry: Arc<AssetRegistry>,
    client: Arc<dyn AssetClient>,
    guarantor: FeeCoverageGuarantor,
    overrides: TransactionOverrides,
}

impl FlashSwapInvoker {
    pub fn new(
        registry: Arc<AssetRegistry>,
        client: Arc<dyn AssetClient>,
        overrides: TransactionOverrides,
    ) -> Self {
        let guarantor = FeeCoverageGuarantor::new(client.clone(), overrides);
        Self { registry, client, guarantor, overrides }
    }

    /// Runs a scenario against `contract`: converts the amounts to base units, makes sure the
    /// contract can pay the fee and submits the flash swap signed by `signer`.
    ///
    /// `signer` is both the funding account and the sender of the flash swap. A revert is
    /// reported as [`HarnessError::FlashSwapExecution`] and never retried.
    #[instrument(skip_all, fields(scenario = %scenario.name, contract = %contract.address()))]
    pub async fn invoke(
        &self,
        contract: &dyn FlashSwapContract,
        scenario: &Scenario,
        signer: &Signer,
    ) -> Result<FlashSwapReport, HarnessError> {
        let borrow_asset = self
            .registry
            .resolve(&scenario.borrow_asset)?;
        let pay_asset = self
            .registry
            .resolve(&scenario.pay_asset)?;

        let borrow_decimals = self.decimals(&borrow_asset).await?;
        let borrow_amount = parse_units(&scenario.borrow_amount, borrow_decimals)?;
        let fee_cushion = parse_units(&scenario.fee_cushion, self.decimals(&pay_asset).await?)?;
        debug!(%borrow_amount, %fee_cushion, "Converted scenario amounts to base units");

        let funding = self
            .guarantor
            .ensure_min_balance(&pay_asset, contract.address(), signer, &fee_cushion)
            .await?;

        let call = FlashSwapCall {
            borrow_asset: borrow_asset.address,
            amount: borrow_amount.clone(),
            pay_asset: pay_asset.address,
            user_data: Bytes::from_static(&USER_DATA),
        };
        info!(
            borrow = %borrow_asset,
            pay = %pay_asset,
            amount = %format_units(&call.amount, borrow_decimals),
            "Performing flash swap"
        );
        let receipt = contract
            .flash_swap(signer, &call, &self.overrides)
            .await
            .map_err(|e| match e {
                ClientError::Reverted(reason) => HarnessError::FlashSwapExecution(reason),
                other => other.into(),
            })?;
        if !receipt.success {
            return Err(HarnessError::FlashSwapExecution(format!(
                "transaction {} mined with failed status",
                receipt.transaction_hash
            )));
        }

        info!(
            tx_hash = %receipt.transaction_hash,
            gas_used = receipt.gas_used,
            "Flash swap succeeded"
        );
        Ok(FlashSwapReport { borrow_amount, fee_cushion, funding, receipt })
    }

    async fn decimals(&self, asset: &Asset) -> Result<u32, HarnessError> {
        match asset.decimals {
            Some(decimals) => Ok(decimals),
            None => Ok(self.client.decimals_of(asset).await?),
        }
    }
}
