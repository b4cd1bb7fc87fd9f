//! Makes sure an account holds a minimum balance of an asset before it is needed.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{debug, info, instrument, warn};

use crate::{
    models::{
        asset::Asset,
        transaction::{Signer, TransactionOverrides, TransactionReceipt},
        Amount,
    },
    traits::AssetClient,
    ClientError, HarnessError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingOutcome {
    /// The target already held enough; nothing was submitted.
    AlreadyCovered { balance: Amount },
    /// A transfer from the funding account was mined and the new balance verified.
    ToppedUp { receipt: TransactionReceipt, balance: Amount },
}

impl FundingOutcome {
    pub fn balance(&self) -> &Amount {
        match self {
            FundingOutcome::AlreadyCovered { balance } => balance,
            FundingOutcome::ToppedUp { balance, .. } => balance,
        }
    }
}

/// Tops up accounts from a funding signer when they fall short of a required balance.
#[derive(Clone)]
pub struct FeeCoverageGuarantor {
    client: Arc<dyn AssetClient>,
    overrides: TransactionOverrides,
}

impl FeeCoverageGuarantor {
    pub fn new(client: Arc<dyn AssetClient>, overrides: TransactionOverrides) -> Self {
        Self { client, overrides }
    }

    /// Ensures `target` holds at least `min_balance` of `asset`.
    ///
    /// If the target is short, exactly `min_balance` is transferred from `funder`. Fails without
    /// submitting anything if the funder itself holds less than `min_balance`. After a transfer
    /// the target balance is read again and must satisfy the minimum.
    #[instrument(skip_all, fields(symbol = %asset.symbol, %target, required = %min_balance))]
    pub async fn ensure_min_balance(
        &self,
        asset: &Asset,
        target: Address,
        funder: &Signer,
        min_balance: &Amount,
    ) -> Result<FundingOutcome, HarnessError> {
        let balance = self
            .client
            .balance_of(asset, target)
            .await?;
        if balance >= *min_balance {
            debug!(%balance, "Target already covers the required balance");
            return Ok(FundingOutcome::AlreadyCovered { balance });
        }

        let available = self
            .client
            .balance_of(asset, funder.address())
            .await?;
        if available < *min_balance {
            warn!(
                funder = %funder.address(),
                %available,
                "Funding account cannot cover the shortfall"
            );
            return Err(HarnessError::InsufficientFunding {
                symbol: asset.symbol.clone(),
                required: min_balance.clone(),
                available,
            });
        }

        info!(%balance, funder = %funder.address(), "Topping up target");
        let receipt = self
            .client
            .transfer(asset, funder, target, min_balance, &self.overrides)
            .await
            .map_err(|e| match e {
                ClientError::Reverted(reason) => {
                    HarnessError::TransferFailed { symbol: asset.symbol.clone(), reason }
                }
                other => other.into(),
            })?;

        let balance = self
            .client
            .balance_of(asset, target)
            .await?;
        if balance < *min_balance {
            return Err(HarnessError::FundingNotVerified {
                symbol: asset.symbol.clone(),
                required: min_balance.clone(),
                actual: balance,
            });
        }

        info!(%balance, tx_hash = %receipt.transaction_hash, "Target topped up");
        Ok(FundingOutcome::ToppedUp { receipt, balance })
    }
}
