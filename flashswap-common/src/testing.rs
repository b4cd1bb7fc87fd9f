//! Test doubles shared by the funding and invocation tests.

use std::{collections::HashMap, sync::Mutex};

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use num_traits::Zero;

use crate::{
    models::{
        asset::Asset,
        transaction::{Signer, TransactionOverrides, TransactionReceipt},
        Amount,
    },
    traits::AssetClient,
    ClientError,
};

/// A transfer recorded by [`InMemoryLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub asset: Address,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// An `AssetClient` keeping balances in memory. Transfers settle immediately, which mirrors a
/// node that mines every transaction on submission.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<(Address, Address), Amount>>,
    decimals: HashMap<Address, u32>,
    transfers: Mutex<Vec<RecordedTransfer>>,
    balance_queries: Mutex<usize>,
}

impl InMemoryLedger {
    pub fn with_balance(self, asset: &Asset, account: Address, amount: Amount) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert((asset.address, account), amount);
        self
    }

    pub fn with_decimals(mut self, asset: &Asset, decimals: u32) -> Self {
        self.decimals
            .insert(asset.address, decimals);
        self
    }

    pub fn balance(&self, asset: &Asset, account: Address) -> Amount {
        self.balances
            .lock()
            .unwrap()
            .get(&(asset.address, account))
            .cloned()
            .unwrap_or_default()
    }

    pub fn transfers(&self) -> Vec<RecordedTransfer> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn balance_queries(&self) -> usize {
        *self.balance_queries.lock().unwrap()
    }
}

#[async_trait]
impl AssetClient for InMemoryLedger {
    async fn balance_of(&self, asset: &Asset, account: Address) -> Result<Amount, ClientError> {
        *self.balance_queries.lock().unwrap() += 1;
        Ok(self.balance(asset, account))
    }

    async fn transfer(
        &self,
        asset: &Asset,
        from: &Signer,
        to: Address,
        amount: &Amount,
        _overrides: &TransactionOverrides,
    ) -> Result<TransactionReceipt, ClientError> {
        let mut balances = self.balances.lock().unwrap();
        let sender = balances
            .entry((asset.address, from.address()))
            .or_insert_with(Amount::zero);
        if *sender < *amount {
            return Err(ClientError::Reverted("transfer amount exceeds balance".to_string()));
        }
        *sender -= amount;
        *balances
            .entry((asset.address, to))
            .or_insert_with(Amount::zero) += amount;

        let mut transfers = self.transfers.lock().unwrap();
        transfers.push(RecordedTransfer {
            asset: asset.address,
            from: from.address(),
            to,
            amount: amount.clone(),
        });
        Ok(receipt(transfers.len() as u64))
    }

    async fn decimals_of(&self, asset: &Asset) -> Result<u32, ClientError> {
        if asset.is_native() {
            return Ok(18);
        }
        self.decimals
            .get(&asset.address)
            .copied()
            .ok_or_else(|| ClientError::Decode(format!("no decimals for {asset}")))
    }
}

/// A successful receipt for the n-th transaction of a test.
pub fn receipt(n: u64) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: B256::with_last_byte(n as u8),
        block_number: n,
        gas_used: 21_000,
        success: true,
        contract_address: None,
    }
}
