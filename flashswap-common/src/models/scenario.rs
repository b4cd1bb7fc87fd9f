use serde::{Deserialize, Serialize};

/// A single end-to-end flash swap case.
///
/// Amounts are kept as the decimal strings a user would type; they are converted to base units
/// with the precision of the respective asset right before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Symbol of the asset borrowed from the pair.
    pub borrow_asset: String,
    /// Symbol of the asset used to repay the loan.
    pub pay_asset: String,
    pub borrow_amount: String,
    /// Minimum balance of `pay_asset` the contract must hold before the swap is attempted.
    pub fee_cushion: String,
}

impl Scenario {
    pub fn new(
        name: &str,
        borrow_asset: &str,
        pay_asset: &str,
        borrow_amount: &str,
        fee_cushion: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            borrow_asset: borrow_asset.to_string(),
            pay_asset: pay_asset.to_string(),
            borrow_amount: borrow_amount.to_string(),
            fee_cushion: fee_cushion.to_string(),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: borrow {} {}, repay in {} (cushion {})",
            self.name, self.borrow_amount, self.borrow_asset, self.pay_asset, self.fee_cushion
        )
    }
}
