pub mod amount;
pub mod asset;
pub mod scenario;
pub mod transaction;

use num_bigint::BigUint;

/// An amount of an asset expressed in its smallest indivisible unit.
pub type Amount = BigUint;

pub use alloy_primitives::{Address, Bytes, TxHash};
