#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod artifact;
pub mod asset_client;
pub mod erc20;
pub mod errors;
pub mod flash_swap;
pub mod rpc;

#[cfg(test)]
pub mod test_fixtures;

use alloy::primitives::U256;
use num_bigint::BigUint;

pub use errors::RPCError;

/// Conversion between on-chain `U256` words and the arbitrary precision amounts used by the
/// harness.
///
/// # Examples
/// ```
/// use alloy::primitives::U256;
/// use flashswap_ethereum::BigUintCodec;
/// use num_bigint::BigUint;
///
/// let word = U256::from(1_000u64);
/// let amount: BigUint = word.to_biguint();
/// assert_eq!(U256::try_from_biguint(&amount).unwrap(), word);
/// ```
pub trait BigUintCodec: Sized {
    fn to_biguint(self) -> BigUint;

    /// Fails if `value` does not fit the type.
    fn try_from_biguint(value: &BigUint) -> Result<Self, RPCError>;
}

impl BigUintCodec for U256 {
    fn to_biguint(self) -> BigUint {
        BigUint::from_bytes_be(&self.to_be_bytes::<32>())
    }

    fn try_from_biguint(value: &BigUint) -> Result<Self, RPCError> {
        U256::try_from_be_slice(&value.to_bytes_be())
            .ok_or_else(|| {
                RPCError::EncodeError(format!("Amount {value} does not fit in 256 bits"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_max_converts_both_ways() {
        let amount = U256::MAX.to_biguint();

        assert_eq!(amount, (BigUint::from(1u32) << 256) - 1u32);
        assert_eq!(U256::try_from_biguint(&amount).unwrap(), U256::MAX);
    }

    #[test]
    fn test_zero_converts() {
        assert_eq!(U256::try_from_biguint(&BigUint::default()).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_overflow_is_rejected() {
        let too_large = BigUint::from(1u32) << 256;

        assert!(matches!(U256::try_from_biguint(&too_large), Err(RPCError::EncodeError(_))));
    }
}
