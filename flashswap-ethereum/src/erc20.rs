use alloy::{
    core::sol,
    primitives::{Address, U256},
    sol_types::SolCall,
};

use crate::RPCError;

// Subset of the ERC20 interface the harness interacts with.
// Copied from EIP-20: https://eips.ethereum.org/EIPS/eip-20
sol! {
    function decimals() public view returns (uint8);
    function balanceOf(address _owner) public view returns (uint256 balance);
    function transfer(address _to, uint256 _value) public returns (bool success);
}

/// Encode balanceOf(address) call
pub fn encode_balance_of(owner: Address) -> Vec<u8> {
    balanceOfCall { _owner: owner }.abi_encode()
}

/// Encode transfer(address,uint256) call
pub fn encode_transfer(to: Address, value: U256) -> Vec<u8> {
    transferCall { _to: to, _value: value }.abi_encode()
}

/// Encode decimals() call
pub fn encode_decimals() -> Vec<u8> {
    decimalsCall {}.abi_encode()
}

/// Decode balanceOf(address) return value
pub fn decode_balance_of(data: &[u8]) -> Result<U256, RPCError> {
    balanceOfCall::abi_decode_returns(data)
        .map_err(|e| RPCError::DecodeError(format!("Invalid balanceOf return data: {e}")))
}

/// Decode decimals() return value. Words that do not fit a `uint8` are rejected rather than
/// truncated.
pub fn decode_decimals(data: &[u8]) -> Result<u8, RPCError> {
    decimalsCall::abi_decode_returns_validate(data)
        .map_err(|e| RPCError::DecodeError(format!("Invalid decimals return data: {e}")))
}
