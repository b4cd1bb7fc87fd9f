use std::{fs, path::Path};

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::RPCError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// hardhat / buidler / truffle: `"bytecode": "0x..."`
    Hex(Bytes),
    /// forge: `"bytecode": {"object": "0x..."}`
    Object { object: Bytes },
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName")]
    contract_name: Option<String>,
    bytecode: ArtifactBytecode,
}

/// Compiled contract as written by the Solidity build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    pub contract_name: Option<String>,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RPCError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RPCError::SetupError(format!("Failed to read artifact {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, RPCError> {
        let raw: RawArtifact = serde_json::from_str(content)
            .map_err(|e| RPCError::DecodeError(format!("Invalid contract artifact: {e}")))?;
        let bytecode = match raw.bytecode {
            ArtifactBytecode::Hex(bytes) | ArtifactBytecode::Object { object: bytes } => bytes,
        };
        if bytecode.is_empty() {
            return Err(RPCError::DecodeError(
                "Contract artifact has no creation bytecode (abstract contract or interface?)"
                    .to_string(),
            ));
        }
        Ok(Self { contract_name: raw.contract_name, bytecode })
    }
}
