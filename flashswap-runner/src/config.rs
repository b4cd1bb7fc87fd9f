use std::{fs, path::Path};

use alloy_primitives::Address;
use flashswap_common::{
    models::{
        asset::{Asset, AssetKind},
        scenario::Scenario,
    },
    registry::AssetRegistry,
    HarnessError,
};
use serde::Deserialize;

/// An asset declared in the scenario file in addition to the built-in address book.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetConfig {
    pub symbol: String,
    pub address: Address,
    #[serde(default = "default_kind")]
    pub kind: AssetKind,
    /// Read from the token contract when omitted.
    pub decimals: Option<u32>,
}

fn default_kind() -> AssetKind {
    AssetKind::Erc20
}

impl From<AssetConfig> for Asset {
    fn from(value: AssetConfig) -> Self {
        Asset {
            symbol: value.symbol,
            address: value.address,
            kind: value.kind,
            decimals: value.decimals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { assets: Vec::new(), scenarios: default_scenarios() }
    }
}

/// Borrow 1000 DAI repaid in DAI with a 25 DAI fee cushion, and its native asset counterpart.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("dai-dai", "DAI", "DAI", "1000", "25"),
        Scenario::new("eth-eth", "ETH", "ETH", "1", "2"),
    ]
}

impl HarnessConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            HarnessError::Configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, HarnessError> {
        let config: HarnessConfig = serde_yaml::from_str(contents)
            .map_err(|e| HarnessError::Configuration(format!("Invalid scenario file: {e}")))?;
        if config.scenarios.is_empty() {
            return Err(HarnessError::Configuration("No scenarios configured".to_string()));
        }
        Ok(config)
    }

    /// The mainnet address book extended with the declared assets.
    pub fn registry(&self) -> Result<AssetRegistry, HarnessError> {
        AssetRegistry::mainnet().with_assets(
            self.assets
                .iter()
                .cloned()
                .map(Asset::from),
        )
    }
}
