use std::collections::HashMap;

use alloy_primitives::address;
use tracing::debug;

use crate::{
    models::asset::{Asset, AssetKind, MAX_DECIMALS, NATIVE_ASSET_ADDRESS, NATIVE_DECIMALS},
    HarnessError,
};

/// Static address book resolving asset symbols to their on-chain identity.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: HashMap<String, Asset>,
}

impl AssetRegistry {
    /// Builds a registry from the given entries. Fails on duplicate symbols or on entries whose
    /// address contradicts their kind.
    pub fn new(assets: impl IntoIterator<Item = Asset>) -> Result<Self, HarnessError> {
        Self::default().with_assets(assets)
    }

    /// Ethereum mainnet assets the harness knows out of the box.
    pub fn mainnet() -> Self {
        let assets = [
            Asset::native("ETH"),
            Asset::erc20("DAI", address!("6B175474E89094C44Da98b954EedeAC495271d0F"), Some(18)),
            Asset::erc20("WETH", address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), Some(18)),
            Asset::erc20("USDC", address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), Some(6)),
        ];
        Self {
            assets: assets
                .into_iter()
                .map(|asset| (asset.symbol.clone(), asset))
                .collect(),
        }
    }

    /// Adds entries to the registry.
    pub fn with_assets(
        mut self,
        assets: impl IntoIterator<Item = Asset>,
    ) -> Result<Self, HarnessError> {
        for asset in assets {
            validate(&asset)?;
            if self.assets.contains_key(&asset.symbol) {
                return Err(HarnessError::Configuration(format!(
                    "Asset symbol {} is registered more than once",
                    asset.symbol
                )));
            }
            debug!(symbol = %asset.symbol, address = %asset.address, "Registering asset");
            self.assets
                .insert(asset.symbol.clone(), asset);
        }
        Ok(self)
    }

    /// Resolves a symbol (case-sensitive) to its asset.
    pub fn resolve(&self, symbol: &str) -> Result<Asset, HarnessError> {
        self.assets
            .get(symbol)
            .cloned()
            .ok_or_else(|| HarnessError::UnknownAsset(symbol.to_string()))
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .assets
            .keys()
            .map(String::as_str)
            .collect();
        symbols.sort_unstable();
        symbols
    }
}

fn validate(asset: &Asset) -> Result<(), HarnessError> {
    match asset.kind {
        AssetKind::Native
            if asset.address != NATIVE_ASSET_ADDRESS ||
                asset.decimals.is_some_and(|d| d != NATIVE_DECIMALS) =>
        {
            Err(HarnessError::Configuration(format!(
                "Native asset {} must use the zero address and {NATIVE_DECIMALS} decimals",
                asset.symbol
            )))
        }
        AssetKind::Erc20 if asset.address == NATIVE_ASSET_ADDRESS => {
            Err(HarnessError::Configuration(format!(
                "Token {} cannot use the address reserved for the native asset",
                asset.symbol
            )))
        }
        AssetKind::Erc20 if asset.decimals.is_some_and(|d| d > MAX_DECIMALS) => {
            Err(HarnessError::Configuration(format!(
                "Token {} declares {} decimals, at most {MAX_DECIMALS} are supported",
                asset.symbol,
                asset.decimals.unwrap_or_default()
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_symbols() {
        let registry = AssetRegistry::mainnet();

        let eth = registry.resolve("ETH").unwrap();
        let dai = registry.resolve("DAI").unwrap();

        assert!(eth.is_native());
        assert_eq!(dai.address, address!("6B175474E89094C44Da98b954EedeAC495271d0F"));
        assert_eq!(dai.decimals, Some(18));
        assert_eq!(registry.resolve("USDC").unwrap().decimals, Some(6));
    }

    #[test]
    fn test_resolve_unknown_symbol() {
        let registry = AssetRegistry::mainnet();

        assert_eq!(registry.resolve("NOPE"), Err(HarnessError::UnknownAsset("NOPE".to_string())));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let registry = AssetRegistry::mainnet();

        assert!(registry.resolve("dai").is_err());
    }

    #[test]
    fn test_with_assets_rejects_duplicates() {
        let duplicate =
            Asset::erc20("DAI", address!("dAC17F958D2ee523a2206206994597C13D831ec7"), Some(6));

        let res = AssetRegistry::mainnet().with_assets([duplicate]);

        assert!(matches!(res, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_with_assets_rejects_out_of_range_decimals() {
        let token = Asset::erc20(
            "BIG",
            address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
            Some(4_000_000_000),
        );

        let res = AssetRegistry::mainnet().with_assets([token]);

        assert!(matches!(res, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_with_assets_accepts_max_decimals() {
        let token =
            Asset::erc20("MAX", address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"), Some(255));

        let registry = AssetRegistry::mainnet()
            .with_assets([token])
            .unwrap();

        assert_eq!(registry.resolve("MAX").unwrap().decimals, Some(255));
    }

    #[test]
    fn test_with_assets_rejects_token_at_native_address() {
        let res = AssetRegistry::new([Asset::erc20("FAKE", NATIVE_ASSET_ADDRESS, None)]);

        assert!(matches!(res, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_with_assets_rejects_native_with_address() {
        let mut native = Asset::native("MATIC");
        native.address = address!("0000000000000000000000000000000000001010");

        let res = AssetRegistry::new([native]);

        assert!(matches!(res, Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_with_assets_extends_registry() {
        let usdt = Asset::erc20("USDT", address!("dAC17F958D2ee523a2206206994597C13D831ec7"), None);

        let registry = AssetRegistry::mainnet()
            .with_assets([usdt.clone()])
            .unwrap();

        assert_eq!(registry.resolve("USDT").unwrap(), usdt);
        assert_eq!(registry.symbols(), vec!["DAI", "ETH", "USDC", "USDT", "WETH"]);
    }
}
