use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy_primitives::{Address, Bytes};
use clap::Parser;
use flashswap_common::{
    models::transaction::{Signer, TransactionOverrides, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE},
    HarnessError,
};

/// Flash swap test harness
///
/// Runs flash swap scenarios against a contract on a node that holds the signer's key. Before
/// every swap the contract is topped up with enough of the repayment asset to cover the fee.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address of the account unlocked on the node. Funds the fee top-ups and sends every
    /// transaction.
    #[clap(long, env = "SIGNER_ADDRESS")]
    pub signer_address: Option<String>,

    /// The RPC URL of the node
    #[clap(long, env = "RPC_URL", default_value = "http://localhost:8545")]
    pub rpc_url: String,

    /// Gas limit of every submitted transaction
    #[clap(long, env = "GAS_LIMIT", default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,

    /// Gas price in wei of every submitted transaction
    #[clap(long, env = "GAS_PRICE", default_value_t = DEFAULT_GAS_PRICE)]
    pub gas_price: u128,

    /// Address of an already deployed flash swap contract
    #[clap(long = "contract", env = "CONTRACT_ADDRESS", conflicts_with = "artifact")]
    pub contract_address: Option<String>,

    /// Compiled contract artifact (JSON with a `bytecode` field) to deploy before running
    #[clap(long, env = "CONTRACT_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// ABI encoded constructor arguments appended to the artifact bytecode, as hex
    #[clap(long, requires = "artifact")]
    pub constructor_args: Option<String>,

    /// YAML file declaring extra assets and the scenarios to run. The built-in scenarios are
    /// used if omitted.
    #[clap(long = "scenarios", env = "SCENARIOS_FILE")]
    pub scenarios_file: Option<PathBuf>,

    /// Interval between two receipt polls, in milliseconds
    #[clap(long, default_value = "500")]
    pub receipt_poll_interval_ms: u64,
}

/// Where the contract under test comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractSource {
    Deployed(Address),
    Artifact { path: PathBuf, constructor_args: Bytes },
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub signer: Signer,
    pub rpc_url: String,
    pub overrides: TransactionOverrides,
    pub contract: ContractSource,
    pub scenarios_file: Option<PathBuf>,
    pub receipt_poll_interval: Duration,
}

impl Cli {
    /// Validates the arguments. Runs before anything is sent to the node.
    pub fn settings(&self) -> Result<RunSettings, HarnessError> {
        let signer = match self.signer_address.as_deref() {
            Some(address) if !address.trim().is_empty() => {
                Signer::new(parse_address("SIGNER_ADDRESS", address)?)
            }
            _ => {
                return Err(HarnessError::Configuration(
                    "Environment variable SIGNER_ADDRESS must be set. E.g. \
                     SIGNER_ADDRESS=0xD3E52099a6a48F132Cb23b1364B7dEE212d862F6"
                        .to_string(),
                ))
            }
        };

        let contract = match (&self.contract_address, &self.artifact) {
            (Some(address), None) => {
                ContractSource::Deployed(parse_address("CONTRACT_ADDRESS", address)?)
            }
            (None, Some(path)) => ContractSource::Artifact {
                path: path.clone(),
                constructor_args: self
                    .constructor_args
                    .as_deref()
                    .map(parse_constructor_args)
                    .transpose()?
                    .unwrap_or_default(),
            },
            (Some(_), Some(_)) => {
                return Err(HarnessError::Configuration(
                    "CONTRACT_ADDRESS and CONTRACT_ARTIFACT are mutually exclusive".to_string(),
                ))
            }
            (None, None) => {
                return Err(HarnessError::Configuration(
                    "Either CONTRACT_ADDRESS or CONTRACT_ARTIFACT must be set".to_string(),
                ))
            }
        };

        if self.receipt_poll_interval_ms == 0 {
            return Err(HarnessError::Configuration(
                "receipt poll interval must be positive".to_string(),
            ));
        }

        Ok(RunSettings {
            signer,
            rpc_url: self.rpc_url.clone(),
            overrides: TransactionOverrides::new(self.gas_limit, self.gas_price),
            contract,
            scenarios_file: self.scenarios_file.clone(),
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
        })
    }
}

fn parse_address(name: &str, value: &str) -> Result<Address, HarnessError> {
    Address::from_str(value.trim())
        .map_err(|e| HarnessError::Configuration(format!("{name} is not a valid address: {e}")))
}

fn parse_constructor_args(value: &str) -> Result<Bytes, HarnessError> {
    Bytes::from_str(value.trim()).map_err(|e| {
        HarnessError::Configuration(format!("Constructor arguments are not valid hex: {e}"))
    })
}

#[cfg(test)]
mod cli_tests {
    use alloy_primitives::address;

    use super::*;

    const SIGNER: &str = "0xD3E52099a6a48F132Cb23b1364B7dEE212d862F6";
    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn test_cli_args() {
        let cli = Cli::parse_from([
            "flashswap-runner",
            "--signer-address",
            SIGNER,
            "--rpc-url",
            "http://127.0.0.1:8545",
            "--gas-limit",
            "500000",
            "--gas-price",
            "1000000000",
            "--contract",
            CONTRACT,
            "--scenarios",
            "scenarios.yaml",
            "--receipt-poll-interval-ms",
            "100",
        ]);

        let settings = cli.settings().unwrap();

        assert_eq!(
            settings,
            RunSettings {
                signer: Signer::new(address!("D3E52099a6a48F132Cb23b1364B7dEE212d862F6")),
                rpc_url: "http://127.0.0.1:8545".to_string(),
                overrides: TransactionOverrides::new(500_000, 1_000_000_000),
                contract: ContractSource::Deployed(address!(
                    "5FbDB2315678afecb367f032d93F642f64180aa3"
                )),
                scenarios_file: Some(PathBuf::from("scenarios.yaml")),
                receipt_poll_interval: Duration::from_millis(100),
            }
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli {
            contract_address: None,
            artifact: Some(PathBuf::from("artifacts/ExampleContract.json")),
            ..cli()
        };

        let settings = cli.settings().unwrap();

        assert_eq!(settings.overrides, TransactionOverrides::new(9_000_000, 60_000_000_000));
        assert_eq!(
            settings.contract,
            ContractSource::Artifact {
                path: PathBuf::from("artifacts/ExampleContract.json"),
                constructor_args: Bytes::new(),
            }
        );
    }

    fn cli() -> Cli {
        Cli {
            signer_address: Some(SIGNER.to_string()),
            rpc_url: "http://localhost:8545".to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            contract_address: Some(CONTRACT.to_string()),
            artifact: None,
            constructor_args: None,
            scenarios_file: None,
            receipt_poll_interval_ms: 500,
        }
    }

    #[test]
    fn test_missing_signer_is_a_configuration_error() {
        let cli = Cli { signer_address: None, ..cli() };

        let err = cli.settings().unwrap_err();

        assert!(matches!(
            err,
            HarnessError::Configuration(msg) if msg.contains("SIGNER_ADDRESS must be set")
        ));
    }

    #[test]
    fn test_blank_signer_is_a_configuration_error() {
        let cli = Cli { signer_address: Some("  ".to_string()), ..cli() };

        assert!(matches!(cli.settings(), Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_malformed_signer_is_rejected() {
        let cli = Cli { signer_address: Some("0xnotanaddress".to_string()), ..cli() };

        assert!(matches!(cli.settings(), Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_contract_source_is_required() {
        let cli = Cli { contract_address: None, ..cli() };

        assert!(matches!(cli.settings(), Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_constructor_args_are_decoded() {
        let cli = Cli {
            contract_address: None,
            artifact: Some(PathBuf::from("artifact.json")),
            constructor_args: Some(format!("0x{}01", "0".repeat(62))),
            ..cli()
        };

        match cli.settings().unwrap().contract {
            ContractSource::Artifact { constructor_args, .. } => {
                assert_eq!(constructor_args.len(), 32);
                assert_eq!(constructor_args[31], 1);
            }
            other => panic!("unexpected contract source {other:?}"),
        }
    }

    #[test]
    fn test_invalid_constructor_args() {
        let cli = Cli {
            contract_address: None,
            artifact: Some(PathBuf::from("artifact.json")),
            constructor_args: Some("0xzz".to_string()),
            ..cli()
        };

        assert!(matches!(cli.settings(), Err(HarnessError::Configuration(_))));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let cli = Cli { receipt_poll_interval_ms: 0, ..cli() };

        assert!(matches!(cli.settings(), Err(HarnessError::Configuration(_))));
    }
}
