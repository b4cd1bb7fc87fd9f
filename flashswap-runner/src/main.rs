use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use flashswap_common::{
    invoker::FlashSwapInvoker, traits::FlashSwapContract, ClientError, HarnessError,
};
use flashswap_ethereum::{
    artifact::ContractArtifact, asset_client::EvmAssetClient, flash_swap::EvmFlashSwapContract,
    rpc::EthereumRpcClient, RPCError,
};
use flashswap_runner::{
    cli::{Cli, ContractSource, RunSettings},
    config::HarnessConfig,
    runner::ScenarioRunner,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    create_tracing_subscriber();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let config = match &settings.scenarios_file {
        Some(path) => HarnessConfig::from_yaml(path)?,
        None => HarnessConfig::default(),
    };

    let runner = build_runner(&settings, &config).await?;
    let summary = runner.run(&config.scenarios).await;
    if !summary.is_success() {
        bail!("{} of {} scenarios failed", summary.failed(), summary.results.len());
    }
    Ok(())
}

fn create_tracing_subscriber() {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(false)
        .compact();
    tracing_subscriber::fmt()
        .event_format(format)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Connects to the node and attaches to, or deploys, the contract under test.
#[instrument(skip_all, fields(rpc_url = %settings.rpc_url, signer = %settings.signer.address()))]
async fn build_runner(
    settings: &RunSettings,
    config: &HarnessConfig,
) -> Result<ScenarioRunner, HarnessError> {
    let registry = Arc::new(config.registry()?);
    let rpc = EthereumRpcClient::new(&settings.rpc_url)
        .map_err(|e| HarnessError::Configuration(e.to_string()))?
        .with_receipt_poll_interval(settings.receipt_poll_interval);

    let contract = match &settings.contract {
        ContractSource::Deployed(address) => {
            info!(%address, "Using deployed contract");
            EvmFlashSwapContract::attach(rpc.clone(), *address)
        }
        ContractSource::Artifact { path, constructor_args } => {
            let artifact = ContractArtifact::from_file(path)
                .map_err(|e| HarnessError::Configuration(e.to_string()))?;
            info!(path = %path.display(), name = ?artifact.contract_name, "Deploying contract");
            EvmFlashSwapContract::deploy(
                rpc.clone(),
                &settings.signer,
                &artifact.bytecode,
                constructor_args,
                &settings.overrides,
            )
            .await
            .map_err(|e| match e {
                RPCError::Reverted(reason) => HarnessError::Configuration(format!(
                    "Contract deployment reverted: {reason}"
                )),
                other => ClientError::from(other).into(),
            })?
        }
    };
    let contract: Arc<dyn FlashSwapContract> = Arc::new(contract);

    let client = Arc::new(EvmAssetClient::new(rpc));
    let invoker = FlashSwapInvoker::new(registry, client, settings.overrides);
    Ok(ScenarioRunner::new(invoker, contract, settings.signer))
}
