//! Sequential execution of the configured scenarios against one contract.

use std::sync::Arc;

use flashswap_common::{
    funding::FundingOutcome,
    invoker::{FlashSwapInvoker, FlashSwapReport},
    models::{scenario::Scenario, transaction::Signer},
    traits::FlashSwapContract,
    HarnessError,
};
use tracing::{error, info, info_span, Instrument};

#[derive(Debug)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub outcome: Result<FlashSwapReport, HarnessError>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<ScenarioResult>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome.is_err())
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct ScenarioRunner {
    invoker: FlashSwapInvoker,
    contract: Arc<dyn FlashSwapContract>,
    signer: Signer,
}

impl ScenarioRunner {
    pub fn new(
        invoker: FlashSwapInvoker,
        contract: Arc<dyn FlashSwapContract>,
        signer: Signer,
    ) -> Self {
        Self { invoker, contract, signer }
    }

    /// Runs every scenario in order. A failing scenario is recorded and the next one still runs.
    pub async fn run(&self, scenarios: &[Scenario]) -> RunSummary {
        let mut summary = RunSummary::default();
        for scenario in scenarios {
            info!(%scenario, "Running scenario");
            let outcome = self
                .invoker
                .invoke(self.contract.as_ref(), scenario, &self.signer)
                .instrument(info_span!("scenario", name = %scenario.name))
                .await;
            report(scenario, &outcome);
            summary
                .results
                .push(ScenarioResult { scenario: scenario.clone(), outcome });
        }

        info!(
            total = summary.results.len(),
            failed = summary.failed(),
            "Finished running scenarios"
        );
        summary
    }
}

fn report(scenario: &Scenario, outcome: &Result<FlashSwapReport, HarnessError>) {
    match outcome {
        Ok(report) => {
            let top_up = match &report.funding {
                FundingOutcome::AlreadyCovered { .. } => None,
                FundingOutcome::ToppedUp { receipt, .. } => Some(receipt.transaction_hash),
            };
            info!(
                name = %scenario.name,
                tx_hash = %report.receipt.transaction_hash,
                gas_used = report.receipt.gas_used,
                top_up = ?top_up,
                contract_balance = %report.funding.balance(),
                "Scenario passed"
            );
        }
        Err(err) => error!(name = %scenario.name, error = %err, "Scenario failed"),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address};
    use flashswap_common::{
        models::{asset::Asset, transaction::TransactionOverrides, Amount},
        registry::AssetRegistry,
        testing::{receipt, InMemoryLedger},
        traits::MockFlashSwapContract,
    };
    use num_bigint::BigUint;

    use super::*;

    const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const FUNDER: Address = address!("D3E52099a6a48F132Cb23b1364B7dEE212d862F6");

    fn ether(value: u64) -> Amount {
        BigUint::from(value) * BigUint::from(10u32).pow(18)
    }

    fn runner(ledger: Arc<InMemoryLedger>, swaps: usize) -> ScenarioRunner {
        let mut contract = MockFlashSwapContract::new();
        contract
            .expect_address()
            .return_const(CONTRACT);
        contract
            .expect_flash_swap()
            .times(swaps)
            .returning(|_, _, _| Ok(receipt(7)));
        let invoker = FlashSwapInvoker::new(
            Arc::new(AssetRegistry::mainnet()),
            ledger,
            TransactionOverrides::default(),
        );
        ScenarioRunner::new(invoker, Arc::new(contract), Signer::new(FUNDER))
    }

    #[test_log::test(tokio::test)]
    async fn test_failure_does_not_stop_later_scenarios() {
        let eth = Asset::native("ETH");
        let ledger = Arc::new(InMemoryLedger::default().with_balance(&eth, FUNDER, ether(10)));
        let runner = runner(ledger.clone(), 1);
        let scenarios = [
            Scenario::new("unknown", "XYZ", "XYZ", "1", "1"),
            Scenario::new("eth-eth", "ETH", "ETH", "1", "2"),
        ];

        let summary = runner.run(&scenarios).await;

        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_success());
        assert!(matches!(
            &summary.results[0].outcome,
            Err(HarnessError::UnknownAsset(symbol)) if symbol == "XYZ"
        ));
        assert_eq!(summary.results[1].outcome.as_ref().unwrap().receipt, receipt(7));
        assert_eq!(ledger.balance(&eth, CONTRACT), ether(2));
    }

    #[test_log::test(tokio::test)]
    async fn test_second_run_of_same_scenario_needs_no_top_up() {
        let eth = Asset::native("ETH");
        let ledger = Arc::new(InMemoryLedger::default().with_balance(&eth, FUNDER, ether(10)));
        let runner = runner(ledger.clone(), 2);
        let scenario = Scenario::new("eth-eth", "ETH", "ETH", "1", "2");

        let summary = runner
            .run(&[scenario.clone(), scenario])
            .await;

        assert!(summary.is_success());
        assert_eq!(ledger.transfers().len(), 1);
        assert!(matches!(
            summary.results[1].outcome.as_ref().unwrap().funding,
            FundingOutcome::AlreadyCovered { .. }
        ));
    }

    #[test_log::test(tokio::test)]
    async fn test_unfunded_signer_fails_scenario() {
        let ledger = Arc::new(InMemoryLedger::default());
        let runner = runner(ledger.clone(), 0);

        let summary = runner
            .run(&[Scenario::new("dai-dai", "DAI", "DAI", "1000", "25")])
            .await;

        assert_eq!(summary.failed(), 1);
        assert!(matches!(
            summary.results[0].outcome,
            Err(HarnessError::InsufficientFunding { .. })
        ));
        assert!(ledger.transfers().is_empty());
    }
}
