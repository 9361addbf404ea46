use crate::core::contract::ScenarioFailure;
use crate::core::report::RunReport;
use crate::core::scenario::Scenario;
use crate::services::RfqClient;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of a single scenario
#[derive(Debug)]
pub enum Verdict {
    Passed,
    Failed(ScenarioFailure),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub verdict: Verdict,
    pub elapsed: Duration,
}

/// Sequential scenario runner
///
/// One worker, zero retries: repeating or parallelizing calls would mask
/// exactly the non-determinism some scenarios exist to expose.
#[derive(Debug, Clone)]
pub struct Runner {
    client: RfqClient,
    default_timeout: Duration,
}

impl Runner {
    pub fn new(client: RfqClient) -> Self {
        let default_timeout = client.timeout();
        Self {
            client,
            default_timeout,
        }
    }

    /// Run one scenario under its timeout; every failure stays local
    pub async fn run_one(&self, scenario: &Scenario) -> ScenarioOutcome {
        let timeout = scenario.timeout.unwrap_or(self.default_timeout);
        let client = self.client.with_timeout(timeout);
        let started = Instant::now();

        info!("Running {}", scenario);

        let verdict = match tokio::time::timeout(timeout, scenario.run(&client)).await {
            Ok(Ok(())) => Verdict::Passed,
            Ok(Err(failure)) => Verdict::Failed(failure),
            Err(_) => Verdict::Failed(ScenarioFailure::Timeout(timeout)),
        };
        let elapsed = started.elapsed();

        match &verdict {
            Verdict::Passed => info!("{} passed in {:?}", scenario.id, elapsed),
            Verdict::Failed(failure) => {
                warn!("{} failed in {:?} ({}): {}", scenario.id, elapsed, failure.kind(), failure)
            }
        }

        ScenarioOutcome {
            scenario: scenario.clone(),
            verdict,
            elapsed,
        }
    }

    /// Run scenarios strictly in order and collect a report
    pub async fn run(&self, scenarios: &[Scenario]) -> RunReport {
        let mut report = RunReport::start(self.client.base_url());

        for scenario in scenarios {
            let outcome = self.run_one(scenario).await;
            report.outcomes.push(outcome);
        }

        info!(
            "Run {} finished: {} passed, {} failed",
            report.run_id,
            report.passed(),
            report.failed()
        );
        report
    }
}
