use crate::core::runner::{ScenarioOutcome, Verdict};
use crate::core::scenario::{DefectState, Scenario};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

/// Results of one verifier run
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub base_url: String,
    pub outcomes: Vec<ScenarioOutcome>,
}

/// Serialized form of one outcome
#[derive(Debug, Serialize)]
struct OutcomeRecord<'a> {
    #[serde(flatten)]
    scenario: &'a Scenario,
    status: &'static str,
    elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    base_url: &'a str,
    passed: usize,
    failed: usize,
    scenarios: Vec<OutcomeRecord<'a>>,
}

impl RunReport {
    pub fn start(base_url: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            base_url: base_url.to_string(),
            outcomes: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.verdict.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// List-style report: one line per scenario, failure detail beneath
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Running {} scenarios against {}\n",
            self.outcomes.len(),
            self.base_url
        );

        let mut current_group = None;
        for outcome in &self.outcomes {
            let scenario = &outcome.scenario;
            if current_group != Some(scenario.group) {
                let _ = writeln!(out, "  {}", scenario.group.title());
                current_group = Some(scenario.group);
            }

            let mark = if outcome.verdict.passed() { "✓" } else { "✘" };
            let secs = outcome.elapsed.as_secs_f64();
            let _ = writeln!(out, "    {} {} ({:.1}s)", mark, scenario, secs);

            if let Verdict::Failed(failure) = &outcome.verdict {
                let _ = writeln!(out, "        {}: {}", failure.kind(), failure);
                if let Some(defect) = scenario.defect.filter(|d| d.state == DefectState::Open) {
                    let _ = writeln!(out, "        reproduces open defect {}", defect.tag);
                }
            }
        }

        let _ = writeln!(out, "\n  {} passed, {} failed", self.passed(), self.failed());
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let record = ReportRecord {
            run_id: self.run_id,
            started_at: self.started_at,
            base_url: &self.base_url,
            passed: self.passed(),
            failed: self.failed(),
            scenarios: self
                .outcomes
                .iter()
                .map(|o| {
                    let failure = match &o.verdict {
                        Verdict::Passed => None,
                        Verdict::Failed(f) => Some(f),
                    };
                    OutcomeRecord {
                        scenario: &o.scenario,
                        status: if failure.is_none() { "passed" } else { "failed" },
                        elapsed_ms: o.elapsed.as_millis(),
                        failure_kind: failure.map(|f| f.kind()),
                        failure: failure.map(|f| f.to_string()),
                    }
                })
                .collect(),
        };
        serde_json::to_string_pretty(&record)
    }
}
