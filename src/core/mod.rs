// Core verifier exports
pub mod contract;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod scenarios;

pub use contract::{FieldType, ScenarioFailure, StatusExpectation};
pub use report::RunReport;
pub use runner::{Runner, ScenarioOutcome, Verdict};
pub use scenario::{catalog, select, Defect, DefectState, Group, Scenario, ScenarioId};
