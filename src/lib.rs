//! RFQ Verifier - black-box contract verification for the RFQ product-matching API
//!
//! Sends canned requests to the free-text and URL/HTML matching endpoints and
//! checks status codes, envelope shape and matching-quality heuristics. Many
//! scenarios reproduce open backlog defects and are expected to fail until the
//! service fixes them.

pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use self::config::Settings;
pub use self::core::{
    catalog, select, Group, RunReport, Runner, Scenario, ScenarioFailure, ScenarioId, Verdict,
};
pub use services::{ApiResponse, RfqClient, RfqError};
