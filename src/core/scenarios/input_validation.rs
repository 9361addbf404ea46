//! Malformed, empty and missing inputs must be rejected with a 4xx and an
//! error identifier. A 5xx here is unhandled-exception leakage (Bug N2).

use crate::constants::{defaults, MALFORMED_URL, UNREACHABLE_STATUSES, UNREACHABLE_URL};
use crate::core::contract::{expect_rejection, ErrorField, ScenarioFailure, StatusExpectation};
use crate::models::{FreeTextRequest, UrlHtmlRequest};
use crate::services::RfqClient;

const BAD_REQUEST: StatusExpectation = StatusExpectation::Exact(400);

fn free_text(text: &str) -> FreeTextRequest {
    FreeTextRequest::new(text).private_label_ranking(defaults::ENABLE_PRIVATE_LABEL_RANKING)
}

pub async fn empty_text(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let response = client.upload_free_text(&free_text("")).await?;
    expect_rejection(&response, BAD_REQUEST, ErrorField::Code, &["matchedProducts"])
}

pub async fn whitespace_text(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let response = client.upload_free_text(&free_text("   \t\n")).await?;
    expect_rejection(&response, BAD_REQUEST, ErrorField::Code, &["matchedProducts"])
}

/// Model-binding failures report `errors` rather than `error_code`
pub async fn missing_text(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::without_text().private_label_ranking(false);
    let response = client.upload_free_text(&request).await?;
    expect_rejection(&response, BAD_REQUEST, ErrorField::Errors, &["matchedProducts"])
}

pub async fn malformed_url(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let response = client.upload_url_html(&UrlHtmlRequest::new(MALFORMED_URL)).await?;
    expect_rejection(
        &response,
        BAD_REQUEST,
        ErrorField::Code,
        &["traceId", "matchedProducts"],
    )
}

pub async fn unreachable_url(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let response = client.upload_url_html(&UrlHtmlRequest::new(UNREACHABLE_URL)).await?;
    expect_rejection(
        &response,
        StatusExpectation::OneOf(UNREACHABLE_STATUSES),
        ErrorField::Code,
        &["traceId"],
    )
}

pub async fn empty_url(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let response = client.upload_url_html(&UrlHtmlRequest::new("")).await?;
    expect_rejection(&response, BAD_REQUEST, ErrorField::Code, &["matchedProducts"])
}
