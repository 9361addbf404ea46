//! `threshold` and `topK` must be honored (Bugs N3, N4).

use crate::constants::queries;
use crate::core::contract::{
    ensure, expect_products, expect_rejection, expect_scores_at_least, expect_success,
    threshold_percentage, ErrorField, ScenarioFailure, StatusExpectation,
};
use crate::models::FreeTextRequest;
use crate::services::RfqClient;

/// Every returned product must score at least `threshold` on the 0-100
/// scale. Result count is not asserted: when every catalog match scores the
/// same, a full page is correct.
pub async fn threshold_filters(
    client: &RfqClient,
    threshold: f64,
    top_k: i64,
    require_results: bool,
) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::new(queries::CUTTING_BOARD)
        .top_k(top_k)
        .threshold(threshold)
        .private_label_ranking(false);
    let envelope = expect_success(&client.upload_free_text(&request).await?)?;

    let products = if require_results {
        expect_products(&envelope)?
    } else {
        envelope.products()
    };

    expect_scores_at_least(products, threshold_percentage(threshold))
}

pub async fn top_k_exact(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::new(queries::CONTAINER).top_k(1);
    let envelope = expect_success(&client.upload_free_text(&request).await?)?;

    let count = envelope.products().len();
    ensure(count == 1, || format!("topK=1 returned {} products, expected exactly 1", count))
}

pub async fn top_k_upper_bound(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::new(queries::CONTAINER).top_k(10);
    let envelope = expect_success(&client.upload_free_text(&request).await?)?;

    let count = envelope.products().len();
    ensure(count <= 10, || format!("topK=10 returned {} products, expected at most 10", count))?;
    ensure(count > 1, || format!("topK=10 returned {} products, expected more than 1", count))
}

/// `topK=0` is out of range and must be rejected rather than yield no results
pub async fn top_k_zero_rejected(client: &RfqClient) -> Result<(), ScenarioFailure> {
    let request = FreeTextRequest::new(queries::CONTAINER).top_k(0);
    let response = client.upload_free_text(&request).await?;
    expect_rejection(&response, StatusExpectation::Exact(400), ErrorField::Code, &[])
}
