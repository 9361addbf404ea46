use crate::constants::queries;
use crate::core::contract::{expect_products, expect_success, ScenarioFailure};
use crate::models::FreeTextRequest;
use crate::services::RfqClient;

/// Accented and quoted text must match as well as plain text (Bug N5)
pub async fn special_characters(client: &RfqClient) -> Result<(), ScenarioFailure> {
    for text in [
        queries::CAFE_CLEAN,
        queries::CAFE_ACCENT,
        queries::QUOTES_MEASUREMENT,
    ] {
        let request = FreeTextRequest::new(text).top_k(3).threshold(0.3);
        let envelope = expect_success(&client.upload_free_text(&request).await?)?;
        expect_products(&envelope).map_err(|_| {
            ScenarioFailure::Assertion(format!("query {:?} matched no products", text))
        })?;
    }
    Ok(())
}
