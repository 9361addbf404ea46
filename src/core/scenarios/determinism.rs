use crate::constants::{defaults, queries};
use crate::core::contract::{
    ensure, expect_products, expect_success, product_name, product_score, ScenarioFailure,
};
use crate::models::FreeTextRequest;
use crate::services::RfqClient;

/// Top result observed on one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct TopResult {
    pub name: String,
    pub score: f64,
}

/// Repeat one identical query `attempts` times. The top product must be the
/// same every time and its score spread must stay within `tolerance`
/// (Bug P4).
pub async fn consistent_top_result(
    client: &RfqClient,
    attempts: usize,
    tolerance: f64,
) -> Result<(), ScenarioFailure> {
    let mut observed = Vec::with_capacity(attempts);

    for attempt in 1..=attempts {
        let request = FreeTextRequest::new(queries::GREEN_BOARD)
            .top_k(1)
            .threshold(defaults::THRESHOLD);
        let envelope = expect_success(&client.upload_free_text(&request).await?)?;
        let top = &expect_products(&envelope)?[0];

        let result = TopResult {
            name: product_name(top, 0)?.to_string(),
            score: product_score(top, 0)?,
        };
        tracing::debug!("attempt {}/{}: {:?}", attempt, attempts, result);
        observed.push(result);
    }

    check_consistency(&observed, tolerance)
}

/// Same identity across all results, and max-min score within `tolerance`
pub fn check_consistency(observed: &[TopResult], tolerance: f64) -> Result<(), ScenarioFailure> {
    let Some(first) = observed.first() else {
        return Ok(());
    };

    for (attempt, result) in observed.iter().enumerate().skip(1) {
        ensure(result.name == first.name, || {
            format!(
                "attempt {} returned {:?}, attempt 1 returned {:?}",
                attempt + 1,
                result.name,
                first.name
            )
        })?;
    }

    let max = observed.iter().map(|r| r.score).fold(f64::MIN, f64::max);
    let min = observed.iter().map(|r| r.score).fold(f64::MAX, f64::min);
    ensure(max - min <= tolerance, || {
        format!(
            "score spread {} exceeds tolerance {} (min {}, max {})",
            max - min,
            tolerance,
            min,
            max
        )
    })
}
