// Unit tests for RFQ Verifier contract checks

use rfq_verifier::core::contract::{
    expect_products, expect_rejection, expect_scores_at_least, expect_status, expect_success,
    threshold_percentage, ErrorField, StatusExpectation,
};
use rfq_verifier::core::scenarios::determinism::{check_consistency, TopResult};
use rfq_verifier::core::scenarios::response_completeness::FieldGroup;
use rfq_verifier::core::ScenarioFailure;
use rfq_verifier::models::{Envelope, FreeTextRequest, MatchedProduct};
use rfq_verifier::ApiResponse;
use serde_json::{json, Value};

fn response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn products_body(products: Value) -> Value {
    json!({ "result": { "matchedItems": [{ "matchedInternalProducts": products }] } })
}

#[test]
fn test_success_requires_result_envelope() {
    let resp = response(200, json!({ "data": [] }));
    let err = expect_success(&resp).unwrap_err();
    match err {
        ScenarioFailure::SchemaDrift { path, actual, .. } => {
            assert_eq!(path, "result");
            assert_eq!(actual, "missing");
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn test_success_with_error_envelope_is_drift() {
    let resp = response(200, json!({ "error_code": "Oops" }));
    let err = expect_success(&resp).unwrap_err();
    assert!(err.to_string().contains("error envelope"));
}

#[test]
fn test_missing_first_item_means_no_products() {
    let resp = response(200, json!({ "result": { "matchedItems": [] } }));
    let envelope = expect_success(&resp).unwrap();
    assert!(envelope.products().is_empty());
    assert!(expect_products(&envelope).is_err());
}

#[test]
fn test_success_rejected_on_server_error() {
    let resp = response(503, json!({ "title": "Service Unavailable" }));
    let err = expect_success(&resp).unwrap_err();
    assert!(matches!(err, ScenarioFailure::ServerError { status: 503, .. }));
}

#[test]
fn test_rejection_requires_identifier() {
    let resp = response(400, json!({ "message": "bad" }));
    let err =
        expect_rejection(&resp, StatusExpectation::Exact(400), ErrorField::Code, &[]).unwrap_err();
    assert!(matches!(err, ScenarioFailure::MissingField { ref path, .. } if path == "error_code"));
}

#[test]
fn test_rejection_forbids_success_fields() {
    let resp = response(400, json!({ "error_code": "BadRequest", "matchedProducts": [] }));
    let err = expect_rejection(
        &resp,
        StatusExpectation::Exact(400),
        ErrorField::Code,
        &["matchedProducts"],
    )
    .unwrap_err();
    assert_eq!(err.kind(), "envelope");
}

#[test]
fn test_unreachable_status_set() {
    let expected = StatusExpectation::OneOf(&[400, 421, 422]);
    assert!(expect_status(&response(421, json!({})), expected).is_ok());
    assert_eq!(expect_status(&response(404, json!({})), expected).unwrap_err().kind(), "status");
    let err = expect_status(&response(500, json!({})), expected).unwrap_err();
    assert_eq!(err.kind(), "server-error");
}

#[test]
fn test_scores_against_threshold() {
    let body = products_body(json!([
        { "name": "Cutting Board", "percentage": 99 },
        { "name": "Board Oil", "percentage": 80 }
    ]));
    let envelope = expect_success(&response(200, body)).unwrap();
    assert!(expect_scores_at_least(envelope.products(), threshold_percentage(0.8)).is_ok());
    assert!(expect_scores_at_least(envelope.products(), threshold_percentage(0.99)).is_err());
}

#[test]
fn test_score_missing_is_drift() {
    let body = products_body(json!([{ "name": "Cutting Board", "similarityScore": 0.9 }]));
    let envelope = expect_success(&response(200, body)).unwrap();
    let err = expect_scores_at_least(envelope.products(), 0.0).unwrap_err();
    assert!(err.to_string().contains("matchedInternalProducts[0].percentage"));
}

#[test]
fn test_envelope_classification_of_validation_errors() {
    let body = json!({ "errors": { "Text": ["required"] } });
    assert!(matches!(Envelope::classify(&body), Envelope::Error(_)));
}

#[test]
fn test_field_groups_on_product() {
    let product: MatchedProduct = serde_json::from_value(json!({
        "name": "Cutting Board",
        "price": 12.5,
        "sku": "CB-1",
        "vendor": { "name": "" },
        "isStockProduct": "yes",
        "images": []
    }))
    .unwrap();

    assert!(FieldGroup::Price.validate(&product, 0).is_ok());
    assert!(FieldGroup::Sku.validate(&product, 0).is_ok());
    assert!(FieldGroup::VendorStock.validate(&product, 0).is_err());
    assert!(FieldGroup::Images.validate(&product, 0).is_err());
}

#[test]
fn test_consistency_tolerance_boundary() {
    let observed: Vec<TopResult> = [97.0, 99.0, 98.0, 97.0, 99.0]
        .iter()
        .map(|score| TopResult { name: "Green Board".to_string(), score: *score })
        .collect();
    assert!(check_consistency(&observed, 2.0).is_ok());
    assert!(check_consistency(&observed, 1.0).is_err());
}

#[test]
fn test_request_fixtures_are_independent() {
    let base = FreeTextRequest::new("container");
    let narrowed = base.clone().top_k(1);
    assert_eq!(base.top_k, 3);
    assert_eq!(narrowed.top_k, 1);
}
