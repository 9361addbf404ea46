//! Assertion primitives shared by all scenario groups.
//!
//! Every check returns `Result<_, ScenarioFailure>` so scenarios read as a
//! linear sequence of `?`-propagated expectations.

use crate::models::{Envelope, MatchedProduct, SuccessEnvelope};
use crate::services::{ApiResponse, RfqError};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Acceptable status codes for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusExpectation {
    Exact(u16),
    OneOf(&'static [u16]),
}

impl StatusExpectation {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusExpectation::Exact(code) => *code == status,
            StatusExpectation::OneOf(codes) => codes.contains(&status),
        }
    }
}

impl fmt::Display for StatusExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusExpectation::Exact(code) => write!(f, "{}", code),
            StatusExpectation::OneOf(codes) => write!(f, "one of {:?}", codes),
        }
    }
}

/// Why a scenario failed
#[derive(Debug, Error)]
pub enum ScenarioFailure {
    #[error("request failed: {0}")]
    Transport(#[from] RfqError),

    #[error("server error {status} (unhandled exception leaked): {body}")]
    ServerError { status: u16, body: String },

    #[error("expected status {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        expected: StatusExpectation,
        actual: u16,
        body: String,
    },

    #[error("response body is not JSON (status {status}): {body}")]
    NotJson { status: u16, body: String },

    #[error("expected field `{path}` missing from response: {body}")]
    MissingField { path: String, body: String },

    #[error("unexpected field `{path}` present in response: {body}")]
    UnexpectedField { path: String, body: String },

    #[error("schema drift at `{path}`: expected {expected}, got {actual}")]
    SchemaDrift {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    Assertion(String),

    #[error("scenario timed out after {0:?}")]
    Timeout(Duration),
}

impl ScenarioFailure {
    /// Short category label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioFailure::Transport(_) => "transport",
            ScenarioFailure::ServerError { .. } => "server-error",
            ScenarioFailure::UnexpectedStatus { .. } => "status",
            ScenarioFailure::NotJson { .. } => "not-json",
            ScenarioFailure::MissingField { .. } | ScenarioFailure::UnexpectedField { .. } => {
                "envelope"
            }
            ScenarioFailure::SchemaDrift { .. } => "schema-drift",
            ScenarioFailure::Assertion(_) => "assertion",
            ScenarioFailure::Timeout(_) => "timeout",
        }
    }
}

/// Fail with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), ScenarioFailure> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioFailure::Assertion(message()))
    }
}

/// Check the status line. A 5xx outside the expectation is always reported
/// as a server error, never as a plain status mismatch.
pub fn expect_status(
    response: &ApiResponse,
    expected: StatusExpectation,
) -> Result<(), ScenarioFailure> {
    if expected.accepts(response.status) {
        return Ok(());
    }
    if response.is_server_error() {
        return Err(ScenarioFailure::ServerError {
            status: response.status,
            body: response.snippet(),
        });
    }
    Err(ScenarioFailure::UnexpectedStatus {
        expected,
        actual: response.status,
        body: response.snippet(),
    })
}

pub fn json_body(response: &ApiResponse) -> Result<&Value, ScenarioFailure> {
    response.body.as_ref().ok_or_else(|| ScenarioFailure::NotJson {
        status: response.status,
        body: response.snippet(),
    })
}

/// Require a top-level field on the response body
pub fn expect_field(response: &ApiResponse, field: &str) -> Result<(), ScenarioFailure> {
    let body = json_body(response)?;
    if body.get(field).is_some() {
        Ok(())
    } else {
        Err(ScenarioFailure::MissingField {
            path: field.to_string(),
            body: response.snippet(),
        })
    }
}

/// Require a top-level field to be absent from the response body
pub fn expect_no_field(response: &ApiResponse, field: &str) -> Result<(), ScenarioFailure> {
    let body = json_body(response)?;
    if body.get(field).is_none() {
        Ok(())
    } else {
        Err(ScenarioFailure::UnexpectedField {
            path: field.to_string(),
            body: response.snippet(),
        })
    }
}

/// Field that identifies why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    /// `error_code`: non-empty string
    Code,
    /// `errors`: object or array of model-binding failures
    Errors,
}

impl ErrorField {
    pub fn key(&self) -> &'static str {
        match self {
            ErrorField::Code => "error_code",
            ErrorField::Errors => "errors",
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            ErrorField::Code => "non-empty string",
            ErrorField::Errors => "object or array",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ErrorField::Code => value.as_str().is_some_and(|code| !code.is_empty()),
            ErrorField::Errors => value.is_object() || value.is_array(),
        }
    }
}

/// Require a 400-class rejection: expected status, a well-typed error
/// identifier inside an error envelope, and none of the listed success-only
/// or leaked fields.
pub fn expect_rejection(
    response: &ApiResponse,
    expected: StatusExpectation,
    identifier: ErrorField,
    forbidden: &[&str],
) -> Result<(), ScenarioFailure> {
    expect_status(response, expected)?;
    expect_field(response, identifier.key())?;

    let body = json_body(response)?;
    let value = body.get(identifier.key());
    if !value.is_some_and(|v| identifier.accepts(v)) {
        return Err(ScenarioFailure::SchemaDrift {
            path: identifier.key().to_string(),
            expected: identifier.expected().to_string(),
            actual: describe(value),
        });
    }

    for field in forbidden {
        expect_no_field(response, field)?;
    }

    match Envelope::classify(body) {
        Envelope::Error(envelope) => {
            tracing::debug!(
                "rejected with {} {}: {}",
                response.status,
                envelope.error_code.as_deref().unwrap_or("-"),
                envelope.message.as_deref().unwrap_or("")
            );
            Ok(())
        }
        other => Err(ScenarioFailure::SchemaDrift {
            path: "$".to_string(),
            expected: "error envelope".to_string(),
            actual: format!("{}: {}", other.kind(), response.snippet()),
        }),
    }
}

/// Require a 200 carrying a well-formed success envelope
pub fn expect_success(response: &ApiResponse) -> Result<SuccessEnvelope, ScenarioFailure> {
    expect_status(response, StatusExpectation::Exact(200))?;
    let body = json_body(response)?;
    match Envelope::classify(body) {
        Envelope::Success(envelope) => Ok(envelope),
        Envelope::Error(envelope) => Err(ScenarioFailure::SchemaDrift {
            path: "result".to_string(),
            expected: "success envelope".to_string(),
            actual: format!(
                "error envelope {} {}",
                envelope.error_code.as_deref().unwrap_or("-"),
                envelope.message.as_deref().unwrap_or("")
            ),
        }),
        Envelope::Unrecognized(_) => Err(success_drift(body)),
    }
}

fn drift(path: String, expected: &str, actual: Option<&Value>) -> ScenarioFailure {
    ScenarioFailure::SchemaDrift {
        path,
        expected: expected.to_string(),
        actual: describe(actual),
    }
}

/// Locate the first field of a body that does not fit the success envelope
fn success_drift(body: &Value) -> ScenarioFailure {
    let Some(result) = body.get("result").filter(|r| r.is_object()) else {
        return drift("result".to_string(), "object", body.get("result"));
    };

    match result.get("summary") {
        None | Some(Value::Null) => {}
        Some(summary) if summary.is_object() => {
            if let Some(query) = summary.get("vectorSearchQuery") {
                if !query.is_string() && !query.is_null() {
                    let path = "result.summary.vectorSearchQuery".to_string();
                    return drift(path, "string", Some(query));
                }
            }
        }
        Some(other) => return drift("result.summary".to_string(), "object", Some(other)),
    }

    let Some(items) = result.get("matchedItems").and_then(Value::as_array) else {
        return drift("result.matchedItems".to_string(), "array", result.get("matchedItems"));
    };

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("result.matchedItems[{}]", i);
        if !item.is_object() {
            return drift(item_path, "object", Some(item));
        }
        let Some(products) = item.get("matchedInternalProducts") else {
            continue;
        };
        let Some(products) = products.as_array() else {
            return drift(format!("{}.matchedInternalProducts", item_path), "array", Some(products));
        };
        for (j, product) in products.iter().enumerate() {
            if !product.is_object() {
                return drift(
                    format!("{}.matchedInternalProducts[{}]", item_path, j),
                    "object",
                    Some(product),
                );
            }
        }
    }

    drift("result".to_string(), "success envelope", Some(body))
}

/// Require at least one matched product
pub fn expect_products(envelope: &SuccessEnvelope) -> Result<&[MatchedProduct], ScenarioFailure> {
    let products = envelope.products();
    ensure(!products.is_empty(), || {
        "expected at least one matched product, got 0".to_string()
    })?;
    Ok(products)
}

/// JSON primitive kinds a product field can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Describe an observed value for drift reports, e.g. `string ""`
pub fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(v) => format!("{} {}", type_name(v), v),
    }
}

pub fn product_path(index: usize, path: &str) -> String {
    format!("matchedInternalProducts[{}].{}", index, path)
}

/// Require `path` on the product at `index` to exist with type `ty`
pub fn require_field<'a>(
    product: &'a MatchedProduct,
    index: usize,
    path: &str,
    ty: FieldType,
) -> Result<&'a Value, ScenarioFailure> {
    match product.field(path) {
        Some(value) if ty.matches(value) => Ok(value),
        other => Err(ScenarioFailure::SchemaDrift {
            path: product_path(index, path),
            expected: ty.name().to_string(),
            actual: describe(other),
        }),
    }
}

/// Fail with a drift report unless `constraint` holds for the field value
pub fn constrain_field(
    index: usize,
    path: &str,
    value: &Value,
    expected: &str,
    constraint: bool,
) -> Result<(), ScenarioFailure> {
    if constraint {
        return Ok(());
    }
    Err(ScenarioFailure::SchemaDrift {
        path: product_path(index, path),
        expected: expected.to_string(),
        actual: describe(Some(value)),
    })
}

pub fn product_name(product: &MatchedProduct, index: usize) -> Result<&str, ScenarioFailure> {
    let value = require_field(product, index, "name", FieldType::String)?;
    Ok(value.as_str().unwrap_or_default())
}

/// Match score on the 0-100 scale
pub fn product_score(product: &MatchedProduct, index: usize) -> Result<f64, ScenarioFailure> {
    let value = require_field(product, index, "percentage", FieldType::Number)?;
    Ok(value.as_f64().unwrap_or_default())
}

/// Convert a 0-1 threshold to the service's 0-100 percentage scale
pub fn threshold_percentage(threshold: f64) -> f64 {
    (threshold * 100.0).round()
}

/// Every product must score at least `min` percent
pub fn expect_scores_at_least(
    products: &[MatchedProduct],
    min: f64,
) -> Result<(), ScenarioFailure> {
    for (index, product) in products.iter().enumerate() {
        let score = product_score(product, index)?;
        ensure(score >= min, || {
            format!(
                "{} scored {} below threshold {}",
                product.name().unwrap_or("<unnamed>"),
                score,
                min
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BAD_REQUEST: StatusExpectation = StatusExpectation::Exact(400);

    fn response(status: u16, body: Value) -> ApiResponse {
        ApiResponse::new(status, body.to_string())
    }

    #[test]
    fn test_server_error_is_distinct() {
        let resp = response(500, json!({ "traceId": "abc" }));
        let err = expect_status(&resp, StatusExpectation::Exact(400)).unwrap_err();
        assert_eq!(err.kind(), "server-error");

        let resp = response(200, json!({}));
        let err = expect_status(&resp, StatusExpectation::Exact(400)).unwrap_err();
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_one_of_statuses() {
        let expected = StatusExpectation::OneOf(&[400, 421, 422]);
        assert!(expected.accepts(421));
        assert!(!expected.accepts(404));
        assert_eq!(expected.to_string(), "one of [400, 421, 422]");
    }

    #[test]
    fn test_rejection_checks_forbidden_fields() {
        let resp = response(400, json!({ "error_code": "BadRequest", "traceId": "t-1" }));
        let err = expect_rejection(&resp, BAD_REQUEST, ErrorField::Code, &["traceId"]).unwrap_err();
        assert!(matches!(
            err,
            ScenarioFailure::UnexpectedField { ref path, .. } if path == "traceId"
        ));
    }

    #[test]
    fn test_rejection_types_identifier() {
        for bad in [json!(42), json!(null), json!({ "x": 1 }), json!("")] {
            let resp = response(400, json!({ "error_code": bad }));
            let err = expect_rejection(&resp, BAD_REQUEST, ErrorField::Code, &[]).unwrap_err();
            let drifted = matches!(
                err,
                ScenarioFailure::SchemaDrift { ref path, .. } if path == "error_code"
            );
            assert!(drifted, "{bad} accepted as error_code: {err}");
        }

        let resp = response(400, json!({ "errors": "Text is required" }));
        let err = expect_rejection(&resp, BAD_REQUEST, ErrorField::Errors, &[]).unwrap_err();
        assert!(err.to_string().contains("expected object or array"));

        let resp = response(400, json!({ "errors": [{ "field": "Text" }] }));
        assert!(expect_rejection(&resp, BAD_REQUEST, ErrorField::Errors, &[]).is_ok());
    }

    #[test]
    fn test_rejection_on_success_envelope() {
        let resp = response(
            400,
            json!({ "error_code": "BadRequest", "result": { "matchedItems": [] } }),
        );
        let err = expect_rejection(&resp, BAD_REQUEST, ErrorField::Code, &[]).unwrap_err();
        match err {
            ScenarioFailure::SchemaDrift { expected, actual, .. } => {
                assert_eq!(expected, "error envelope");
                assert!(actual.starts_with("success envelope"));
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[test]
    fn test_success_drift_names_nested_path() {
        let cases = [
            (
                json!({ "result": { "matchedItems": [{ "matchedInternalProducts": null }] } }),
                "result.matchedItems[0].matchedInternalProducts",
                "null",
            ),
            (
                json!({
                    "result": { "matchedItems": [{ "matchedInternalProducts": [{}, null] }] }
                }),
                "result.matchedItems[0].matchedInternalProducts[1]",
                "null",
            ),
            (
                json!({ "result": { "matchedItems": [[]] } }),
                "result.matchedItems[0]",
                "array []",
            ),
            (
                json!({ "result": { "matchedItems": {} } }),
                "result.matchedItems",
                "object {}",
            ),
            (
                json!({ "result": { "summary": "knife", "matchedItems": [] } }),
                "result.summary",
                "string \"knife\"",
            ),
        ];

        for (body, want_path, want_actual) in cases {
            match expect_success(&response(200, body)).unwrap_err() {
                ScenarioFailure::SchemaDrift { path, actual, .. } => {
                    assert_eq!(path, want_path);
                    assert_eq!(actual, want_actual);
                }
                other => panic!("unexpected failure: {other}"),
            }
        }
    }

    #[test]
    fn test_require_field_reports_drift() {
        let product: MatchedProduct = serde_json::from_value(json!({ "sku": 42 })).unwrap();
        let err = require_field(&product, 2, "sku", FieldType::String).unwrap_err();
        match err {
            ScenarioFailure::SchemaDrift { path, expected, actual } => {
                assert_eq!(path, "matchedInternalProducts[2].sku");
                assert_eq!(expected, "string");
                assert_eq!(actual, "number 42");
            }
            other => panic!("unexpected failure: {other}"),
        }

        let err = require_field(&product, 0, "price", FieldType::Number).unwrap_err();
        assert!(err.to_string().contains("got missing"));
    }

    #[test]
    fn test_threshold_percentage_rounds() {
        assert_eq!(threshold_percentage(0.8), 80.0);
        assert_eq!(threshold_percentage(0.99), 99.0);
        assert_eq!(threshold_percentage(0.0), 0.0);
        assert_eq!(threshold_percentage(0.57), 57.0);
    }
}
