use serde::Deserialize;
use serde_json::{Map, Value};

/// Decoded response body, tagged by shape
#[derive(Debug, Clone)]
pub enum Envelope {
    Success(SuccessEnvelope),
    Error(ErrorEnvelope),
    /// Body matched neither known shape
    Unrecognized(Value),
}

impl Envelope {
    /// Classify a JSON body.
    ///
    /// A body carrying `result` must deserialize as a success envelope; one
    /// carrying `error_code` or `errors` as an error envelope. Anything else,
    /// including a `result` of the wrong shape, is `Unrecognized`.
    pub fn classify(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return Envelope::Unrecognized(body.clone());
        };

        if obj.contains_key("result") {
            return serde_json::from_value(body.clone())
                .map(Envelope::Success)
                .unwrap_or_else(|_| Envelope::Unrecognized(body.clone()));
        }

        if obj.contains_key("error_code") || obj.contains_key("errors") {
            return serde_json::from_value(body.clone())
                .map(Envelope::Error)
                .unwrap_or_else(|_| Envelope::Unrecognized(body.clone()));
        }

        Envelope::Unrecognized(body.clone())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Success(_) => "success envelope",
            Envelope::Error(_) => "error envelope",
            Envelope::Unrecognized(_) => "unrecognized body",
        }
    }
}

/// `{ result: { summary?, matchedItems: [...] } }`
#[derive(Debug, Clone, Deserialize)]
pub struct SuccessEnvelope {
    pub result: MatchResult,
}

impl SuccessEnvelope {
    /// Products matched for the first RFQ line item, empty when the service
    /// returned no line items.
    pub fn products(&self) -> &[MatchedProduct] {
        self.result
            .matched_items
            .first()
            .map(|item| item.matched_internal_products.as_slice())
            .unwrap_or(&[])
    }

    pub fn product_names(&self) -> Vec<&str> {
        self.products().iter().filter_map(MatchedProduct::name).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchResult {
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(rename = "matchedItems")]
    pub matched_items: Vec<MatchedItem>,
}

/// Extraction summary returned by the URL endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Summary {
    #[serde(rename = "vectorSearchQuery", default)]
    pub vector_search_query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchedItem {
    #[serde(rename = "matchedInternalProducts", default)]
    pub matched_internal_products: Vec<MatchedProduct>,
}

/// `{ error_code, errors? }`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One catalog product as returned by the service.
///
/// Kept as a raw JSON object: the service guarantees no schema, and the
/// verifier reports drift field by field.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MatchedProduct(Map<String, Value>);

impl MatchedProduct {
    /// Look up a dotted path such as `vendor.name` or `images.0.path`
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Match score on the 0-100 scale
    pub fn percentage(&self) -> Option<f64> {
        self.0.get("percentage").and_then(Value::as_f64)
    }
}
