use serde::Serialize;

use crate::constants::defaults;

/// Body for `POST /api/rfq/upload-free-text`
///
/// `text` and `enablePrivateLabelRanking` are optional so that scenarios can
/// send bodies with those fields omitted entirely.
#[derive(Debug, Clone, Serialize)]
pub struct FreeTextRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: i64,
    pub threshold: f64,
    #[serde(
        rename = "enablePrivateLabelRanking",
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_private_label_ranking: Option<bool>,
}

impl FreeTextRequest {
    /// Query with default `topK` and `threshold` and no ranking flag
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            top_k: defaults::TOP_K,
            threshold: defaults::THRESHOLD,
            enable_private_label_ranking: None,
        }
    }

    /// Request with the `text` field left out
    pub fn without_text() -> Self {
        Self {
            text: None,
            ..Self::new("")
        }
    }

    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn private_label_ranking(mut self, enabled: bool) -> Self {
        self.enable_private_label_ranking = Some(enabled);
        self
    }
}

/// Body for `POST /api/rfq/upload-url-html`
#[derive(Debug, Clone, Serialize)]
pub struct UrlHtmlRequest {
    pub url: String,
    #[serde(rename = "topK")]
    pub top_k: i64,
    pub threshold: f64,
}

impl UrlHtmlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            top_k: defaults::TOP_K,
            threshold: defaults::THRESHOLD,
        }
    }

    pub fn top_k(mut self, top_k: i64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_text_is_omitted() {
        let request = FreeTextRequest::without_text().private_label_ranking(false);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({ "topK": 3, "threshold": 0.5, "enablePrivateLabelRanking": false })
        );
    }

    #[test]
    fn test_flag_omitted_unless_set() {
        let body = serde_json::to_value(FreeTextRequest::new("container").top_k(10)).unwrap();
        assert_eq!(body, json!({ "text": "container", "topK": 10, "threshold": 0.5 }));
    }

    #[test]
    fn test_url_request_shape() {
        let body = serde_json::to_value(UrlHtmlRequest::new("").threshold(0.3)).unwrap();
        assert_eq!(body, json!({ "url": "", "topK": 3, "threshold": 0.3 }));
    }
}
