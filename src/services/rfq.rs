use crate::config::Settings;
use crate::constants::endpoints;
use crate::models::{Envelope, FreeTextRequest, UrlHtmlRequest};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Longest body excerpt carried into failure diagnostics
const SNIPPET_LEN: usize = 300;

/// Errors that can occur before a status line is received
#[derive(Debug, Error)]
pub enum RfqError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl RfqError {
    fn classify(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RfqError::Timeout(timeout)
        } else if err.is_connect() {
            RfqError::Connect(err.to_string())
        } else if err.is_builder() {
            RfqError::InvalidUrl(err.to_string())
        } else {
            RfqError::RequestError(err)
        }
    }
}

/// Status and body of one RFQ API exchange
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded body, `None` when the body is not JSON
    pub body: Option<Value>,
    pub raw: String,
}

impl ApiResponse {
    pub fn new(status: u16, raw: String) -> Self {
        let body = serde_json::from_str(&raw).ok();
        Self { status, body, raw }
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn envelope(&self) -> Option<Envelope> {
        self.body.as_ref().map(Envelope::classify)
    }

    /// Truncated body text for diagnostics
    pub fn snippet(&self) -> String {
        if self.raw.chars().count() <= SNIPPET_LEN {
            return self.raw.clone();
        }
        let cut: String = self.raw.chars().take(SNIPPET_LEN).collect();
        format!("{}…", cut)
    }
}

/// RFQ API client
///
/// Every request carries `Authorization: ApiKey <key>` and a JSON body.
/// Nothing is retried.
#[derive(Debug, Clone)]
pub struct RfqClient {
    base_url: String,
    api_key: String,
    client: Client,
    timeout: Duration,
}

impl RfqClient {
    /// Create a new RFQ client
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, RfqError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            timeout,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RfqError> {
        Self::new(
            settings.api.base_url.clone(),
            settings.api.api_key.clone(),
            settings.runner.default_timeout(),
        )
    }

    /// Same connection pool, different per-request timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn upload_free_text(
        &self,
        request: &FreeTextRequest,
    ) -> Result<ApiResponse, RfqError> {
        self.post_json(endpoints::FREE_TEXT, request).await
    }

    pub async fn upload_url_html(&self, request: &UrlHtmlRequest) -> Result<ApiResponse, RfqError> {
        self.post_json(endpoints::URL_HTML, request).await
    }

    /// POST a JSON body and collect status plus body text
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, RfqError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let started = Instant::now();

        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("ApiKey {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| RfqError::classify(e, self.timeout))?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| RfqError::classify(e, self.timeout))?;

        tracing::debug!("POST {} -> {} in {:?}", path, status, started.elapsed());

        Ok(ApiResponse::new(status, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfq_client_creation() {
        let client = RfqClient::new(
            "https://rfq.test".to_string(),
            "test_key".to_string(),
            Duration::from_secs(30),
        )
        .unwrap();

        assert_eq!(client.base_url, "https://rfq.test");
        assert_eq!(client.api_key, "test_key");

        let slow = client.with_timeout(Duration::from_secs(120));
        assert_eq!(slow.timeout(), Duration::from_secs(120));
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_non_json_body() {
        let response = ApiResponse::new(502, "<html>Bad Gateway</html>".to_string());
        assert!(response.body.is_none());
        assert!(response.is_server_error());
        assert!(response.envelope().is_none());
    }

    #[test]
    fn test_snippet_truncates() {
        let response = ApiResponse::new(200, "x".repeat(1000));
        assert_eq!(response.snippet().chars().count(), SNIPPET_LEN + 1);
    }
}
