//! HTTP Property Lookup - Implementation of PropertyLookup over JSON/HTTP.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpLookupConfig::new("https://zoning.example.com")
//!     .with_path("/api/chatbot")
//!     .with_timeout(Duration::from_secs(15));
//!
//! let lookup = HttpPropertyLookup::new(config)?;
//! ```
//!
//! Requests are never retried. The dialogue shows one generic message for
//! every transport failure, so the error variants only matter for logs.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::dialogue::LookupRequest;
use crate::ports::{LookupError, LookupResponse, PropertyLookup};

/// Longest error body kept in `LookupError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the HTTP lookup adapter.
#[derive(Debug, Clone)]
pub struct HttpLookupConfig {
    /// Service base URL, without trailing slash.
    pub base_url: String,
    /// Endpoint path (default: `/api/chatbot`).
    pub path: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Optional bearer token.
    api_token: Option<Secret<String>>,
}

impl HttpLookupConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: "/api/chatbot".to_string(),
            timeout: Duration::from_secs(15),
            api_token: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_token(mut self, token: Secret<String>) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, &self.path)
    }

    fn api_token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

/// Property lookup backed by the zoning HTTP service.
pub struct HttpPropertyLookup {
    config: HttpLookupConfig,
    client: Client,
}

impl HttpPropertyLookup {
    /// Creates the adapter.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Network` if the HTTP client cannot be built.
    pub fn new(config: HttpLookupConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LookupError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpLookupConfig {
        &self.config
    }

    async fn send(&self, request: &LookupRequest) -> Result<Response, LookupError> {
        let mut builder = self
            .client
            .post(self.config.endpoint())
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(token) = self.config.api_token() {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        builder.send().await.map_err(|e| self.map_transport_error(e))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> LookupError {
        if e.is_timeout() {
            LookupError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            LookupError::Network(format!("Connection failed: {}", e))
        } else {
            LookupError::Network(e.to_string())
        }
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, LookupError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        truncate_on_char_boundary(&mut body, MAX_ERROR_BODY);
        Err(LookupError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PropertyLookup for HttpPropertyLookup {
    async fn lookup(&self, request: LookupRequest) -> Result<LookupResponse, LookupError> {
        debug!(option = %request.option, endpoint = %self.config.endpoint(), "Sending property lookup");

        let response = self.send(&request).await?;
        let response = self.handle_response_status(response).await.map_err(|e| {
            warn!(error = %e, "Lookup service rejected request");
            e
        })?;

        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        serde_json::from_str::<LookupResponse>(&text).map_err(|e| LookupError::Parse(e.to_string()))
    }
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
