//! HTTP Feedback Sink - Posts conversation ratings to the feedback service.
//!
//! Body: `{ "name": "Bob", "rating": 4 }`. Any 2xx is success; the response
//! body is ignored.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::debug;

use crate::adapters::lookup::join_url;
use crate::domain::dialogue::FeedbackSubmission;
use crate::ports::{FeedbackError, FeedbackSink};

#[derive(Debug, Clone)]
pub struct HttpFeedbackConfig {
    pub base_url: String,
    /// Endpoint path (default: `/api/feedback`).
    pub path: String,
    pub timeout: Duration,
    api_token: Option<Secret<String>>,
}

impl HttpFeedbackConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: "/api/feedback".to_string(),
            timeout: Duration::from_secs(10),
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

    pub fn endpoint(&self) -> String {
        join_url(&self.base_url, &self.path)
    }
}

pub struct HttpFeedbackSink {
    config: HttpFeedbackConfig,
    client: Client,
}

impl HttpFeedbackSink {
    /// # Errors
    ///
    /// Returns `FeedbackError::Network` if the HTTP client cannot be built.
    pub fn new(config: HttpFeedbackConfig) -> Result<Self, FeedbackError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FeedbackError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl FeedbackSink for HttpFeedbackSink {
    async fn submit(&self, submission: FeedbackSubmission) -> Result<(), FeedbackError> {
        debug!(rating = submission.rating.stars(), "Posting feedback");

        let mut builder = self
            .client
            .post(self.config.endpoint())
            .header("Content-Type", "application/json")
            .json(&submission);
        if let Some(token) = &self.config.api_token {
            builder = builder.header("Authorization", format!("Bearer {}", token.expose_secret()));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FeedbackError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                FeedbackError::Network(format!("Connection failed: {}", e))
            } else {
                FeedbackError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(FeedbackError::Status {
                status: status.as_u16(),
            })
        }
    }
}
