//! Lookup and feedback service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::{HttpFeedbackConfig, HttpLookupConfig};

/// Property lookup service
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Endpoint path
    #[serde(default = "default_lookup_path")]
    pub path: String,

    /// Request timeout in seconds
    #[serde(default = "default_lookup_timeout")]
    pub timeout_secs: u64,

    /// Bearer token, if the service requires one
    pub api_token: Option<Secret<String>>,
}

/// Feedback service
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    /// Service base URL; falls back to the lookup service's
    pub base_url: Option<String>,

    /// Endpoint path
    #[serde(default = "default_feedback_path")]
    pub path: String,

    /// Request timeout in seconds
    #[serde(default = "default_feedback_timeout")]
    pub timeout_secs: u64,
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_url("lookup.base_url", &self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("lookup"));
        }
        Ok(())
    }

    /// Adapter configuration for [`crate::adapters::HttpPropertyLookup`]
    pub fn adapter_config(&self) -> HttpLookupConfig {
        let config = HttpLookupConfig::new(&self.base_url)
            .with_path(&self.path)
            .with_timeout(self.timeout());
        match &self.api_token {
            Some(token) => config.with_api_token(token.clone()),
            None => config,
        }
    }
}

impl FeedbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.base_url {
            validate_url("feedback.base_url", url)?;
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("feedback"));
        }
        Ok(())
    }

    /// Adapter configuration for [`crate::adapters::HttpFeedbackSink`]
    pub fn adapter_config(&self, lookup: &LookupConfig) -> HttpFeedbackConfig {
        let base_url = self.base_url.as_deref().unwrap_or(&lookup.base_url);
        let config = HttpFeedbackConfig::new(base_url)
            .with_path(&self.path)
            .with_timeout(self.timeout());
        match &lookup.api_token {
            Some(token) => config.with_api_token(token.clone()),
            None => config,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_lookup_path(),
            timeout_secs: default_lookup_timeout(),
            api_token: None,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: default_feedback_path(),
            timeout_secs: default_feedback_timeout(),
        }
    }
}

fn validate_url(name: &'static str, url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::MissingRequired(name));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidServiceUrl(name));
    }
    Ok(())
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_lookup_path() -> String {
    "/api/chatbot".to_string()
}

fn default_feedback_path() -> String {
    "/api/feedback".to_string()
}

fn default_lookup_timeout() -> u64 {
    15
}

fn default_feedback_timeout() -> u64 {
    10
}
