//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KOBY_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use koby_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Lookups go to {}", config.lookup.base_url);
//! ```

mod dialogue;
mod error;
mod logging;
mod service;

pub use dialogue::DialogueConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use service::{FeedbackConfig, LookupConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration pointing at a local lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Assistant reply delays
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Property lookup service
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Feedback service
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `KOBY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `KOBY__LOOKUP__BASE_URL=https://...` -> `lookup.base_url = ...`
    /// - `KOBY__DIALOGUE__THINKING_DELAY_MS=500` -> `dialogue.thinking_delay_ms = 500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("KOBY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.dialogue.validate()?;
        self.lookup.validate()?;
        self.feedback.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
