//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid service URL for {0}: must start with http:// or https://")]
    InvalidServiceUrl(&'static str),

    #[error("Invalid request timeout for {0}")]
    InvalidTimeout(&'static str),

    #[error("Delay {name} of {millis}ms exceeds the {max}ms limit")]
    DelayTooLong {
        name: &'static str,
        millis: u64,
        max: u64,
    },

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
