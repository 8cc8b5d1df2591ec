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

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid timeout for {0}: must be at least one second")]
    InvalidTimeout(&'static str),

    #[error("Invalid OpenAI base URL")]
    InvalidBaseUrl,

    #[error("Temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error("History window must be at least 1")]
    InvalidHistoryWindow,

    #[error("Cascade hop limit must be at least 1")]
    InvalidCascadeLimit,

    #[error("Conversation call timeout ({call_secs}s) must exceed the AI request timeout ({ai_secs}s)")]
    CallTimeoutTooShort { call_secs: u64, ai_secs: u64 },

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
