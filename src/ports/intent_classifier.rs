//! Intent Classifier Port - Free text to intent, backed by a language model.
//!
//! Implementations return the model's raw answer. Parsing and fallbacks
//! live in the domain (`IntentResult::parse`), so a misbehaving model can
//! never break a turn.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from language-model backed collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Model not configured")]
    NotConfigured,
}

impl AiError {
    pub fn network(msg: impl Into<String>) -> Self {
        AiError::Network(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        AiError::Provider(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        AiError::Parse(msg.into())
    }

    /// Returns true if the same request may succeed when retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::Network(_) | AiError::Timeout | AiError::RateLimited { .. } | AiError::Provider(_)
        )
    }
}

/// Port for classifying the intent of an inbound message
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify `text` given the joined recent `history`
    ///
    /// # Returns
    /// The raw model answer, expected to be a JSON object with
    /// `intencion` and `respuesta` keys
    async fn classify(&self, text: &str, history: &str) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(AiError::Timeout.is_retryable());
        assert!(AiError::network("reset").is_retryable());
        assert!(AiError::RateLimited { retry_after_secs: 3 }.is_retryable());
    }

    #[test]
    fn permanent_failures_are_not_retryable() {
        assert!(!AiError::AuthenticationFailed.is_retryable());
        assert!(!AiError::InvalidRequest("bad".into()).is_retryable());
        assert!(!AiError::NotConfigured.is_retryable());
    }
}
