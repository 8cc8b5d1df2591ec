//! Claim Validator Port - Judges whether a complaint description is genuine.

use async_trait::async_trait;

use super::AiError;

/// Port for validating complaint descriptions before registration
#[async_trait]
pub trait ClaimValidator: Send + Sync {
    /// Validate `description` given the joined recent `history`
    ///
    /// # Returns
    /// The raw model answer, expected to be a JSON object with
    /// `es_valido` and `mensaje` keys
    async fn validate(&self, description: &str, history: &str) -> Result<String, AiError>;
}
