//! Conversation engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// History lines passed to the classifier and validator
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Automatic phase steps allowed in one turn
    #[serde(default = "default_max_cascade_hops")]
    pub max_cascade_hops: usize,

    /// Bound on each external call made by the engine, in seconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl ConversationConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        if self.max_cascade_hops == 0 {
            return Err(ValidationError::InvalidCascadeLimit);
        }
        if self.call_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("conversation"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_cascade_hops: default_max_cascade_hops(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_history_window() -> usize {
    5
}

fn default_max_cascade_hops() -> usize {
    3
}

fn default_call_timeout() -> u64 {
    35
}
