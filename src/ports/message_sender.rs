//! Message Sender Port - Outbound delivery on a user's channel.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Recipient not reachable on this channel: {0}")]
    InvalidRecipient(String),
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver one text message; `Ok` means the channel acknowledged it
    async fn send(&self, user: &UserKey, text: &str) -> Result<(), SendError>;
}
