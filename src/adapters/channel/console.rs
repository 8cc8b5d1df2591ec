//! Console channel: replies go to stdout, one line per message.

use async_trait::async_trait;
use tokio::io::{self, AsyncWriteExt};

use crate::domain::foundation::{Channel, UserKey};
use crate::ports::{MessageSender, SendError};

/// Prints every reply prefixed with the bot name.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSender;

impl ConsoleSender {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn render(text: &str) -> String {
    format!("DECSA> {}\n", text)
}

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, user: &UserKey, text: &str) -> Result<(), SendError> {
        if user.channel() != Channel::Console {
            return Err(SendError::InvalidRecipient(user.to_string()));
        }
        let mut stdout = io::stdout();
        stdout
            .write_all(render(text).as_bytes())
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }
}
