//! ResetConversation command handler.
//!
//! Forgets a user's conversation (state and history) and greets them again.
//! Channels map their start/reset commands here.

use std::sync::Arc;

use super::{HandleMessageError, TurnLocks};
use crate::domain::conversation::replies;
use crate::domain::foundation::UserKey;
use crate::ports::{ConversationStore, MessageSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// First contact: reply with the welcome greeting.
    Start,
    /// Explicit memory wipe: reply with the reset notice.
    Reset,
}

pub struct ResetConversationHandler {
    store: Arc<dyn ConversationStore>,
    sender: Arc<dyn MessageSender>,
    locks: Arc<TurnLocks>,
}

impl ResetConversationHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        sender: Arc<dyn MessageSender>,
        locks: Arc<TurnLocks>,
    ) -> Self {
        Self {
            store,
            sender,
            locks,
        }
    }

    pub async fn handle(&self, user: &UserKey, kind: ResetKind) -> Result<(), HandleMessageError> {
        let _guard = self.locks.acquire(user).await;

        self.store.reset(user).await?;
        tracing::info!(user = %user, kind = ?kind, "Conversation memory cleared");

        let reply = match kind {
            ResetKind::Start => replies::welcome(),
            ResetKind::Reset => replies::conversation_reset(),
        };
        self.sender.send(user, &reply).await?;
        Ok(())
    }
}
