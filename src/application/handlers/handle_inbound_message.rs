//! HandleInboundMessage command handler.
//!
//! Runs one conversation turn for a channel-qualified user: records the
//! message in history, advances the conversation engine, delivers the
//! replies and commits the new state. Turns of the same user are serialised.
//!
//! State is committed only after every reply was delivered. When the engine
//! fails, the conversation is forced back to `inicio` and the user receives
//! the generic apology.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;

use super::TurnLocks;
use crate::domain::conversation::{
    history, replies, ConversationEngine, ConversationState, EngineError, Phase, StateField,
    StateRecord,
};
use crate::domain::foundation::{TurnId, UserKey};
use crate::ports::{ConversationStore, MessageSender, SendError, StoreError};

/// Command carrying one inbound text message.
#[derive(Debug, Clone)]
pub struct HandleInboundMessageCommand {
    pub user: UserKey,
    pub text: String,
}

impl HandleInboundMessageCommand {
    pub fn new(user: UserKey, text: impl Into<String>) -> Self {
        Self {
            user,
            text: text.into(),
        }
    }
}

/// What a turn did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReport {
    /// Whitespace-only input; nothing happened.
    Ignored,
    /// The engine completed the turn.
    Completed {
        turn_id: TurnId,
        phase: Phase,
        replies: Vec<String>,
    },
    /// The engine failed; the conversation was reset and the apology sent.
    Recovered { turn_id: TurnId },
}

impl TurnReport {
    /// Phase the user is in after the turn, if the turn ran.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            TurnReport::Ignored => None,
            TurnReport::Completed { phase, .. } => Some(*phase),
            TurnReport::Recovered { .. } => Some(Phase::Inicio),
        }
    }
}

/// Failures reported back to the channel adapter.
#[derive(Debug, Error)]
pub enum HandleMessageError {
    #[error("Conversation store error: {0}")]
    Store(#[from] StoreError),

    #[error("Conversation store timed out after {0:?}")]
    StoreTimeout(Duration),

    #[error("Reply delivery failed: {0}")]
    Delivery(#[from] SendError),
}

/// Handler configuration.
#[derive(Debug, Clone)]
pub struct TurnConfig {
    /// History lines given to the classifier and validator.
    pub history_window: usize,
    /// Bound on each store call.
    pub store_timeout: Duration,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            history_window: 5,
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Handler for inbound messages from any channel.
pub struct HandleInboundMessageHandler {
    engine: Arc<ConversationEngine>,
    store: Arc<dyn ConversationStore>,
    sender: Arc<dyn MessageSender>,
    locks: Arc<TurnLocks>,
    config: TurnConfig,
}

impl HandleInboundMessageHandler {
    pub fn new(
        engine: Arc<ConversationEngine>,
        store: Arc<dyn ConversationStore>,
        sender: Arc<dyn MessageSender>,
        config: TurnConfig,
    ) -> Self {
        Self {
            engine,
            store,
            sender,
            locks: Arc::new(TurnLocks::new()),
            config,
        }
    }

    /// Lock registry to share with the reset handler.
    pub fn locks(&self) -> Arc<TurnLocks> {
        self.locks.clone()
    }

    pub async fn handle(
        &self,
        cmd: HandleInboundMessageCommand,
    ) -> Result<TurnReport, HandleMessageError> {
        let text = cmd.text.trim();
        if text.is_empty() {
            tracing::debug!(user = %cmd.user, "Ignoring empty message");
            return Ok(TurnReport::Ignored);
        }

        let turn_id = TurnId::new();
        let span = tracing::info_span!("turn", user = %cmd.user, turn_id = %turn_id);

        async {
            let _guard = self.locks.acquire(&cmd.user).await;
            self.run_turn(&cmd.user, text, turn_id).await
        }
        .instrument(span)
        .await
    }

    async fn run_turn(
        &self,
        user: &UserKey,
        text: &str,
        turn_id: TurnId,
    ) -> Result<TurnReport, HandleMessageError> {
        self.bounded(self.store.append_history(user, &history::user_line(text)))
            .await?;
        let lines = self
            .bounded(self.store.recent_history(user, self.config.history_window))
            .await?;
        let context = history::context(&lines, self.config.history_window);

        let record = self.bounded(self.store.get_state(user)).await?;

        let incoming = ConversationState::try_from(&record);
        let result = match &incoming {
            Ok(state) => {
                tracing::debug!(phase = %state.phase(), "Turn started");
                self.engine.process(state.clone(), text, &context).await
            }
            Err(e) => Err(EngineError::from(e.clone())),
        };

        match result {
            Ok(outcome) => {
                self.deliver(user, &outcome.replies).await?;
                // A turn that keeps the state writes nothing.
                if incoming.as_ref().ok() != Some(&outcome.state) {
                    let next = StateRecord::from(&outcome.state);
                    self.commit(user, &record, &next).await?;
                }

                tracing::info!(
                    phase = %outcome.state.phase(),
                    replies = outcome.replies.len(),
                    "Turn completed"
                );
                Ok(TurnReport::Completed {
                    turn_id,
                    phase: outcome.state.phase(),
                    replies: outcome.replies,
                })
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    code = %error.code(),
                    phase = record.get(StateField::Fase).unwrap_or("inicio"),
                    "Turn failed, resetting conversation"
                );
                let inicio = StateRecord::from(&ConversationState::Inicio);
                self.commit(user, &record, &inicio).await?;
                self.deliver(user, &[replies::apology()]).await?;
                Ok(TurnReport::Recovered { turn_id })
            }
        }
    }

    /// Sends replies in order, recording each delivered one in history.
    async fn deliver(&self, user: &UserKey, messages: &[String]) -> Result<(), HandleMessageError> {
        for message in messages {
            if let Err(e) = self.sender.send(user, message).await {
                tracing::warn!(error = %e, "Reply delivery failed, state not committed");
                return Err(e.into());
            }
            self.bounded(self.store.append_history(user, &history::bot_line(message)))
                .await?;
        }
        Ok(())
    }

    async fn commit(
        &self,
        user: &UserKey,
        current: &StateRecord,
        next: &StateRecord,
    ) -> Result<(), HandleMessageError> {
        let changes = current.diff(next);
        if changes.is_empty() {
            return Ok(());
        }
        self.bounded(self.store.commit(user, &changes)).await
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, HandleMessageError> {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(result) => result.map_err(HandleMessageError::from),
            Err(_) => Err(HandleMessageError::StoreTimeout(self.config.store_timeout)),
        }
    }
}
