//! Recording sender for tests: keeps every delivered message and can be
//! told to reject deliveries.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::UserKey;
use crate::ports::{MessageSender, SendError};

#[derive(Debug, Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<(UserKey, String)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every delivered `(user, text)` pair in order.
    pub async fn sent(&self) -> Vec<(UserKey, String)> {
        self.sent.lock().await.clone()
    }

    /// Texts delivered to one user.
    pub async fn sent_to(&self, user: &UserKey) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Drains and returns the texts delivered to one user.
    pub async fn take(&self, user: &UserKey) -> Vec<String> {
        let mut sent = self.sent.lock().await;
        let (mine, rest): (Vec<_>, Vec<_>) = sent.drain(..).partition(|(to, _)| to == user);
        *sent = rest;
        mine.into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, user: &UserKey, text: &str) -> Result<(), SendError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Transport("channel offline".to_string()));
        }
        self.sent.lock().await.push((user.clone(), text.to_string()));
        Ok(())
    }
}
