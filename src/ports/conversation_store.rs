//! Conversation Store Port - Per-user conversation memory.
//!
//! Each user owns two entries: a string hash with the current phase state
//! and an append-only list of history lines. Keys are namespaced by the
//! channel-qualified [`UserKey`].

use async_trait::async_trait;

use crate::domain::conversation::{RecordChanges, StateField, StateRecord};
use crate::domain::foundation::UserKey;

/// Errors that can occur during conversation store operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store operation failed: {0}")]
    Operation(String),

    #[error("Stored value is malformed: {0}")]
    Malformed(String),
}

/// Port for reading and mutating a user's conversation memory
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Read the full state hash
    ///
    /// # Returns
    /// An empty record when the user has no stored state
    async fn get_state(&self, user: &UserKey) -> Result<StateRecord, StoreError>;

    /// Write or overwrite individual state fields
    async fn set_fields(
        &self,
        user: &UserKey,
        fields: &[(StateField, String)],
    ) -> Result<(), StoreError>;

    /// Remove individual state fields; absent fields are ignored
    async fn delete_fields(&self, user: &UserKey, fields: &[StateField]) -> Result<(), StoreError>;

    /// Append one line to the user's history
    async fn append_history(&self, user: &UserKey, line: &str) -> Result<(), StoreError>;

    /// Read the last `n` history lines, oldest first
    async fn recent_history(&self, user: &UserKey, n: usize) -> Result<Vec<String>, StoreError>;

    /// Delete both state and history for a user
    async fn reset(&self, user: &UserKey) -> Result<(), StoreError>;

    /// Apply a computed diff: writes first, then deletions
    async fn commit(&self, user: &UserKey, changes: &RecordChanges) -> Result<(), StoreError> {
        if !changes.set.is_empty() {
            self.set_fields(user, &changes.set).await?;
        }
        if !changes.delete.is_empty() {
            self.delete_fields(user, &changes.delete).await?;
        }
        Ok(())
    }
}
