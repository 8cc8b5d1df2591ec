//! In-Memory Conversation Store Adapter
//!
//! Keeps state hashes and history lists in process memory.
//! Used by tests and by the console binary when no Redis is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{StateField, StateRecord};
use crate::domain::foundation::UserKey;
use crate::ports::{ConversationStore, StoreError};

/// In-memory storage for conversation state and history
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<HashMap<UserKey, StateRecord>>>,
    histories: Arc<RwLock<HashMap<UserKey, Vec<String>>>>,
}

impl InMemoryConversationStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.states.write().await.clear();
        self.histories.write().await.clear();
    }

    /// Full history of a user (useful for tests)
    pub async fn history(&self, user: &UserKey) -> Vec<String> {
        self.histories
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the number of users with stored state
    pub async fn state_count(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get_state(&self, user: &UserKey) -> Result<StateRecord, StoreError> {
        let states = self.states.read().await;
        Ok(states.get(user).cloned().unwrap_or_default())
    }

    async fn set_fields(
        &self,
        user: &UserKey,
        fields: &[(StateField, String)],
    ) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        let record = states.entry(user.clone()).or_default();
        for (field, value) in fields {
            record.set(*field, value.clone());
        }
        Ok(())
    }

    async fn delete_fields(&self, user: &UserKey, fields: &[StateField]) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        if let Some(record) = states.get_mut(user) {
            for field in fields {
                record.remove(*field);
            }
            // An emptied hash disappears, as it would in Redis.
            if record.is_empty() {
                states.remove(user);
            }
        }
        Ok(())
    }

    async fn append_history(&self, user: &UserKey, line: &str) -> Result<(), StoreError> {
        let mut histories = self.histories.write().await;
        histories
            .entry(user.clone())
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    async fn recent_history(&self, user: &UserKey, n: usize) -> Result<Vec<String>, StoreError> {
        let histories = self.histories.read().await;
        let lines = histories.get(user).map(Vec::as_slice).unwrap_or_default();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].to_vec())
    }

    async fn reset(&self, user: &UserKey) -> Result<(), StoreError> {
        self.states.write().await.remove(user);
        self.histories.write().await.remove(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::RecordChanges;
    use crate::domain::foundation::Channel;

    fn user(id: &str) -> UserKey {
        UserKey::new(Channel::Telegram, id).unwrap()
    }

    #[tokio::test]
    async fn missing_user_reads_as_empty_record() {
        let store = InMemoryConversationStore::new();

        let record = store.get_state(&user("1")).await.unwrap();

        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn set_and_delete_fields() {
        let store = InMemoryConversationStore::new();
        let u = user("1");

        store
            .set_fields(
                &u,
                &[
                    (StateField::Fase, "pedir_dni".to_string()),
                    (StateField::Accion, "reclamo".to_string()),
                ],
            )
            .await
            .unwrap();
        store.delete_fields(&u, &[StateField::Accion]).await.unwrap();

        let record = store.get_state(&u).await.unwrap();
        assert_eq!(record.get(StateField::Fase), Some("pedir_dni"));
        assert_eq!(record.get(StateField::Accion), None);
    }

    #[tokio::test]
    async fn deleting_every_field_drops_the_record() {
        let store = InMemoryConversationStore::new();
        let u = user("1");
        store
            .set_fields(&u, &[(StateField::Fase, "inicio".to_string())])
            .await
            .unwrap();

        store.delete_fields(&u, &[StateField::Fase]).await.unwrap();

        assert_eq!(store.state_count().await, 0);
    }

    #[tokio::test]
    async fn commit_applies_sets_and_deletes() {
        let store = InMemoryConversationStore::new();
        let u = user("1");
        store
            .set_fields(&u, &[(StateField::Dni, "1".to_string())])
            .await
            .unwrap();

        let changes = RecordChanges {
            set: vec![(StateField::Fase, "inicio".to_string())],
            delete: vec![StateField::Dni],
        };
        store.commit(&u, &changes).await.unwrap();

        let record = store.get_state(&u).await.unwrap();
        assert_eq!(record.get(StateField::Fase), Some("inicio"));
        assert_eq!(record.get(StateField::Dni), None);
    }

    #[tokio::test]
    async fn recent_history_returns_tail_in_order() {
        let store = InMemoryConversationStore::new();
        let u = user("1");
        for i in 1..=7 {
            store.append_history(&u, &format!("l{}", i)).await.unwrap();
        }

        let recent = store.recent_history(&u, 3).await.unwrap();

        assert_eq!(recent, vec!["l5", "l6", "l7"]);
    }

    #[tokio::test]
    async fn users_are_isolated_and_reset_is_per_user() {
        let store = InMemoryConversationStore::new();
        let a = user("a");
        let b = user("b");
        store.append_history(&a, "hola").await.unwrap();
        store.append_history(&b, "chau").await.unwrap();

        store.reset(&a).await.unwrap();

        assert!(store.history(&a).await.is_empty());
        assert_eq!(store.history(&b).await, vec!["chau"]);
    }

    #[tokio::test]
    async fn same_id_on_different_channels_is_different_user() {
        let store = InMemoryConversationStore::new();
        let tg = UserKey::new(Channel::Telegram, "42").unwrap();
        let wa = UserKey::new(Channel::Whatsapp, "42").unwrap();
        store
            .set_fields(&tg, &[(StateField::Fase, "pedir_dni".to_string())])
            .await
            .unwrap();

        assert!(store.get_state(&wa).await.unwrap().is_empty());
    }
}
