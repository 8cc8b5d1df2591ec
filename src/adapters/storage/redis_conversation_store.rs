//! Redis-backed conversation store for production deployments.
//!
//! Layout per user:
//! - `user:<channel>:<id>:estado` - hash with the phase state fields
//! - `user:<channel>:<id>:historial` - list of history lines (RPUSH)

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::HashMap;

use crate::domain::conversation::{RecordChanges, StateField, StateRecord};
use crate::domain::foundation::UserKey;
use crate::ports::{ConversationStore, StoreError};

/// Redis conversation store shared by every channel adapter.
#[derive(Clone)]
pub struct RedisConversationStore {
    conn: MultiplexedConnection,
}

impl RedisConversationStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self::new(conn))
    }
}

pub(crate) fn state_key(user: &UserKey) -> String {
    format!("user:{}:estado", user)
}

pub(crate) fn history_key(user: &UserKey) -> String {
    format!("user:{}:historial", user)
}

/// MULTI/EXEC block that applies a diff to the state hash in one step.
/// `None` when there is nothing to write.
pub(crate) fn commit_pipeline(key: &str, changes: &RecordChanges) -> Option<redis::Pipeline> {
    if changes.is_empty() {
        return None;
    }
    let mut pipe = redis::pipe();
    pipe.atomic();
    if !changes.set.is_empty() {
        let pairs: Vec<(&str, &str)> = changes
            .set
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .collect();
        pipe.hset_multiple(key, &pairs).ignore();
    }
    if !changes.delete.is_empty() {
        let names: Vec<&str> = changes.delete.iter().map(StateField::as_str).collect();
        pipe.hdel(key, names).ignore();
    }
    Some(pipe)
}

fn op_error(e: redis::RedisError) -> StoreError {
    if e.is_connection_dropped() || e.is_io_error() || e.is_timeout() {
        StoreError::Connection(e.to_string())
    } else {
        StoreError::Operation(e.to_string())
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn get_state(&self, user: &UserKey) -> Result<StateRecord, StoreError> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(state_key(user)).await.map_err(op_error)?;
        Ok(StateRecord::from_pairs(raw))
    }

    async fn set_fields(
        &self,
        user: &UserKey,
        fields: &[(StateField, String)],
    ) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
            .collect();
        let mut conn = self.conn.clone();
        conn.hset_multiple::<_, _, _, ()>(state_key(user), &pairs)
            .await
            .map_err(op_error)
    }

    async fn delete_fields(&self, user: &UserKey, fields: &[StateField]) -> Result<(), StoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = fields.iter().map(StateField::as_str).collect();
        let mut conn = self.conn.clone();
        conn.hdel::<_, _, ()>(state_key(user), names)
            .await
            .map_err(op_error)
    }

    async fn append_history(&self, user: &UserKey, line: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(history_key(user), line)
            .await
            .map_err(op_error)
    }

    async fn recent_history(&self, user: &UserKey, n: usize) -> Result<Vec<String>, StoreError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let start = -(n.min(isize::MAX as usize) as isize);
        conn.lrange(history_key(user), start, -1)
            .await
            .map_err(op_error)
    }

    async fn commit(&self, user: &UserKey, changes: &RecordChanges) -> Result<(), StoreError> {
        let Some(pipe) = commit_pipeline(&state_key(user), changes) else {
            return Ok(());
        };
        let mut conn = self.conn.clone();
        pipe.query_async::<_, ()>(&mut conn).await.map_err(op_error)
    }

    async fn reset(&self, user: &UserKey) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&[state_key(user), history_key(user)])
            .await
            .map_err(op_error)
    }
}

impl std::fmt::Debug for RedisConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConversationStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Channel;

    #[test]
    fn keys_are_namespaced_by_channel() {
        let user = UserKey::new(Channel::Whatsapp, "5493410000000").unwrap();
        assert_eq!(state_key(&user), "user:whatsapp:5493410000000:estado");
        assert_eq!(history_key(&user), "user:whatsapp:5493410000000:historial");
    }

    fn packed(pipe: &redis::Pipeline) -> String {
        String::from_utf8_lossy(&pipe.get_packed_pipeline()).into_owned()
    }

    #[test]
    fn empty_diff_builds_no_pipeline() {
        assert!(commit_pipeline("user:console:1:estado", &RecordChanges::default()).is_none());
    }

    #[test]
    fn diff_is_wrapped_in_a_transaction() {
        let changes = RecordChanges {
            set: vec![(StateField::Fase, "inicio".to_string())],
            delete: vec![StateField::Dni, StateField::Nombre],
        };

        let pipe = commit_pipeline("user:console:1:estado", &changes).unwrap();
        let wire = packed(&pipe);

        let multi = wire.find("MULTI").unwrap();
        let hmset = wire.find("HMSET").unwrap();
        let hdel = wire.find("HDEL").unwrap();
        let exec = wire.find("EXEC").unwrap();
        assert!(multi < hmset && hmset < hdel && hdel < exec);
        assert!(wire.contains("fase"));
        assert!(wire.contains("nombre"));
    }

    #[test]
    fn delete_only_diff_skips_the_write() {
        let changes = RecordChanges {
            set: Vec::new(),
            delete: vec![StateField::Descripcion],
        };

        let wire = packed(&commit_pipeline("k", &changes).unwrap());

        assert!(!wire.contains("HMSET"));
        assert!(wire.contains("HDEL"));
    }

    // Requires a running Redis instance: cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn round_trips_state_and_history_against_live_redis() {
        let store = RedisConversationStore::connect("redis://127.0.0.1/")
            .await
            .unwrap();
        let user = UserKey::new(Channel::Console, "redis-it").unwrap();
        store.reset(&user).await.unwrap();

        store
            .set_fields(&user, &[(StateField::Fase, "pedir_dni".to_string())])
            .await
            .unwrap();
        store.append_history(&user, "Usuario: hola").await.unwrap();
        store.append_history(&user, "Bot: hola").await.unwrap();

        let record = store.get_state(&user).await.unwrap();
        assert_eq!(record.get(StateField::Fase), Some("pedir_dni"));
        assert_eq!(
            store.recent_history(&user, 1).await.unwrap(),
            vec!["Bot: hola"]
        );

        store
            .commit(
                &user,
                &RecordChanges {
                    set: vec![(StateField::Fase, "inicio".to_string())],
                    delete: vec![StateField::Accion],
                },
            )
            .await
            .unwrap();
        assert_eq!(
            store.get_state(&user).await.unwrap().get(StateField::Fase),
            Some("inicio")
        );

        store.reset(&user).await.unwrap();
        assert!(store.get_state(&user).await.unwrap().is_empty());
    }
}
