//! Per-user turn serialisation.
//!
//! Two messages from the same user must not interleave their
//! read-process-commit cycles; messages from different users run in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::UserKey;

/// Idle entries are pruned once the registry grows past this size.
const PRUNE_THRESHOLD: usize = 256;

/// Registry of one async mutex per active user.
#[derive(Debug, Default)]
pub struct TurnLocks {
    locks: Mutex<HashMap<UserKey, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn of `user` is running.
    pub async fn acquire(&self, user: &UserKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Only the registry holds an idle entry.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(user.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of users currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
