//! Response Cache Port - Advisory cache for model answers.
//!
//! Entries are never invalidated on state changes; a miss or an error only
//! costs an upstream call.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation failed: {0}")]
    Operation(String),
}

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value that expires after `ttl`
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}
