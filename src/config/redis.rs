//! Redis section: conversation memory and the model answer cache share
//! one connection.

use redis::IntoConnectionInfo;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Present only when `DECSA_BOT__REDIS__URL` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `redis://` or `rediss://` URL
    pub url: String,

    /// Bound on connecting and on every store call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RedisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS__URL"));
        }
        // Unix sockets and other schemes parse fine but are not supported here.
        let tcp = url.starts_with("redis://") || url.starts_with("rediss://");
        if !tcp || url.into_connection_info().is_err() {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("redis"));
        }
        Ok(())
    }
}
