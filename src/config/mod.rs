//! Runtime configuration.
//!
//! Everything comes from `DECSA_BOT__<SECTION>__<KEY>` environment variables,
//! optionally seeded from a `.env` file. An empty environment is valid and
//! runs fully offline.
//!
//! ```no_run
//! use decsa_bot::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ai;
mod conversation;
mod error;
mod logging;
mod redis;

pub use ai::AiConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use redis::RedisConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// offline setup: in-memory storage and the scripted classifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Redis connection; absent means in-memory store and cache
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    /// OpenAI settings for intent classification and claim validation
    #[serde(default)]
    pub ai: AiConfig,

    /// Conversation engine limits
    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the `DECSA_BOT__*` variables.
    ///
    /// `DECSA_BOT__REDIS__URL=redis://localhost:6379` becomes `redis.url`,
    /// `DECSA_BOT__AI__OPENAI_API_KEY=sk-...` becomes `ai.openai_api_key`.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development.
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DECSA_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.ai.validate()?;
        self.conversation.validate()?;
        // The engine bound wraps the whole client call, retries included.
        if self.conversation.call_timeout_secs <= self.ai.timeout_secs {
            return Err(ValidationError::CallTimeoutTooShort {
                call_secs: self.conversation.call_timeout_secs,
                ai_secs: self.ai.timeout_secs,
            });
        }
        self.logging.validate()?;
        Ok(())
    }
}
