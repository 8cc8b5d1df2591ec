//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the conversation engine to external systems:
//! - `storage` - Conversation state and history (in-memory, Redis)
//! - `cache` - Model answer cache (in-memory, Redis)
//! - `ai` - Intent classifier and claim validator (OpenAI, cached, scripted)
//! - `directory` - Customer, complaint and invoice records
//! - `channel` - Outbound message delivery

pub mod ai;
pub mod cache;
pub mod channel;
pub mod directory;
pub mod storage;

pub use ai::{
    CachedClaimValidator, CachedIntentClassifier, MockClaimValidator, MockIntentClassifier,
    OpenAIChatClient, OpenAIClaimValidator, OpenAIConfig, OpenAIIntentClassifier,
};
pub use cache::{InMemoryResponseCache, RedisResponseCache};
pub use channel::{ConsoleSender, RecordingSender};
pub use directory::InMemoryCustomerDirectory;
pub use storage::{InMemoryConversationStore, RedisConversationStore};
