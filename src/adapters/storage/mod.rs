//! Conversation store adapters.
//!
//! - `InMemoryConversationStore` - process-local, for tests and the console binary
//! - `RedisConversationStore` - shared hash/list storage for multi-channel deployments

mod in_memory_conversation_store;
mod redis_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
pub use redis_conversation_store::RedisConversationStore;
