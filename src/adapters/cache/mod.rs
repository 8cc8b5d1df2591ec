//! Response cache adapters.

mod in_memory_response_cache;
mod redis_response_cache;

pub use in_memory_response_cache::InMemoryResponseCache;
pub use redis_response_cache::RedisResponseCache;
