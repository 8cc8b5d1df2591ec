//! Language-model adapters.
//!
//! ## Available Adapters
//!
//! - `OpenAIIntentClassifier` / `OpenAIClaimValidator` - chat completions over `OpenAIChatClient`
//! - `CachedIntentClassifier` / `CachedClaimValidator` - response-cache decorators
//! - `MockIntentClassifier` / `MockClaimValidator` - scripted answers for tests and offline runs

mod cached;
mod mock;
mod openai_claim_validator;
mod openai_client;
mod openai_intent_classifier;

pub use cached::{cache_key, CachedClaimValidator, CachedIntentClassifier};
pub use mock::{MockClaimValidator, MockIntentClassifier, OFFLINE_CLASSIFICATION, OFFLINE_VERDICT};
pub use openai_claim_validator::OpenAIClaimValidator;
pub use openai_client::{OpenAIChatClient, OpenAIConfig, JSON_SYSTEM_MESSAGE};
pub use openai_intent_classifier::OpenAIIntentClassifier;
