//! Conversation domain module.
//!
//! The per-user dialogue that every messaging channel runs: phases and
//! their transition rules, the typed state each phase carries, its flat
//! persisted form, model-output parsing with fallbacks, and the engine
//! that advances a conversation by one inbound message.

mod action;
mod engine;
mod errors;
pub mod history;
mod intent;
pub mod keywords;
pub mod normalize;
mod phase;
mod record;
pub mod replies;
mod state;

pub use action::Action;
pub use engine::{
    ConversationEngine, EngineConfig, EngineServices, TurnOutcome, MIN_DESCRIPTION_CHARS,
};
pub use errors::EngineError;
pub use intent::{strip_code_fence, ClaimVerdict, Intent, IntentResult, ModelOutputError};
pub use phase::Phase;
pub use record::{RecordChanges, StateField, StateRecord};
pub use state::{ConversationState, Identity, PendingAction};
