//! Application layer - Command handlers.
//!
//! This layer orchestrates the conversation engine and coordinates between
//! ports: memory, delivery and the per-user turn order.

pub mod handlers;

pub use handlers::{
    HandleInboundMessageCommand, HandleInboundMessageHandler, HandleMessageError,
    ResetConversationHandler, ResetKind, TurnConfig, TurnLocks, TurnReport,
};
