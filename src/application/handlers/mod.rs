//! Application handlers.
//!
//! Command handlers that drive the conversation engine for every channel.

mod handle_inbound_message;
mod reset_conversation;
mod turn_locks;

pub use handle_inbound_message::{
    HandleInboundMessageCommand, HandleInboundMessageHandler, HandleMessageError, TurnConfig,
    TurnReport,
};
pub use reset_conversation::{ResetConversationHandler, ResetKind};
pub use turn_locks::TurnLocks;
