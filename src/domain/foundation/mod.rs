//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, error types, and the state machine trait
//! that form the vocabulary of the DECSA conversation domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{Channel, ComplaintId, Dni, TurnId, UserKey};
pub use state_machine::StateMachine;
