//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers, errors, state machine trait)
//! - `customer` - Customers, complaints and invoices the bot reads and acts on
//! - `conversation` - Dialogue phases, per-user state and the conversation engine

pub mod conversation;
pub mod customer;
pub mod foundation;
