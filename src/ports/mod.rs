//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the conversation engine and the outside world. Adapters implement them.
//!
//! ## Memory
//!
//! - `ConversationStore` - Per-user phase state and history
//! - `ResponseCache` - Advisory cache for model answers
//!
//! ## Language Model Collaborators
//!
//! - `IntentClassifier` - Free text to intent
//! - `ClaimValidator` - Complaint description check
//!
//! ## Domain Services
//!
//! - `IdentityResolver`, `ComplaintService`, `CustomerUpdateService`,
//!   `InvoiceService`
//!
//! ## Delivery
//!
//! - `MessageSender` - Outbound text on the user's channel

mod claim_validator;
mod complaint_service;
mod conversation_store;
mod customer_update_service;
mod identity_resolver;
mod intent_classifier;
mod invoice_service;
mod message_sender;
mod response_cache;
mod service_error;

pub use claim_validator::ClaimValidator;
pub use complaint_service::{ComplaintService, RECENT_COMPLAINTS_LIMIT};
pub use conversation_store::{ConversationStore, StoreError};
pub use customer_update_service::CustomerUpdateService;
pub use identity_resolver::IdentityResolver;
pub use intent_classifier::{AiError, IntentClassifier};
pub use invoice_service::InvoiceService;
pub use message_sender::{MessageSender, SendError};
pub use response_cache::{CacheError, ResponseCache};
pub use service_error::ServiceError;
