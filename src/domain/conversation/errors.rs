//! Errors that abort a conversation turn.

use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::ports::ServiceError;

/// A turn could not be completed. The turn handler answers any of these
/// with the generic apology and forces the conversation back to `inicio`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{operation} failed: {source}")]
    Service {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Invalid phase transition: {0}")]
    InvalidTransition(DomainError),

    #[error("Cascade exceeded {0} hops")]
    CascadeLimit(usize),

    #[error("Corrupt conversation state: {0}")]
    CorruptState(#[from] ValidationError),
}

impl EngineError {
    pub fn service(operation: &'static str, source: ServiceError) -> Self {
        EngineError::Service { operation, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Service { .. } => ErrorCode::UpstreamUnavailable,
            EngineError::Timeout { .. } => ErrorCode::UpstreamTimeout,
            EngineError::InvalidTransition(e) => e.code,
            EngineError::CascadeLimit(_) => ErrorCode::InternalError,
            EngineError::CorruptState(_) => ErrorCode::CorruptConversationState,
        }
    }
}
