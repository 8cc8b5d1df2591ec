//! Domain error vocabulary.
//!
//! `ValidationError` covers values that cannot be built (a non-numeric DNI,
//! an unknown phase in a stored record). `DomainError` carries a stable
//! `ErrorCode` for log correlation plus free-form details.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A value failed its construction rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable codes written to logs next to every turn failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    InvalidFormat,
    InvalidStateTransition,
    CorruptConversationState,
    UpstreamUnavailable,
    UpstreamTimeout,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::CorruptConversationState => "CORRUPT_CONVERSATION_STATE",
            ErrorCode::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            ErrorCode::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    /// Sorted so log output is stable.
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::EmptyField { .. } => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("dni").to_string(),
            "Field 'dni' cannot be empty"
        );
        assert_eq!(
            ValidationError::invalid_format("dni", "only digits allowed").to_string(),
            "Field 'dni' has invalid format: only digits allowed"
        );
    }

    #[test]
    fn domain_error_shows_code_then_message() {
        let err = DomainError::new(ErrorCode::UpstreamTimeout, "Directory timed out");
        assert_eq!(err.to_string(), "[UPSTREAM_TIMEOUT] Directory timed out");
    }

    #[test]
    fn details_accumulate() {
        let err = DomainError::new(ErrorCode::InvalidStateTransition, "bad move")
            .with_detail("from", "inicio")
            .with_detail("to", "ejecutar_accion");

        assert_eq!(err.details.len(), 2);
        assert_eq!(err.details.get("to").map(String::as_str), Some("ejecutar_accion"));
    }

    #[test]
    fn validation_error_keeps_its_category() {
        let format: DomainError = ValidationError::invalid_format("fase", "unknown").into();
        let empty: DomainError = ValidationError::empty_field("nombre").into();

        assert_eq!(format.code, ErrorCode::InvalidFormat);
        assert_eq!(empty.code, ErrorCode::ValidationFailed);
    }
}
