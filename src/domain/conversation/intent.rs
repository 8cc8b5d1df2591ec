//! Parsing of classifier and validator model output.
//!
//! Both collaborators answer with free text that is supposed to be a JSON
//! object. Nothing about its shape is trusted: every accessor here has a
//! fallback, and the engine never sees a parse failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::replies;

/// Purpose of a free-text message sent while in `inicio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Reclamo,
    Actualizar,
    Consultar,
    ConsultarFacturas,
    Conversar,
}

impl Intent {
    /// Maps a model label to an intent; anything unrecognised is small talk.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Reclamo" => Intent::Reclamo,
            "Actualizar" => Intent::Actualizar,
            "Consultar" => Intent::Consultar,
            "ConsultarFacturas" => Intent::ConsultarFacturas,
            _ => Intent::Conversar,
        }
    }
}

/// Why a model answer could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelOutputError {
    #[error("model output is empty")]
    Empty,

    #[error("model output is not a JSON object: {0}")]
    NotJson(String),
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    intencion: Option<String>,
    respuesta: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    es_valido: Option<bool>,
    mensaje: Option<String>,
}

/// Classified intent plus the conversational reply the model wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResult {
    pub intent: Intent,
    pub reply: String,
}

impl IntentResult {
    /// Parses a classifier answer. A JSON object with missing keys still
    /// parses, defaulting to `Conversar` and the clarifying reply.
    pub fn parse(raw: &str) -> Result<Self, ModelOutputError> {
        let parsed: RawIntent = parse_object(raw)?;
        Ok(Self {
            intent: parsed
                .intencion
                .as_deref()
                .map(Intent::from_label)
                .unwrap_or(Intent::Conversar),
            reply: non_blank(parsed.respuesta).unwrap_or_else(replies::not_understood),
        })
    }

    /// Result used when the answer is unusable.
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Conversar,
            reply: replies::not_understood(),
        }
    }

    /// Result used when the classifier could not be reached.
    pub fn unavailable() -> Self {
        Self {
            intent: Intent::Conversar,
            reply: replies::classifier_unavailable(),
        }
    }
}

/// The validator's judgement on a complaint description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimVerdict {
    pub is_valid: bool,
    pub message: String,
}

impl ClaimVerdict {
    pub fn parse(raw: &str) -> Result<Self, ModelOutputError> {
        let parsed: RawVerdict = parse_object(raw)?;
        Ok(Self {
            is_valid: parsed.es_valido.unwrap_or(false),
            message: non_blank(parsed.mensaje).unwrap_or_else(replies::claim_not_validated),
        })
    }

    /// Verdict used when the answer is unusable.
    pub fn fallback() -> Self {
        Self {
            is_valid: false,
            message: replies::claim_validation_technical_failure(),
        }
    }

    /// Verdict used when the validator could not be reached.
    pub fn unavailable() -> Self {
        Self {
            is_valid: false,
            message: replies::validator_unavailable(),
        }
    }
}

/// Removes a surrounding Markdown code fence, with or without a language tag.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T, ModelOutputError> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(ModelOutputError::Empty);
    }
    serde_json::from_str(body).map_err(|e| ModelOutputError::NotJson(e.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
