//! Scripted classifier and validator for tests and offline runs.
//!
//! Queued answers are consumed in order; when the queue is empty each mock
//! falls back to a fixed answer (`Conversar` for the classifier, a valid
//! verdict for the validator). Calls are recorded for verification.
//!
//! # Example
//!
//! ```ignore
//! let classifier = MockIntentClassifier::new();
//! classifier.push_response(r#"{"intencion": "Reclamo", "respuesta": "Claro"}"#);
//! classifier.push_error(AiError::Timeout);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AiError, ClaimValidator, IntentClassifier};

/// Answer the classifier gives when nothing is queued.
pub const OFFLINE_CLASSIFICATION: &str = r#"{"intencion": "Conversar", "respuesta": "¡Hola! Soy DECSA, el asistente virtual de Distribuidora Eléctrica de Caucete. Puedo ayudarte con reclamos, actualizar tus datos, consultar reclamos o ver tu factura."}"#;

/// Verdict the validator gives when nothing is queued.
pub const OFFLINE_VERDICT: &str = r#"{"es_valido": true, "mensaje": "Reclamo válido."}"#;

#[derive(Debug, Default)]
struct Script {
    answers: Mutex<VecDeque<Result<String, AiError>>>,
    calls: Mutex<Vec<(String, String)>>,
    delay: Mutex<Duration>,
}

impl Script {
    fn push(&self, answer: Result<String, AiError>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    async fn answer(&self, input: &str, history: &str, fallback: &str) -> Result<String, AiError> {
        self.calls
            .lock()
            .unwrap()
            .push((input.to_string(), history.to_string()));

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            sleep(delay).await;
        }

        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(fallback.to_string()))
    }
}

macro_rules! scripted_mock {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            /// Queues a raw model answer.
            pub fn push_response(&self, raw: impl Into<String>) {
                self.script.push(Ok(raw.into()));
            }

            /// Queues a failure.
            pub fn push_error(&self, error: AiError) {
                self.script.push(Err(error));
            }

            /// Sets simulated latency per call.
            pub fn set_delay(&self, delay: Duration) {
                *self.script.delay.lock().unwrap() = delay;
            }

            pub fn call_count(&self) -> usize {
                self.script.calls.lock().unwrap().len()
            }

            /// Recorded `(input, history)` pairs in call order.
            pub fn calls(&self) -> Vec<(String, String)> {
                self.script.calls.lock().unwrap().clone()
            }
        }
    };
}

/// Scripted `IntentClassifier`.
#[derive(Debug, Clone, Default)]
pub struct MockIntentClassifier {
    script: Arc<Script>,
}

scripted_mock!(MockIntentClassifier);

#[async_trait]
impl IntentClassifier for MockIntentClassifier {
    async fn classify(&self, text: &str, history: &str) -> Result<String, AiError> {
        self.script
            .answer(text, history, OFFLINE_CLASSIFICATION)
            .await
    }
}

/// Scripted `ClaimValidator`.
#[derive(Debug, Clone, Default)]
pub struct MockClaimValidator {
    script: Arc<Script>,
}

scripted_mock!(MockClaimValidator);

#[async_trait]
impl ClaimValidator for MockClaimValidator {
    async fn validate(&self, description: &str, history: &str) -> Result<String, AiError> {
        self.script
            .answer(description, history, OFFLINE_VERDICT)
            .await
    }
}
