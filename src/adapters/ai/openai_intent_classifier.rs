//! OpenAI-backed intent classifier.

use async_trait::async_trait;
use std::sync::Arc;

use super::openai_client::OpenAIChatClient;
use crate::ports::{AiError, IntentClassifier};

const MAX_TOKENS: u32 = 500;

/// Classifies inbound messages with the utility-assistant prompt.
#[derive(Debug, Clone)]
pub struct OpenAIIntentClassifier {
    client: Arc<OpenAIChatClient>,
}

impl OpenAIIntentClassifier {
    pub fn new(client: Arc<OpenAIChatClient>) -> Self {
        Self { client }
    }
}

/// Builds the classification prompt for `text` with the recent `history`.
pub(crate) fn classification_prompt(text: &str, history: &str) -> String {
    format!(
        r#"Eres DECSA, un asistente virtual oficial de Distribuidora Eléctrica de Caucete S.A. (DECSA). Tu función es ayudar a los usuarios con:
1) Hacer reclamos sobre servicios eléctricos.
2) Actualizar datos personales.
3) Consultar el estado de un reclamo.
4) Consultar facturas.

Normas:
- En el primer mensaje, preséntate como DECSA.
- No repitas la presentación si ya hubo diálogo.
- Sé cálido, directo, empático.
- Detecta la intención: Reclamo, Actualizar, Consultar, ConsultarFacturas, Conversar.
- Si la intención es "Actualizar", pide especificar entre: calle, barrio, celular o correo.
- Reclamos, Consultas y Facturas deben pedir el DNI.
- No encierres la respuesta en bloques de código como ```json```.
- Devuelve solo un objeto JSON.

Historial reciente:
{history}

Mensaje actual: "{text}"

Responde en formato JSON con:
- "intencion": "Reclamo", "Actualizar", "Consultar", "ConsultarFacturas" o "Conversar".
- "respuesta": Texto cálido y claro con una instrucción para avanzar."#
    )
}

#[async_trait]
impl IntentClassifier for OpenAIIntentClassifier {
    async fn classify(&self, text: &str, history: &str) -> Result<String, AiError> {
        let started = std::time::Instant::now();
        let answer = self
            .client
            .complete(&classification_prompt(text, history), MAX_TOKENS)
            .await?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            answer = %answer,
            "Intent classified"
        );
        Ok(answer)
    }
}
