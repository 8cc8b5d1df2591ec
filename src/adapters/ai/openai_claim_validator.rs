//! OpenAI-backed complaint validator.

use async_trait::async_trait;
use std::sync::Arc;

use super::openai_client::OpenAIChatClient;
use crate::ports::{AiError, ClaimValidator};

const MAX_TOKENS: u32 = 200;

/// Judges whether a description reports a real electricity-service problem.
#[derive(Debug, Clone)]
pub struct OpenAIClaimValidator {
    client: Arc<OpenAIChatClient>,
}

impl OpenAIClaimValidator {
    pub fn new(client: Arc<OpenAIChatClient>) -> Self {
        Self { client }
    }
}

pub(crate) fn validation_prompt(description: &str) -> String {
    format!(
        r#"Analiza esta descripción de un reclamo: '{description}'.
Determina si está relacionada con temas de una distribuidora eléctrica, como cortes de luz, apagones, problemas con la energía eléctrica, facturación errónea, o daños a electrodomésticos por fallos en el suministro, y si describe un problema real que el usuario está reportando.
Sé flexible y considera sinónimos como 'apagón' para corte de luz, pero rechaza preguntas hipotéticas o frases que no afirmen un problema concreto (por ejemplo, 'qué pasa si...').
Devuelve una respuesta en formato JSON con los campos 'es_valido' (true/false) y 'mensaje' (explicación breve y amigable).
Ejemplos válidos: 'Hubo un apagón en todo el barrio', 'Se cortó la luz 3 horas', 'Me llegó una factura mal', 'Se me quemó la heladera por un pico de tensión'.
Ejemplos no válidos: 'Mi perro se escapó', 'Necesito un delivery', 'Qué pasa si le dices que un camión cortó los cables'.
Si no es válido y es una pregunta hipotética como 'qué pasa si...', responde con un tono cálido explicando que no es un reclamo y ofrece una breve respuesta a la pregunta.
Asegúrate de responder siempre en formato JSON válido y no encierres la respuesta en bloques de código como ```json```."#
    )
}

#[async_trait]
impl ClaimValidator for OpenAIClaimValidator {
    async fn validate(&self, description: &str, _history: &str) -> Result<String, AiError> {
        let answer = self
            .client
            .complete(&validation_prompt(description), MAX_TOKENS)
            .await?;

        tracing::debug!(answer = %answer, "Claim validated");
        Ok(answer)
    }
}
