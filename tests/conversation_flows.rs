//! End-to-end conversation flows.
//!
//! Every test drives the inbound message handler the way a channel adapter
//! would, with in-memory storage, a recording sender, scripted models and
//! an in-memory customer directory. Assertions look at what the user
//! received and at the persisted state hash.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use decsa_bot::adapters::{
    InMemoryConversationStore, InMemoryCustomerDirectory, MockClaimValidator,
    MockIntentClassifier, RecordingSender,
};
use decsa_bot::application::{
    HandleInboundMessageCommand, HandleInboundMessageHandler, HandleMessageError, TurnConfig,
    TurnReport,
};
use decsa_bot::domain::conversation::{
    replies, Action, ConversationEngine, ConversationState, EngineConfig, EngineServices, Identity,
    Phase, StateField, StateRecord,
};
use decsa_bot::domain::customer::{Complaint, ComplaintStatus, Customer, Invoice, UpdatableField};
use decsa_bot::domain::foundation::{Channel, ComplaintId, Dni, UserKey};
use decsa_bot::ports::{AiError, ConversationStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

const DNI: &str = "30111222";

struct Harness {
    store: Arc<InMemoryConversationStore>,
    sender: Arc<RecordingSender>,
    classifier: Arc<MockIntentClassifier>,
    validator: Arc<MockClaimValidator>,
    directory: Arc<InMemoryCustomerDirectory>,
    handler: HandleInboundMessageHandler,
}

impl Harness {
    async fn new() -> Self {
        let store = Arc::new(InMemoryConversationStore::new());
        let sender = Arc::new(RecordingSender::new());
        let classifier = Arc::new(MockIntentClassifier::new());
        let validator = Arc::new(MockClaimValidator::new());
        let directory = Arc::new(InMemoryCustomerDirectory::new());
        directory.add_billing_customer(juan_perez()).await;

        let engine = ConversationEngine::new(
            EngineServices {
                classifier: classifier.clone(),
                validator: validator.clone(),
                identities: directory.clone(),
                complaints: directory.clone(),
                updates: directory.clone(),
                invoices: directory.clone(),
            },
            EngineConfig::default(),
        );
        let handler = HandleInboundMessageHandler::new(
            Arc::new(engine),
            store.clone(),
            sender.clone(),
            TurnConfig::default(),
        );

        Self {
            store,
            sender,
            classifier,
            validator,
            directory,
            handler,
        }
    }

    async fn say(&self, text: &str) -> TurnReport {
        self.handler
            .handle(HandleInboundMessageCommand::new(user(), text))
            .await
            .unwrap()
    }

    /// Replies delivered since the last call.
    async fn received(&self) -> Vec<String> {
        self.sender.take(&user()).await
    }

    async fn seed(&self, state: ConversationState) {
        let changes = StateRecord::new().diff(&StateRecord::from(&state));
        self.store.commit(&user(), &changes).await.unwrap();
    }

    async fn state(&self) -> StateRecord {
        self.store.get_state(&user()).await.unwrap()
    }
}

fn user() -> UserKey {
    UserKey::new(Channel::Whatsapp, "5492644000000").unwrap()
}

fn dni() -> Dni {
    Dni::parse(DNI).unwrap()
}

fn identity() -> Identity {
    Identity::new(dni(), "Pérez Juan")
}

fn juan_perez() -> Customer {
    Customer {
        dni: dni(),
        apellido: "Pérez".to_string(),
        nombre: "Juan".to_string(),
        calle: Some("Laprida 120".to_string()),
        barrio: Some("Centro".to_string()),
        celular: None,
        email: Some("juan@viejo.com".to_string()),
        codigo_suministro: Some("S-0042".to_string()),
    }
}

fn intent(label: &str, reply: &str) -> String {
    format!(r#"{{"intencion": "{}", "respuesta": "{}"}}"#, label, reply)
}

const VALID: &str = r#"{"es_valido": true, "mensaje": "Reclamo válido."}"#;

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn complaint_request_asks_for_dni() {
    let h = Harness::new().await;
    h.classifier
        .push_response(intent("Reclamo", "Entiendo, vamos a registrar tu reclamo."));

    let report = h.say("quiero hacer un reclamo").await;

    assert_eq!(report.phase(), Some(Phase::PedirDni));
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("pedir_dni"));
    assert_eq!(state.get(StateField::Accion), Some("reclamo"));
    assert_eq!(
        h.received().await,
        vec![
            "Entiendo, vamos a registrar tu reclamo.".to_string(),
            replies::ask_dni()
        ]
    );
}

#[tokio::test]
async fn known_dni_asks_for_confirmation() {
    let h = Harness::new().await;
    h.seed(ConversationState::PedirDni {
        accion: Action::Reclamo,
    })
    .await;

    h.say(DNI).await;

    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("confirmar_dni"));
    assert_eq!(state.get(StateField::Dni), Some(DNI));
    assert_eq!(state.get(StateField::Nombre), Some("Pérez Juan"));
    let received = h.received().await;
    assert_eq!(received, vec![replies::confirm_identity("Pérez Juan")]);
    assert!(received[0].contains("¿Eres Pérez Juan?"));
}

#[tokio::test]
async fn rejected_identity_returns_to_inicio() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarDni {
        accion: Action::Reclamo,
        identity: identity(),
    })
    .await;

    h.say("no").await;

    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Dni), None);
    assert_eq!(state.get(StateField::Nombre), None);
    assert_eq!(state.get(StateField::Accion), None);
    assert_eq!(h.received().await, vec![replies::identity_rejected()]);
}

#[tokio::test]
async fn valid_description_registers_pending_complaint() {
    let h = Harness::new().await;
    h.seed(ConversationState::SolicitarDescripcion {
        identity: identity(),
    })
    .await;
    h.validator.push_response(VALID);

    let report = h.say("se cortó la luz hace 3 horas").await;

    assert_eq!(report.phase(), Some(Phase::Inicio));
    assert_eq!(h.directory.complaint_count().await, 1);

    let received = h.received().await;
    assert_eq!(received.len(), 2);
    assert!(received[0].contains("ID: 1"));
    assert!(received[0].contains("Pendiente"));
    assert!(received[0].contains("se cortó la luz hace 3 horas"));
    assert_eq!(received[1], replies::anything_else());

    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Descripcion), None);
    assert_eq!(state.get(StateField::Dni), None);
}

#[tokio::test]
async fn non_numeric_dni_is_reprompted_without_state_change() {
    let h = Harness::new().await;
    h.seed(ConversationState::PedirDni {
        accion: Action::Consultar,
    })
    .await;
    let before = h.state().await;

    h.say("abc123").await;

    assert_eq!(h.state().await, before);
    assert_eq!(h.received().await, vec![replies::dni_invalid()]);
}

#[tokio::test]
async fn mail_selects_email_field() {
    let h = Harness::new().await;
    h.seed(ConversationState::SeleccionarDato).await;

    h.say("mail").await;

    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("pedir_dni"));
    assert_eq!(state.get(StateField::Accion), Some("actualizar"));
    assert_eq!(state.get(StateField::CampoActualizar), Some("EMAIL"));
    assert_eq!(h.received().await, vec![replies::field_selected("mail")]);
}

// =============================================================================
// Re-prompts
// =============================================================================

#[tokio::test]
async fn unknown_field_choice_is_reprompted() {
    let h = Harness::new().await;
    h.seed(ConversationState::SeleccionarDato).await;

    h.say("la contraseña").await;

    assert_eq!(h.received().await, vec![replies::field_choice_invalid()]);
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("seleccionar_dato"));
    assert_eq!(state.get(StateField::CampoActualizar), None);
}

#[tokio::test]
async fn unknown_dni_is_reprompted() {
    let h = Harness::new().await;
    h.seed(ConversationState::PedirDni {
        accion: Action::Reclamo,
    })
    .await;

    h.say("99999999").await;

    assert_eq!(h.received().await, vec![replies::dni_not_found()]);
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("pedir_dni"));
    assert_eq!(state.get(StateField::Accion), Some("reclamo"));
    assert_eq!(state.get(StateField::Dni), None);
}

#[tokio::test]
async fn unclear_confirmation_is_reprompted() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarDni {
        accion: Action::Reclamo,
        identity: identity(),
    })
    .await;
    let before = h.state().await;

    h.say("capaz").await;

    assert_eq!(h.received().await, vec![replies::confirmation_invalid()]);
    assert_eq!(h.state().await, before);
    assert_eq!(before.get(StateField::Fase), Some("confirmar_dni"));
}

#[tokio::test]
async fn non_numeric_complaint_id_is_reprompted() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConsultarReclamos {
        identity: identity(),
    })
    .await;

    h.say("el primero").await;

    assert_eq!(h.received().await, vec![replies::complaint_id_invalid()]);
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("consultar_reclamos"));
    assert_eq!(state.get(StateField::Dni), Some(DNI));
}

#[tokio::test]
async fn unknown_complaint_id_is_reprompted() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConsultarReclamos {
        identity: identity(),
    })
    .await;

    h.say("404").await;

    assert_eq!(h.received().await, vec![replies::complaint_not_found()]);
    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("consultar_reclamos")
    );
}

#[tokio::test]
async fn complaint_of_another_customer_is_not_shown() {
    let h = Harness::new().await;
    let neighbour = Dni::parse("28999000").unwrap();
    h.directory
        .add_service_customer(Customer {
            dni: neighbour.clone(),
            apellido: "Gómez".to_string(),
            nombre: "Ana".to_string(),
            calle: None,
            barrio: None,
            celular: None,
            email: None,
            codigo_suministro: None,
        })
        .await;
    h.directory
        .add_complaint(Complaint {
            id: ComplaintId::new(7),
            dni: neighbour,
            descripcion: "poste caído".to_string(),
            estado: ComplaintStatus::EnProceso,
            fecha: Utc::now(),
        })
        .await;
    h.seed(ConversationState::ConsultarReclamos {
        identity: identity(),
    })
    .await;

    h.say("7").await;

    let received = h.received().await;
    assert_eq!(received, vec![replies::complaint_not_found()]);
    assert!(!received[0].contains("poste caído"));
    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("consultar_reclamos")
    );
}

// =============================================================================
// Complete journeys
// =============================================================================

#[tokio::test]
async fn complaint_journey_from_greeting_to_registration() {
    let h = Harness::new().await;
    h.classifier
        .push_response(intent("Reclamo", "Dale, te ayudo con el reclamo."));
    h.validator.push_response(VALID);

    h.say("hola, no tengo luz").await;
    assert_eq!(h.state().await.get(StateField::Fase), Some("pedir_dni"));

    h.say(DNI).await;
    assert_eq!(h.state().await.get(StateField::Fase), Some("confirmar_dni"));

    h.say("Sí").await;
    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("solicitar_descripcion")
    );

    h.say("ok").await;
    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("solicitar_descripcion")
    );

    h.say("Se quemó el medidor con la tormenta").await;
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
    assert_eq!(h.directory.complaint_count().await, 1);
    assert_eq!(h.validator.call_count(), 1);

    let received = h.received().await;
    assert_eq!(received.last(), Some(&replies::anything_else()));
    assert!(received.contains(&replies::description_too_short()));
}

#[tokio::test]
async fn rejected_claim_stays_in_description_phase() {
    let h = Harness::new().await;
    h.seed(ConversationState::SolicitarDescripcion {
        identity: identity(),
    })
    .await;
    h.validator.push_response(
        r#"{"es_valido": false, "mensaje": "Eso no es un problema del servicio eléctrico."}"#,
    );

    h.say("quiero pizza").await;

    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("solicitar_descripcion"));
    assert_eq!(state.get(StateField::Descripcion), None);
    assert_eq!(
        h.received().await,
        vec![replies::claim_rejected(
            "Eso no es un problema del servicio eléctrico."
        )]
    );
    assert_eq!(h.directory.complaint_count().await, 0);
}

#[tokio::test]
async fn consult_journey_lists_then_shows_complaint() {
    let h = Harness::new().await;
    h.seed(ConversationState::SolicitarDescripcion {
        identity: identity(),
    })
    .await;
    h.say("Sin luz en toda la cuadra").await;
    h.received().await;
    h.classifier
        .push_response(intent("Consultar", "Veamos tus reclamos."));

    h.say("quiero ver mis reclamos").await;
    h.say(DNI).await;
    h.say("si").await;

    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("consultar_reclamos")
    );
    let listing = h.received().await;
    assert!(listing
        .last()
        .is_some_and(|reply| reply.contains("ID: 1, Estado: Pendiente")));

    h.say("1").await;
    let detail = h.received().await;
    assert!(detail[0].starts_with("Detalles del reclamo ID 1"));
    assert!(detail[0].contains("Pérez Juan (DNI: 30111222)"));
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
}

#[tokio::test]
async fn consult_with_no_complaints_finishes_immediately() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarDni {
        accion: Action::Consultar,
        identity: identity(),
    })
    .await;

    h.say("sí").await;

    assert_eq!(
        h.received().await,
        vec![replies::no_complaints(), replies::anything_else()]
    );
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
}

#[tokio::test]
async fn update_journey_changes_contact_field() {
    let h = Harness::new().await;
    h.classifier
        .push_response(intent("Actualizar", "Claro, actualicemos tus datos."));

    h.say("quiero cambiar mi correo").await;
    h.say("correo").await;
    h.say(DNI).await;
    h.say("si").await;

    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("confirmar_actualizacion")
    );
    let received = h.received().await;
    assert_eq!(
        received.last(),
        Some(&replies::current_field_value(
            UpdatableField::Email,
            Some("juan@viejo.com")
        ))
    );

    h.say("juan@nuevo.com").await;
    let updated = h.directory.service_customer(&dni()).await.unwrap();
    assert_eq!(updated.email.as_deref(), Some("juan@nuevo.com"));
    assert_eq!(h.received().await[0], replies::update_applied("Pérez Juan", &updated));
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::ValorActualizar), None);
    assert_eq!(state.get(StateField::CampoActualizar), None);
}

#[tokio::test]
async fn second_update_shows_value_from_first_update() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarActualizacion {
        identity: identity(),
        campo: UpdatableField::Calle,
    })
    .await;
    h.say("Nueva 999").await;
    h.received().await;

    h.seed(ConversationState::ConfirmarDni {
        accion: Action::Actualizar(UpdatableField::Calle),
        identity: identity(),
    })
    .await;
    h.say("sí").await;

    let received = h.received().await;
    assert_eq!(
        received,
        vec![replies::current_field_value(
            UpdatableField::Calle,
            Some("Nueva 999")
        )]
    );
    assert!(!received[0].contains("Laprida 120"));
    assert_eq!(
        h.state().await.get(StateField::Fase),
        Some("confirmar_actualizacion")
    );
}

#[tokio::test]
async fn invoice_journey_shows_latest_invoice() {
    let h = Harness::new().await;
    h.directory
        .add_invoice(
            dni(),
            Invoice {
                codigo_suministro: Some("S-0042".to_string()),
                numero_comprobante: Some("A-0001-00012345".to_string()),
                ..Default::default()
            },
        )
        .await;
    h.classifier
        .push_response(intent("ConsultarFacturas", "Busquemos tu factura."));

    h.say("necesito mi factura").await;
    h.say(DNI).await;
    h.say("si").await;

    let received = h.received().await;
    let invoice = &received[received.len() - 2];
    assert!(invoice.starts_with("Factura de Pérez Juan (DNI: 30111222)"));
    assert!(invoice.contains("A-0001-00012345"));
    assert_eq!(received.last(), Some(&replies::anything_else()));
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
}

// =============================================================================
// Model output and failures
// =============================================================================

#[tokio::test]
async fn malformed_classifier_output_falls_back_to_conversar() {
    let h = Harness::new().await;
    h.classifier.push_response("Claro! Te ayudo con eso.");
    h.classifier.push_response(r#"{"respuesta": "Hola"}"#);

    h.say("hola").await;
    h.say("buenas").await;

    assert_eq!(
        h.received().await,
        vec![replies::not_understood(), "Hola".to_string()]
    );
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
}

#[tokio::test]
async fn fenced_classifier_output_is_accepted() {
    let h = Harness::new().await;
    h.classifier.push_response(format!(
        "```json\n{}\n```",
        intent("Reclamo", "Vamos con el reclamo.")
    ));

    h.say("reclamo").await;

    assert_eq!(h.state().await.get(StateField::Fase), Some("pedir_dni"));
}

#[tokio::test]
async fn classifier_failure_keeps_user_in_inicio() {
    let h = Harness::new().await;
    h.classifier.push_error(AiError::network("connection reset"));

    h.say("hola").await;

    assert_eq!(h.received().await, vec![replies::classifier_unavailable()]);
    assert_eq!(h.state().await.get(StateField::Fase), Some("inicio"));
}

#[tokio::test]
async fn failed_update_returns_to_inicio_and_clears_pending_value() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarActualizacion {
        identity: identity(),
        campo: UpdatableField::Celular,
    })
    .await;
    h.directory.set_unavailable(true);

    h.say("2644123456").await;

    assert_eq!(
        h.received().await,
        vec![replies::update_failed(), replies::anything_else()]
    );
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::ValorActualizar), None);
    assert_eq!(state.get(StateField::Descripcion), None);
}

#[tokio::test]
async fn failed_registration_returns_to_inicio_and_clears_description() {
    let h = Harness::new().await;
    h.seed(ConversationState::SolicitarDescripcion {
        identity: identity(),
    })
    .await;
    h.validator.push_response(VALID);
    h.directory.set_unavailable(true);

    let report = h.say("el medidor hace chispas").await;

    assert_eq!(report.phase(), Some(Phase::Inicio));
    assert_eq!(
        h.received().await,
        vec![replies::complaint_not_registered(), replies::anything_else()]
    );
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Descripcion), None);
    assert_eq!(state.get(StateField::Dni), None);
    assert_eq!(h.directory.complaint_count().await, 0);
}

#[tokio::test]
async fn customer_without_invoices_returns_to_inicio() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarDni {
        accion: Action::ConsultarFacturas,
        identity: identity(),
    })
    .await;

    h.say("si").await;

    assert_eq!(
        h.received().await,
        vec![replies::no_invoices(), replies::anything_else()]
    );
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Accion), None);
}

#[tokio::test]
async fn unreachable_directory_during_identification_triggers_apology() {
    let h = Harness::new().await;
    h.seed(ConversationState::PedirDni {
        accion: Action::Reclamo,
    })
    .await;
    h.directory.set_unavailable(true);

    let report = h.say(DNI).await;

    assert!(matches!(report, TurnReport::Recovered { .. }));
    assert_eq!(h.received().await, vec![replies::apology()]);
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Accion), None);
}

#[tokio::test]
async fn failed_delivery_does_not_advance_the_conversation() {
    let h = Harness::new().await;
    h.seed(ConversationState::PedirDni {
        accion: Action::Reclamo,
    })
    .await;
    h.sender.set_failing(true);

    let result = h
        .handler
        .handle(HandleInboundMessageCommand::new(user(), DNI))
        .await;

    assert!(matches!(result, Err(HandleMessageError::Delivery(_))));
    assert_eq!(h.state().await.get(StateField::Fase), Some("pedir_dni"));
    assert_eq!(h.state().await.get(StateField::Dni), None);
}

#[tokio::test]
async fn cancel_mid_flow_clears_everything() {
    let h = Harness::new().await;
    h.seed(ConversationState::ConfirmarDni {
        accion: Action::Reclamo,
        identity: identity(),
    })
    .await;

    h.say("Cancelar").await;

    assert_eq!(h.received().await, vec![replies::cancelled()]);
    let state = h.state().await;
    assert_eq!(state.get(StateField::Fase), Some("inicio"));
    assert_eq!(state.get(StateField::Dni), None);
    assert_eq!(h.classifier.call_count(), 0);
}

#[tokio::test]
async fn cancel_from_new_user_leaves_no_state() {
    let h = Harness::new().await;

    h.say("cancelar").await;

    assert_eq!(h.received().await, vec![replies::nothing_to_cancel()]);
    assert!(h.state().await.is_empty());
    assert_eq!(h.classifier.call_count(), 0);
}

// =============================================================================
// History and concurrency
// =============================================================================

#[tokio::test]
async fn classifier_sees_previous_turns() {
    let h = Harness::new().await;
    h.classifier.push_response(intent("Conversar", "¡Hola Juan!"));
    h.classifier.push_response(intent("Conversar", "De nada."));

    h.say("hola").await;
    h.say("gracias").await;

    let calls = h.classifier.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].1.contains("Usuario: hola"));
    assert!(calls[1].1.contains("Bot: ¡Hola Juan!"));
}

#[tokio::test]
async fn concurrent_turns_of_one_user_are_serialised() {
    let h = Harness::new().await;
    h.classifier.set_delay(Duration::from_millis(50));

    let first = h
        .handler
        .handle(HandleInboundMessageCommand::new(user(), "hola"));
    let second = h
        .handler
        .handle(HandleInboundMessageCommand::new(user(), "buenas"));
    let (a, b) = tokio::join!(first, second);
    a.unwrap();
    b.unwrap();

    let history = h.store.history(&user()).await;
    assert_eq!(history.len(), 4);
    assert!(history[0].starts_with("Usuario: "));
    assert!(history[1].starts_with("Bot: "));
    assert!(history[2].starts_with("Usuario: "));
    assert!(history[3].starts_with("Bot: "));
}

#[tokio::test]
async fn users_do_not_share_state() {
    let h = Harness::new().await;
    let other = UserKey::new(Channel::Telegram, "5492644000000").unwrap();
    h.classifier
        .push_response(intent("Reclamo", "Vamos con el reclamo."));

    h.say("reclamo").await;

    assert_eq!(h.state().await.get(StateField::Fase), Some("pedir_dni"));
    assert!(h.store.get_state(&other).await.unwrap().is_empty());
}
