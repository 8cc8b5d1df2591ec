//! Conversation engine - the per-user dialogue state machine.
//!
//! `process` is a function of (current state, inbound text, history) plus
//! the injected collaborators. It never touches the store or the transport:
//! it returns the next state and the ordered replies, and the turn handler
//! decides when to persist and deliver them.
//!
//! Phases that store data satisfying the next phase's precondition cascade
//! within the same turn (`solicitar_descripcion` -> `validar_reclamo` ->
//! `ejecutar_accion`, `confirmar_actualizacion` -> `ejecutar_accion`). The
//! cascade runs in memory and is bounded by `max_cascade_hops`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::keywords::{self, Confirmation};
use super::normalize::normalize_for_classification;
use super::{
    replies, Action, ClaimVerdict, ConversationState, EngineError, Identity, Intent, IntentResult,
    PendingAction,
};
use crate::domain::foundation::{ComplaintId, Dni, StateMachine};
use crate::ports::{
    ClaimValidator, ComplaintService, CustomerUpdateService, IdentityResolver, IntentClassifier,
    InvoiceService,
};

/// Minimum non-whitespace characters in a complaint description.
pub const MIN_DESCRIPTION_CHARS: usize = 3;

/// Tuning for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum automatic re-entries within one turn.
    pub max_cascade_hops: usize,
    /// Upper bound for every collaborator call.
    pub call_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_hops: 3,
            call_timeout: Duration::from_secs(35),
        }
    }
}

/// Collaborators the engine consults.
#[derive(Clone)]
pub struct EngineServices {
    pub classifier: Arc<dyn IntentClassifier>,
    pub validator: Arc<dyn ClaimValidator>,
    pub identities: Arc<dyn IdentityResolver>,
    pub complaints: Arc<dyn ComplaintService>,
    pub updates: Arc<dyn CustomerUpdateService>,
    pub invoices: Arc<dyn InvoiceService>,
}

/// Result of processing one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub replies: Vec<String>,
}

impl TurnOutcome {
    fn new(state: ConversationState, replies: Vec<String>) -> Self {
        Self { state, replies }
    }

    fn stay(state: ConversationState, reply: String) -> Self {
        Self::new(state, vec![reply])
    }
}

pub struct ConversationEngine {
    services: EngineServices,
    config: EngineConfig,
}

impl ConversationEngine {
    pub fn new(services: EngineServices, config: EngineConfig) -> Self {
        Self { services, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes one inbound message against the current state.
    pub async fn process(
        &self,
        state: ConversationState,
        text: &str,
        history: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let keyword = keywords::keyword_form(text);

        if keywords::is_cancel(&keyword) {
            if state.phase().is_cancellable() {
                tracing::info!(phase = %state.phase(), "Flow cancelled by user");
                return Ok(TurnOutcome::stay(
                    ConversationState::Inicio,
                    replies::cancelled(),
                ));
            }
            return Ok(TurnOutcome::stay(state, replies::nothing_to_cancel()));
        }

        let mut state = state;
        let mut out = Vec::new();
        let mut hops = 0;

        loop {
            let from = state.phase();
            let step = self.step(state, text, &keyword, history).await?;
            let to = step.state.phase();
            from.transition_to(to)
                .map_err(EngineError::InvalidTransition)?;
            tracing::debug!(from = %from, to = %to, "Phase step");

            out.extend(step.replies);
            state = step.state;

            if !to.is_automatic() {
                break;
            }
            hops += 1;
            if hops > self.config.max_cascade_hops {
                return Err(EngineError::CascadeLimit(self.config.max_cascade_hops));
            }
        }

        Ok(TurnOutcome::new(state, out))
    }

    async fn step(
        &self,
        state: ConversationState,
        text: &str,
        keyword: &str,
        history: &str,
    ) -> Result<TurnOutcome, EngineError> {
        match state {
            ConversationState::Inicio => Ok(self.classify(text, history).await),

            ConversationState::SeleccionarDato => Ok(match keywords::parse_field_choice(keyword) {
                Some(field) => TurnOutcome::stay(
                    ConversationState::PedirDni {
                        accion: Action::Actualizar(field),
                    },
                    replies::field_selected(keyword),
                ),
                None => {
                    tracing::debug!("Unrecognised field choice");
                    TurnOutcome::stay(
                        ConversationState::SeleccionarDato,
                        replies::field_choice_invalid(),
                    )
                }
            }),

            ConversationState::PedirDni { accion } => self.capture_identity(accion, keyword).await,

            ConversationState::ConfirmarDni { accion, identity } => {
                match keywords::parse_confirmation(keyword) {
                    None => Ok(TurnOutcome::stay(
                        ConversationState::ConfirmarDni { accion, identity },
                        replies::confirmation_invalid(),
                    )),
                    Some(Confirmation::No) => Ok(TurnOutcome::stay(
                        ConversationState::Inicio,
                        replies::identity_rejected(),
                    )),
                    Some(Confirmation::Yes) => self.start_action(accion, identity).await,
                }
            }

            ConversationState::SolicitarDescripcion { identity } => {
                let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
                if meaningful < MIN_DESCRIPTION_CHARS {
                    tracing::debug!(chars = meaningful, "Complaint description too short");
                    return Ok(TurnOutcome::stay(
                        ConversationState::SolicitarDescripcion { identity },
                        replies::description_too_short(),
                    ));
                }
                Ok(TurnOutcome::new(
                    ConversationState::ValidarReclamo {
                        identity,
                        descripcion: text.trim().to_string(),
                    },
                    Vec::new(),
                ))
            }

            ConversationState::ValidarReclamo {
                identity,
                descripcion,
            } => Ok(self.validate_claim(identity, descripcion, history).await),

            ConversationState::ConsultarReclamos { identity } => {
                self.show_complaint(identity, keyword).await
            }

            ConversationState::ConfirmarActualizacion { identity, campo } => Ok(TurnOutcome::new(
                ConversationState::EjecutarAccion {
                    identity,
                    pending: PendingAction::ActualizarDato {
                        campo,
                        valor: text.trim().to_string(),
                    },
                },
                Vec::new(),
            )),

            ConversationState::EjecutarAccion { identity, pending } => {
                Ok(self.execute(identity, pending).await)
            }
        }
    }

    async fn classify(&self, text: &str, history: &str) -> TurnOutcome {
        let normalized = normalize_for_classification(text);
        let result = match self
            .bounded("intent classification", self.services.classifier.classify(&normalized, history))
            .await
        {
            Ok(Ok(raw)) => IntentResult::parse(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unusable classifier output, falling back to Conversar");
                IntentResult::fallback()
            }),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Intent classifier failed");
                IntentResult::unavailable()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Intent classifier timed out");
                IntentResult::unavailable()
            }
        };
        tracing::info!(intent = ?result.intent, "Intent detected");

        let mut out = vec![result.reply];
        let next = match result.intent {
            Intent::Reclamo => ConversationState::PedirDni {
                accion: Action::Reclamo,
            },
            Intent::Consultar => ConversationState::PedirDni {
                accion: Action::Consultar,
            },
            Intent::ConsultarFacturas => ConversationState::PedirDni {
                accion: Action::ConsultarFacturas,
            },
            Intent::Actualizar => ConversationState::SeleccionarDato,
            Intent::Conversar => ConversationState::Inicio,
        };
        match next {
            ConversationState::PedirDni { .. } => out.push(replies::ask_dni()),
            ConversationState::SeleccionarDato => out.push(replies::ask_field()),
            _ => {}
        }
        TurnOutcome::new(next, out)
    }

    async fn capture_identity(
        &self,
        accion: Action,
        keyword: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let Ok(dni) = Dni::parse(keyword) else {
            tracing::debug!("Non-numeric national id");
            return Ok(TurnOutcome::stay(
                ConversationState::PedirDni { accion },
                replies::dni_invalid(),
            ));
        };

        let resolved = self
            .bounded("identity resolution", self.services.identities.resolve(&dni))
            .await?
            .map_err(|e| EngineError::service("identity resolution", e))?;

        Ok(match resolved {
            Some(found) => {
                tracing::info!(source = ?found.source, "Customer identified");
                let reply = replies::confirm_identity(&found.display_name);
                TurnOutcome::stay(
                    ConversationState::ConfirmarDni {
                        accion,
                        identity: Identity::new(dni, found.display_name),
                    },
                    reply,
                )
            }
            None => {
                tracing::info!("National id not found");
                TurnOutcome::stay(ConversationState::PedirDni { accion }, replies::dni_not_found())
            }
        })
    }

    async fn start_action(
        &self,
        accion: Action,
        identity: Identity,
    ) -> Result<TurnOutcome, EngineError> {
        match accion {
            Action::Reclamo => {
                let reply = replies::ask_description(&identity.nombre);
                Ok(TurnOutcome::stay(
                    ConversationState::SolicitarDescripcion { identity },
                    reply,
                ))
            }

            Action::Consultar => {
                let listed = self
                    .bounded("complaint listing", self.services.complaints.list_recent(&identity.dni))
                    .await;
                Ok(match listed {
                    Ok(Ok(list)) if !list.is_empty() => {
                        let reply = replies::complaints_listed(&identity.nombre, &list);
                        TurnOutcome::stay(ConversationState::ConsultarReclamos { identity }, reply)
                    }
                    Ok(Ok(_)) => finish(replies::no_complaints()),
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Complaint listing failed");
                        finish(replies::complaints_unavailable())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Complaint listing timed out");
                        finish(replies::complaints_unavailable())
                    }
                })
            }

            Action::Actualizar(campo) => {
                let current = self
                    .bounded("current value lookup", self.services.updates.current(&identity.dni))
                    .await?
                    .map_err(|e| EngineError::service("current value lookup", e))?;
                let value = current
                    .as_ref()
                    .and_then(|customer| customer.field_value(campo));
                let reply = replies::current_field_value(campo, value);
                Ok(TurnOutcome::stay(
                    ConversationState::ConfirmarActualizacion { identity, campo },
                    reply,
                ))
            }

            Action::ConsultarFacturas => {
                let listed = self
                    .bounded("invoice listing", self.services.invoices.list_invoices(&identity.dni))
                    .await;
                Ok(match listed {
                    Ok(Ok(invoices)) => match invoices.first() {
                        Some(latest) => {
                            finish(replies::invoice(&identity.nombre, &identity.dni, latest))
                        }
                        None => finish(replies::no_invoices()),
                    },
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Invoice listing failed");
                        finish(replies::invoices_unavailable())
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Invoice listing timed out");
                        finish(replies::invoices_unavailable())
                    }
                })
            }
        }
    }

    async fn validate_claim(
        &self,
        identity: Identity,
        descripcion: String,
        history: &str,
    ) -> TurnOutcome {
        let verdict = match self
            .bounded(
                "claim validation",
                self.services.validator.validate(&descripcion, history),
            )
            .await
        {
            Ok(Ok(raw)) => ClaimVerdict::parse(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unusable validator output, treating claim as invalid");
                ClaimVerdict::fallback()
            }),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Claim validator failed");
                ClaimVerdict::unavailable()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Claim validator timed out");
                ClaimVerdict::unavailable()
            }
        };

        if verdict.is_valid {
            tracing::info!("Complaint accepted by validator");
            TurnOutcome::new(
                ConversationState::EjecutarAccion {
                    identity,
                    pending: PendingAction::RegistrarReclamo { descripcion },
                },
                Vec::new(),
            )
        } else {
            tracing::info!("Complaint rejected by validator");
            TurnOutcome::stay(
                ConversationState::SolicitarDescripcion { identity },
                replies::claim_rejected(&verdict.message),
            )
        }
    }

    async fn show_complaint(
        &self,
        identity: Identity,
        keyword: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let Ok(id) = keyword.parse::<ComplaintId>() else {
            return Ok(TurnOutcome::stay(
                ConversationState::ConsultarReclamos { identity },
                replies::complaint_id_invalid(),
            ));
        };

        let fetched = self
            .bounded("complaint lookup", self.services.complaints.get_by_id(id))
            .await;
        Ok(match fetched {
            Ok(Ok(Some(detail))) if detail.belongs_to(&identity.dni) => {
                finish(replies::complaint_detail(&detail))
            }
            Ok(Ok(_)) => {
                tracing::info!(complaint_id = %id, "Complaint not found for customer");
                TurnOutcome::stay(
                    ConversationState::ConsultarReclamos { identity },
                    replies::complaint_not_found(),
                )
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Complaint lookup failed");
                finish(replies::complaints_unavailable())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Complaint lookup timed out");
                finish(replies::complaints_unavailable())
            }
        })
    }

    async fn execute(&self, identity: Identity, pending: PendingAction) -> TurnOutcome {
        let reply = match pending {
            PendingAction::RegistrarReclamo { descripcion } => {
                let registered = self
                    .bounded(
                        "complaint registration",
                        self.services.complaints.register(&identity.dni, &descripcion),
                    )
                    .await;
                match registered {
                    Ok(Ok(id)) => {
                        tracing::info!(complaint_id = %id, "Complaint registered");
                        replies::complaint_registered(&identity.nombre, id, &descripcion)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Complaint registration failed");
                        replies::complaint_not_registered()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Complaint registration timed out");
                        replies::complaint_not_registered()
                    }
                }
            }
            PendingAction::ActualizarDato { campo, valor } => {
                let applied = self
                    .bounded(
                        "customer update",
                        self.services.updates.apply(&identity.dni, campo, &valor),
                    )
                    .await;
                match applied {
                    Ok(Ok(customer)) => {
                        tracing::info!(field = %campo, "Customer field updated");
                        replies::update_applied(&identity.nombre, &customer)
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, field = %campo, "Customer update failed");
                        replies::update_failed()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, field = %campo, "Customer update timed out");
                        replies::update_failed()
                    }
                }
            }
        };
        finish(reply)
    }

    async fn bounded<F, T>(&self, operation: &'static str, call: F) -> Result<T, EngineError>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(self.config.call_timeout, call)
            .await
            .map_err(|_| EngineError::Timeout {
                operation,
                timeout: self.config.call_timeout,
            })
    }
}

/// Ends a sub-flow: result message, the follow-up prompt, back to `inicio`.
fn finish(result: String) -> TurnOutcome {
    TurnOutcome::new(
        ConversationState::Inicio,
        vec![result, replies::anything_else()],
    )
}
