//! Per-user conversation state.
//!
//! Each variant carries exactly the data its phase needs, so a description
//! outside the complaint flow or an unconfirmed identity reaching an action
//! cannot be represented.

use serde::{Deserialize, Serialize};

use super::{Action, Phase};
use crate::domain::customer::UpdatableField;
use crate::domain::foundation::Dni;

/// Customer identity resolved in `pedir_dni`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub dni: Dni,
    pub nombre: String,
}

impl Identity {
    pub fn new(dni: Dni, nombre: impl Into<String>) -> Self {
        Self {
            dni,
            nombre: nombre.into(),
        }
    }
}

/// Work queued for `ejecutar_accion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingAction {
    RegistrarReclamo { descripcion: String },
    ActualizarDato { campo: UpdatableField, valor: String },
}

/// State of one user's conversation between two inbound messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "fase", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Inicio,
    SeleccionarDato,
    PedirDni {
        accion: Action,
    },
    ConfirmarDni {
        accion: Action,
        identity: Identity,
    },
    SolicitarDescripcion {
        identity: Identity,
    },
    ValidarReclamo {
        identity: Identity,
        descripcion: String,
    },
    ConsultarReclamos {
        identity: Identity,
    },
    ConfirmarActualizacion {
        identity: Identity,
        campo: UpdatableField,
    },
    EjecutarAccion {
        identity: Identity,
        pending: PendingAction,
    },
}

impl ConversationState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Inicio => Phase::Inicio,
            Self::SeleccionarDato => Phase::SeleccionarDato,
            Self::PedirDni { .. } => Phase::PedirDni,
            Self::ConfirmarDni { .. } => Phase::ConfirmarDni,
            Self::SolicitarDescripcion { .. } => Phase::SolicitarDescripcion,
            Self::ValidarReclamo { .. } => Phase::ValidarReclamo,
            Self::ConsultarReclamos { .. } => Phase::ConsultarReclamos,
            Self::ConfirmarActualizacion { .. } => Phase::ConfirmarActualizacion,
            Self::EjecutarAccion { .. } => Phase::EjecutarAccion,
        }
    }

    /// The action being pursued, derived from the variant.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Inicio | Self::SeleccionarDato => None,
            Self::PedirDni { accion } | Self::ConfirmarDni { accion, .. } => Some(*accion),
            Self::SolicitarDescripcion { .. } | Self::ValidarReclamo { .. } => {
                Some(Action::Reclamo)
            }
            Self::ConsultarReclamos { .. } => Some(Action::Consultar),
            Self::ConfirmarActualizacion { campo, .. } => Some(Action::Actualizar(*campo)),
            Self::EjecutarAccion { pending, .. } => Some(match pending {
                PendingAction::RegistrarReclamo { .. } => Action::Reclamo,
                PendingAction::ActualizarDato { campo, .. } => Action::Actualizar(*campo),
            }),
        }
    }

    /// Identity captured in `pedir_dni`, once present.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Inicio | Self::SeleccionarDato | Self::PedirDni { .. } => None,
            Self::ConfirmarDni { identity, .. }
            | Self::SolicitarDescripcion { identity }
            | Self::ValidarReclamo { identity, .. }
            | Self::ConsultarReclamos { identity }
            | Self::ConfirmarActualizacion { identity, .. }
            | Self::EjecutarAccion { identity, .. } => Some(identity),
        }
    }

    pub fn is_inicio(&self) -> bool {
        matches!(self, Self::Inicio)
    }
}
