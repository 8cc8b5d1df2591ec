//! Flat hash form of a conversation state, as persisted by the store.
//!
//! The store keeps one string-to-string hash per user with the keys
//! `fase`, `dni`, `nombre`, `accion`, `campo_actualizar`, `descripcion` and
//! `valor_actualizar`. Converting back into a [`ConversationState`] is the
//! only place a corrupt or half-written record can be detected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{Action, ConversationState, Identity, PendingAction, Phase};
use crate::domain::customer::UpdatableField;
use crate::domain::foundation::{Dni, ValidationError};

/// A key of the persisted state hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    Fase,
    Dni,
    Nombre,
    Accion,
    CampoActualizar,
    Descripcion,
    ValorActualizar,
}

impl StateField {
    pub const ALL: [StateField; 7] = [
        StateField::Fase,
        StateField::Dni,
        StateField::Nombre,
        StateField::Accion,
        StateField::CampoActualizar,
        StateField::Descripcion,
        StateField::ValorActualizar,
    ];

    /// Fields cleared when the user cancels a flow.
    pub const CLEARED_ON_CANCEL: [StateField; 5] = [
        StateField::Dni,
        StateField::Accion,
        StateField::Nombre,
        StateField::CampoActualizar,
        StateField::Descripcion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateField::Fase => "fase",
            StateField::Dni => "dni",
            StateField::Nombre => "nombre",
            StateField::Accion => "accion",
            StateField::CampoActualizar => "campo_actualizar",
            StateField::Descripcion => "descripcion",
            StateField::ValorActualizar => "valor_actualizar",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StateField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("state_field", format!("unknown key '{}'", s)))
    }
}

/// Field-level changes needed to move a stored record to a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub set: Vec<(StateField, String)>,
    pub delete: Vec<StateField>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.delete.is_empty()
    }
}

/// Persisted conversation state. An empty record means `inicio`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateRecord {
    fields: BTreeMap<StateField, String>,
}

impl StateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from raw hash entries, skipping keys it does not know.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .filter_map(|(k, v)| k.as_ref().parse::<StateField>().ok().map(|field| (field, v.into())))
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: StateField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: StateField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn remove(&mut self, field: StateField) {
        self.fields.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Computes which fields to write and which to delete to reach `next`.
    pub fn diff(&self, next: &StateRecord) -> RecordChanges {
        let set = next
            .fields
            .iter()
            .filter(|(field, value)| self.fields.get(*field) != Some(*value))
            .map(|(field, value)| (*field, value.clone()))
            .collect();
        let delete = self
            .fields
            .keys()
            .filter(|field| !next.fields.contains_key(*field))
            .copied()
            .collect();
        RecordChanges { set, delete }
    }

    fn require(&self, field: StateField) -> Result<&str, ValidationError> {
        self.get(field)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ValidationError::empty_field(field.as_str()))
    }

    fn identity(&self) -> Result<Identity, ValidationError> {
        let dni = Dni::parse(self.require(StateField::Dni)?)?;
        let nombre = self.require(StateField::Nombre)?;
        Ok(Identity::new(dni, nombre))
    }

    fn action(&self) -> Result<Action, ValidationError> {
        Action::from_parts(
            self.require(StateField::Accion)?,
            self.get(StateField::CampoActualizar),
        )
    }

    fn campo(&self) -> Result<UpdatableField, ValidationError> {
        self.require(StateField::CampoActualizar)?.parse()
    }

    fn expect_action(&self, expected: &str) -> Result<(), ValidationError> {
        let accion = self.require(StateField::Accion)?;
        if accion == expected {
            Ok(())
        } else {
            Err(ValidationError::invalid_format(
                "accion",
                format!("expected '{}', found '{}'", expected, accion),
            ))
        }
    }
}

impl From<&ConversationState> for StateRecord {
    fn from(state: &ConversationState) -> Self {
        let mut record = StateRecord::new();
        record.set(StateField::Fase, state.phase().as_str());

        if let Some(action) = state.action() {
            record.set(StateField::Accion, action.as_str());
            if let Some(field) = action.field() {
                record.set(StateField::CampoActualizar, field.as_str());
            }
        }
        if let Some(identity) = state.identity() {
            record.set(StateField::Dni, identity.dni.as_str());
            record.set(StateField::Nombre, identity.nombre.clone());
        }
        match state {
            ConversationState::ValidarReclamo { descripcion, .. }
            | ConversationState::EjecutarAccion {
                pending: PendingAction::RegistrarReclamo { descripcion },
                ..
            } => record.set(StateField::Descripcion, descripcion.clone()),
            ConversationState::EjecutarAccion {
                pending: PendingAction::ActualizarDato { valor, .. },
                ..
            } => record.set(StateField::ValorActualizar, valor.clone()),
            _ => {}
        }
        record
    }
}

impl TryFrom<&StateRecord> for ConversationState {
    type Error = ValidationError;

    fn try_from(record: &StateRecord) -> Result<Self, Self::Error> {
        let phase = match record.get(StateField::Fase) {
            None => Phase::Inicio,
            Some(raw) => raw.parse()?,
        };

        let state = match phase {
            // Leftover fields under `inicio` carry no meaning.
            Phase::Inicio => ConversationState::Inicio,
            Phase::SeleccionarDato => ConversationState::SeleccionarDato,
            Phase::PedirDni => ConversationState::PedirDni {
                accion: record.action()?,
            },
            Phase::ConfirmarDni => ConversationState::ConfirmarDni {
                accion: record.action()?,
                identity: record.identity()?,
            },
            Phase::SolicitarDescripcion => {
                record.expect_action("reclamo")?;
                ConversationState::SolicitarDescripcion {
                    identity: record.identity()?,
                }
            }
            Phase::ValidarReclamo => {
                record.expect_action("reclamo")?;
                ConversationState::ValidarReclamo {
                    identity: record.identity()?,
                    descripcion: record.require(StateField::Descripcion)?.to_string(),
                }
            }
            Phase::ConsultarReclamos => {
                record.expect_action("consultar")?;
                ConversationState::ConsultarReclamos {
                    identity: record.identity()?,
                }
            }
            Phase::ConfirmarActualizacion => {
                record.expect_action("actualizar")?;
                ConversationState::ConfirmarActualizacion {
                    identity: record.identity()?,
                    campo: record.campo()?,
                }
            }
            Phase::EjecutarAccion => {
                let pending = match record.action()? {
                    Action::Reclamo => PendingAction::RegistrarReclamo {
                        descripcion: record.require(StateField::Descripcion)?.to_string(),
                    },
                    Action::Actualizar(campo) => PendingAction::ActualizarDato {
                        campo,
                        valor: record
                            .get(StateField::ValorActualizar)
                            .unwrap_or_default()
                            .to_string(),
                    },
                    other => {
                        return Err(ValidationError::invalid_format(
                            "accion",
                            format!("'{}' has nothing to execute", other),
                        ))
                    }
                };
                ConversationState::EjecutarAccion {
                    identity: record.identity()?,
                    pending,
                }
            }
        };
        Ok(state)
    }
}
