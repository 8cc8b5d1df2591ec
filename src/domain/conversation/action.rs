//! The operation a conversation is driving toward.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::customer::UpdatableField;
use crate::domain::foundation::ValidationError;

/// Action chosen in `inicio` (or `seleccionar_dato`) and carried until the
/// customer's identity is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// File a new complaint.
    Reclamo,
    /// Change one contact field.
    Actualizar(UpdatableField),
    /// List recent complaints and drill into one.
    Consultar,
    /// Show the latest invoice.
    ConsultarFacturas,
}

impl Action {
    /// Persisted `accion` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Reclamo => "reclamo",
            Action::Actualizar(_) => "actualizar",
            Action::Consultar => "consultar",
            Action::ConsultarFacturas => "consultar_facturas",
        }
    }

    /// Field being updated, only for `Actualizar`.
    pub fn field(&self) -> Option<UpdatableField> {
        match self {
            Action::Actualizar(field) => Some(*field),
            _ => None,
        }
    }

    /// Rebuilds an action from its persisted `accion` and `campo_actualizar`.
    pub fn from_parts(accion: &str, campo: Option<&str>) -> Result<Self, ValidationError> {
        match accion {
            "reclamo" => Ok(Action::Reclamo),
            "consultar" => Ok(Action::Consultar),
            "consultar_facturas" => Ok(Action::ConsultarFacturas),
            "actualizar" => {
                let campo = campo.ok_or_else(|| ValidationError::empty_field("campo_actualizar"))?;
                Ok(Action::Actualizar(campo.parse()?))
            }
            other => Err(ValidationError::invalid_format(
                "accion",
                format!("unknown action '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
