//! Customer record and the fields a customer may change through the bot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Dni, ValidationError};

/// Contact fields a customer is allowed to update from a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdatableField {
    Calle,
    Barrio,
    Celular,
    Email,
}

impl UpdatableField {
    pub const ALL: [UpdatableField; 4] = [
        UpdatableField::Calle,
        UpdatableField::Barrio,
        UpdatableField::Celular,
        UpdatableField::Email,
    ];

    /// Canonical column name, as persisted in conversation state.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatableField::Calle => "CALLE",
            UpdatableField::Barrio => "BARRIO",
            UpdatableField::Celular => "CELULAR",
            UpdatableField::Email => "EMAIL",
        }
    }

    /// Lower-case name shown to the customer.
    pub fn label(&self) -> &'static str {
        match self {
            UpdatableField::Calle => "calle",
            UpdatableField::Barrio => "barrio",
            UpdatableField::Celular => "celular",
            UpdatableField::Email => "email",
        }
    }
}

impl fmt::Display for UpdatableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UpdatableField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpdatableField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "campo_actualizar",
                    format!("'{}' is not an updatable field", s),
                )
            })
    }
}

/// Which backing record a customer was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSource {
    /// Billing records, searched first.
    Billing,
    /// Service records, where complaints and updates live.
    Service,
}

/// A utility customer as seen by the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub dni: Dni,
    pub apellido: String,
    pub nombre: String,
    #[serde(default)]
    pub calle: Option<String>,
    #[serde(default)]
    pub barrio: Option<String>,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub codigo_suministro: Option<String>,
}

impl Customer {
    /// Display name in "Apellido Nombre" order, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.apellido.trim(), self.nombre.trim())
            .trim()
            .to_string()
    }

    /// Current value of an updatable field, if recorded.
    pub fn field_value(&self, field: UpdatableField) -> Option<&str> {
        let value = match field {
            UpdatableField::Calle => &self.calle,
            UpdatableField::Barrio => &self.barrio,
            UpdatableField::Celular => &self.celular,
            UpdatableField::Email => &self.email,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Returns a copy with one field replaced.
    pub fn with_field(mut self, field: UpdatableField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            UpdatableField::Calle => self.calle = value,
            UpdatableField::Barrio => self.barrio = value,
            UpdatableField::Celular => self.celular = value,
            UpdatableField::Email => self.email = value,
        }
        self
    }
}

/// Result of looking a national id up across both customer sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub display_name: String,
    pub customer: Customer,
    pub source: CustomerSource,
}
