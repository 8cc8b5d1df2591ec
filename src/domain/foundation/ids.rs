//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Messaging transport a user reaches the bot through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Whatsapp,
    Telegram,
    ContactCenter,
    Console,
}

impl Channel {
    /// Returns the namespace segment used in store keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Telegram => "telegram",
            Channel::ContactCenter => "contact_center",
            Channel::Console => "console",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(Channel::Whatsapp),
            "telegram" => Ok(Channel::Telegram),
            "contact_center" => Ok(Channel::ContactCenter),
            "console" => Ok(Channel::Console),
            other => Err(ValidationError::invalid_format(
                "channel",
                format!("unknown channel '{}'", other),
            )),
        }
    }
}

/// Channel-qualified user identifier; every conversation is keyed by one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserKey {
    channel: Channel,
    user_id: String,
}

impl UserKey {
    /// Creates a new UserKey, returning error if the transport id is empty.
    pub fn new(channel: Channel, user_id: impl Into<String>) -> Result<Self, ValidationError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self { channel, user_id })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the transport-specific user id (phone number, chat id, ...).
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.user_id)
    }
}

impl FromStr for UserKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (channel, user_id) = s.split_once(':').ok_or_else(|| {
            ValidationError::invalid_format("user_key", "expected '<channel>:<user_id>'")
        })?;
        UserKey::new(channel.parse()?, user_id)
    }
}

/// Customer national identity number. Digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dni(String);

impl Dni {
    /// Parses a national id, rejecting anything that is not all ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::empty_field("dni"));
        }
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("dni", "only digits allowed"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Dni {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Dni::parse(&value)
    }
}

impl From<Dni> for String {
    fn from(dni: Dni) -> Self {
        dni.0
    }
}

/// Identifier of a registered complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(u64);

impl ComplaintId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ComplaintId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "complaint_id",
                "only digits allowed",
            ));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("complaint_id", e.to_string()))
    }
}

/// Correlation id for a single inbound-message turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(Uuid);

impl TurnId {
    /// Creates a new random TurnId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
