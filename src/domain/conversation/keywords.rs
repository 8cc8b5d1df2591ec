//! Fixed keyword sets recognised by the state machine.
//!
//! All matchers expect text already passed through [`keyword_form`].

use crate::domain::customer::UpdatableField;

pub const CANCEL_KEYWORDS: [&str; 2] = ["cancelar", "salir"];

/// Menu words accepted in `seleccionar_dato` and the field each selects.
pub const FIELD_OPTIONS: [(&str, UpdatableField); 7] = [
    ("calle", UpdatableField::Calle),
    ("barrio", UpdatableField::Barrio),
    ("celular", UpdatableField::Celular),
    ("teléfono", UpdatableField::Celular),
    ("telefono", UpdatableField::Celular),
    ("correo", UpdatableField::Email),
    ("mail", UpdatableField::Email),
];

/// Answer to the "is this you?" question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

/// Canonical form used for every keyword comparison.
pub fn keyword_form(text: &str) -> String {
    text.trim().to_lowercase()
}

pub fn is_cancel(text: &str) -> bool {
    CANCEL_KEYWORDS.contains(&text)
}

pub fn parse_confirmation(text: &str) -> Option<Confirmation> {
    match text {
        "sí" | "si" => Some(Confirmation::Yes),
        "no" => Some(Confirmation::No),
        _ => None,
    }
}

pub fn parse_field_choice(text: &str) -> Option<UpdatableField> {
    FIELD_OPTIONS
        .iter()
        .find(|(word, _)| *word == text)
        .map(|(_, field)| *field)
}
