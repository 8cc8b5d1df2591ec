//! Complaints filed by customers about the electricity service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Customer;
use crate::domain::foundation::{ComplaintId, Dni};

/// Maximum characters of a description shown in a summary line.
pub const SUMMARY_DESCRIPTION_CHARS: usize = 50;

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Newly registered; every complaint starts here.
    Pendiente,
    EnProceso,
    Resuelto,
    Cancelado,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplaintStatus::Pendiente => "Pendiente",
            ComplaintStatus::EnProceso => "En proceso",
            ComplaintStatus::Resuelto => "Resuelto",
            ComplaintStatus::Cancelado => "Cancelado",
        };
        write!(f, "{}", s)
    }
}

/// A registered complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub dni: Dni,
    pub descripcion: String,
    pub estado: ComplaintStatus,
    pub fecha: DateTime<Utc>,
}

impl Complaint {
    pub fn summary(&self) -> ComplaintSummary {
        ComplaintSummary {
            id: self.id,
            estado: self.estado,
            descripcion: self.descripcion.clone(),
        }
    }
}

/// One entry of a customer's recent complaint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintSummary {
    pub id: ComplaintId,
    pub estado: ComplaintStatus,
    pub descripcion: String,
}

impl ComplaintSummary {
    /// Single-line rendering with the description cut to fifty characters.
    pub fn line(&self) -> String {
        let mut chars = self.descripcion.chars();
        let head: String = chars.by_ref().take(SUMMARY_DESCRIPTION_CHARS).collect();
        let ellipsis = if chars.next().is_some() { "..." } else { "" };
        format!(
            "ID: {}, Estado: {}, Descripción: {}{}",
            self.id, self.estado, head, ellipsis
        )
    }
}

/// A complaint together with the customer that filed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
    pub customer: Customer,
}

impl ComplaintDetail {
    /// True if the complaint was filed by the given national id.
    pub fn belongs_to(&self, dni: &Dni) -> bool {
        &self.complaint.dni == dni
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(descripcion: &str) -> ComplaintSummary {
        ComplaintSummary {
            id: ComplaintId::new(7),
            estado: ComplaintStatus::Pendiente,
            descripcion: descripcion.to_string(),
        }
    }

    #[test]
    fn short_description_is_shown_whole() {
        assert_eq!(
            summary("sin luz").line(),
            "ID: 7, Estado: Pendiente, Descripción: sin luz"
        );
    }

    #[test]
    fn long_description_is_cut_at_fifty_chars() {
        let text = "á".repeat(60);
        let line = summary(&text).line();
        assert!(line.ends_with(&format!("{}...", "á".repeat(50))));
    }

    #[test]
    fn exactly_fifty_chars_has_no_ellipsis() {
        let text = "x".repeat(50);
        assert!(!summary(&text).line().ends_with("..."));
    }

    #[test]
    fn status_displays_human_label() {
        assert_eq!(ComplaintStatus::EnProceso.to_string(), "En proceso");
    }
}
