//! Invoices issued to a customer's supply account.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pagada,
    Pendiente,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pagada => write!(f, "Pagada"),
            InvoiceStatus::Pendiente => write!(f, "Pendiente"),
        }
    }
}

/// A billing document. Every attribute is optional because the billing
/// source is sparse; missing values render as "No disponible".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub codigo_suministro: Option<String>,
    pub numero_comprobante: Option<String>,
    pub fecha_emision: Option<NaiveDate>,
    pub estado: Option<InvoiceStatus>,
    pub total: Option<f64>,
    pub vencimiento: Option<NaiveDate>,
    pub calle: Option<String>,
    pub barrio: Option<String>,
    pub numero_medidor: Option<String>,
    pub periodo: Option<String>,
    pub consumo_kwh: Option<f64>,
}
