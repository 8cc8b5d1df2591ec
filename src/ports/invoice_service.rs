//! Invoice Service Port - A customer's invoices.

use async_trait::async_trait;

use super::ServiceError;
use crate::domain::customer::Invoice;
use crate::domain::foundation::Dni;

#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// All invoices of a customer, most recent first
    async fn list_invoices(&self, dni: &Dni) -> Result<Vec<Invoice>, ServiceError>;
}
