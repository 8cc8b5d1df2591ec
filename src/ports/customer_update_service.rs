//! Customer Update Service Port - Change one allow-listed contact field.

use async_trait::async_trait;

use super::ServiceError;
use crate::domain::customer::{Customer, UpdatableField};
use crate::domain::foundation::Dni;

#[async_trait]
pub trait CustomerUpdateService: Send + Sync {
    /// The record updates are written to, as it stands now
    ///
    /// Falls back to the billing record when the customer has never
    /// changed a field. `None` when the DNI is unknown to both.
    async fn current(&self, dni: &Dni) -> Result<Option<Customer>, ServiceError>;

    /// Apply a new value and return the updated record
    ///
    /// The field type restricts updates to the allow-list
    /// (street, neighbourhood, mobile, email).
    async fn apply(
        &self,
        dni: &Dni,
        field: UpdatableField,
        value: &str,
    ) -> Result<Customer, ServiceError>;
}
