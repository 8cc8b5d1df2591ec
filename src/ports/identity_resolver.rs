//! Identity Resolver Port - National id to customer.
//!
//! Implementations search the billing records first and the service records
//! second; the first match wins.

use async_trait::async_trait;

use super::ServiceError;
use crate::domain::customer::ResolvedIdentity;
use crate::domain::foundation::Dni;

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a national id
    ///
    /// # Returns
    /// `None` when no source knows the id
    async fn resolve(&self, dni: &Dni) -> Result<Option<ResolvedIdentity>, ServiceError>;
}
