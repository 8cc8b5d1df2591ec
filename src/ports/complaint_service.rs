//! Complaint Service Port - Register and look up complaints.

use async_trait::async_trait;

use super::ServiceError;
use crate::domain::customer::{ComplaintDetail, ComplaintSummary};
use crate::domain::foundation::{ComplaintId, Dni};

/// How many complaints `list_recent` returns at most.
pub const RECENT_COMPLAINTS_LIMIT: usize = 5;

#[async_trait]
pub trait ComplaintService: Send + Sync {
    /// Register a new complaint in `Pendiente` status
    async fn register(&self, dni: &Dni, description: &str) -> Result<ComplaintId, ServiceError>;

    /// Fetch one complaint with its customer
    async fn get_by_id(&self, id: ComplaintId) -> Result<Option<ComplaintDetail>, ServiceError>;

    /// Most recent complaints of a customer, newest first, at most
    /// [`RECENT_COMPLAINTS_LIMIT`]
    async fn list_recent(&self, dni: &Dni) -> Result<Vec<ComplaintSummary>, ServiceError>;
}
