//! In-Memory Customer Directory
//!
//! Two customer sources like the production back office: billing records
//! (searched first, read-only here) and service records (where complaints
//! and contact updates live). Implements every customer-facing service port.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::customer::{
    Complaint, ComplaintDetail, ComplaintStatus, ComplaintSummary, Customer, CustomerSource,
    Invoice, ResolvedIdentity, UpdatableField,
};
use crate::domain::foundation::{ComplaintId, Dni};
use crate::ports::{
    ComplaintService, CustomerUpdateService, IdentityResolver, InvoiceService, ServiceError,
    RECENT_COMPLAINTS_LIMIT,
};

#[derive(Debug, Default)]
struct Records {
    billing: HashMap<Dni, Customer>,
    service: HashMap<Dni, Customer>,
    complaints: BTreeMap<ComplaintId, Complaint>,
    invoices: HashMap<Dni, Vec<Invoice>>,
    last_complaint_id: u64,
}

impl Records {
    fn insert_complaint(&mut self, complaint: Complaint) {
        self.last_complaint_id = self.last_complaint_id.max(complaint.id.value());
        self.complaints.insert(complaint.id, complaint);
    }

    /// Service record for `dni`, copied over from billing when only billing knows it.
    fn service_record(&mut self, dni: &Dni) -> Option<&mut Customer> {
        if !self.service.contains_key(dni) {
            let billing = self.billing.get(dni)?.clone();
            tracing::info!("Materialising billing customer into service records");
            self.service.insert(dni.clone(), billing);
        }
        self.service.get_mut(dni)
    }
}

/// Seed data for [`InMemoryCustomerDirectory::from_json`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryFixture {
    pub billing: Vec<Customer>,
    pub service: Vec<Customer>,
    pub complaints: Vec<Complaint>,
    pub invoices: Vec<InvoiceFixture>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceFixture {
    pub dni: Dni,
    #[serde(flatten)]
    pub invoice: Invoice,
}

/// Customer directory held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerDirectory {
    records: Arc<RwLock<Records>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a JSON fixture document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fixture: DirectoryFixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    pub fn from_fixture(fixture: DirectoryFixture) -> Self {
        let mut records = Records::default();
        for customer in fixture.billing {
            records.billing.insert(customer.dni.clone(), customer);
        }
        for customer in fixture.service {
            records.service.insert(customer.dni.clone(), customer);
        }
        for complaint in fixture.complaints {
            records.insert_complaint(complaint);
        }
        for entry in fixture.invoices {
            records.invoices.entry(entry.dni).or_default().push(entry.invoice);
        }

        Self {
            records: Arc::new(RwLock::new(records)),
            unavailable: Arc::default(),
        }
    }

    /// Makes every call fail with `ServiceError::Unavailable` (for tests).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn add_billing_customer(&self, customer: Customer) {
        let mut records = self.records.write().await;
        records.billing.insert(customer.dni.clone(), customer);
    }

    pub async fn add_service_customer(&self, customer: Customer) {
        let mut records = self.records.write().await;
        records.service.insert(customer.dni.clone(), customer);
    }

    pub async fn add_complaint(&self, complaint: Complaint) {
        self.records.write().await.insert_complaint(complaint);
    }

    pub async fn add_invoice(&self, dni: Dni, invoice: Invoice) {
        let mut records = self.records.write().await;
        records.invoices.entry(dni).or_default().push(invoice);
    }

    /// Service record of a customer, if materialised (for tests).
    pub async fn service_customer(&self, dni: &Dni) -> Option<Customer> {
        self.records.read().await.service.get(dni).cloned()
    }

    pub async fn complaint(&self, id: ComplaintId) -> Option<Complaint> {
        self.records.read().await.complaints.get(&id).cloned()
    }

    pub async fn complaint_count(&self) -> usize {
        self.records.read().await.complaints.len()
    }

    fn ensure_available(&self) -> Result<(), ServiceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ServiceError::unavailable("customer directory offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityResolver for InMemoryCustomerDirectory {
    async fn resolve(&self, dni: &Dni) -> Result<Option<ResolvedIdentity>, ServiceError> {
        self.ensure_available()?;
        let records = self.records.read().await;

        let found = records
            .billing
            .get(dni)
            .map(|c| (c, CustomerSource::Billing))
            .or_else(|| records.service.get(dni).map(|c| (c, CustomerSource::Service)));

        Ok(found.map(|(customer, source)| ResolvedIdentity {
            display_name: customer.display_name(),
            customer: customer.clone(),
            source,
        }))
    }
}

#[async_trait]
impl ComplaintService for InMemoryCustomerDirectory {
    async fn register(&self, dni: &Dni, description: &str) -> Result<ComplaintId, ServiceError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;

        if records.service_record(dni).is_none() {
            return Err(ServiceError::not_found(format!("customer {}", dni.as_str())));
        }

        let id = ComplaintId::new(records.last_complaint_id + 1);
        records.insert_complaint(Complaint {
            id,
            dni: dni.clone(),
            descripcion: description.to_string(),
            estado: ComplaintStatus::Pendiente,
            fecha: Utc::now(),
        });

        tracing::debug!(complaint_id = %id, "Complaint stored");
        Ok(id)
    }

    async fn get_by_id(&self, id: ComplaintId) -> Result<Option<ComplaintDetail>, ServiceError> {
        self.ensure_available()?;
        let records = self.records.read().await;

        let Some(complaint) = records.complaints.get(&id) else {
            return Ok(None);
        };
        let customer = records
            .service
            .get(&complaint.dni)
            .or_else(|| records.billing.get(&complaint.dni))
            .ok_or_else(|| {
                ServiceError::Internal(format!("complaint {} has no customer record", id))
            })?;

        Ok(Some(ComplaintDetail {
            complaint: complaint.clone(),
            customer: customer.clone(),
        }))
    }

    async fn list_recent(&self, dni: &Dni) -> Result<Vec<ComplaintSummary>, ServiceError> {
        self.ensure_available()?;
        let records = self.records.read().await;

        Ok(records
            .complaints
            .values()
            .rev()
            .filter(|c| &c.dni == dni)
            .take(RECENT_COMPLAINTS_LIMIT)
            .map(Complaint::summary)
            .collect())
    }
}

#[async_trait]
impl CustomerUpdateService for InMemoryCustomerDirectory {
    async fn current(&self, dni: &Dni) -> Result<Option<Customer>, ServiceError> {
        self.ensure_available()?;
        let records = self.records.read().await;

        Ok(records
            .service
            .get(dni)
            .or_else(|| records.billing.get(dni))
            .cloned())
    }

    async fn apply(
        &self,
        dni: &Dni,
        field: UpdatableField,
        value: &str,
    ) -> Result<Customer, ServiceError> {
        self.ensure_available()?;
        let mut records = self.records.write().await;

        let record = records
            .service_record(dni)
            .ok_or_else(|| ServiceError::not_found(format!("customer {}", dni.as_str())))?;
        let updated = record.clone().with_field(field, value);
        *record = updated.clone();

        tracing::debug!(field = %field, "Service record updated");
        Ok(updated)
    }
}

#[async_trait]
impl InvoiceService for InMemoryCustomerDirectory {
    async fn list_invoices(&self, dni: &Dni) -> Result<Vec<Invoice>, ServiceError> {
        self.ensure_available()?;
        let records = self.records.read().await;

        let mut invoices = records.invoices.get(dni).cloned().unwrap_or_default();
        // Newest issue date first; undated invoices last.
        invoices.sort_by(|a, b| b.fecha_emision.cmp(&a.fecha_emision));
        Ok(invoices)
    }
}
