//! Customer domain module.
//!
//! The records the conversation reads and acts on: customers and their
//! updatable contact data, complaints, and invoices.

mod complaint;
mod record;
mod invoice;

pub use complaint::{
    Complaint, ComplaintDetail, ComplaintStatus, ComplaintSummary, SUMMARY_DESCRIPTION_CHARS,
};
pub use record::{Customer, CustomerSource, ResolvedIdentity, UpdatableField};
pub use invoice::{Invoice, InvoiceStatus};
