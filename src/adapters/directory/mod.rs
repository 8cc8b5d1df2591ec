//! Customer directory adapters backing the identity, complaint, update and
//! invoice ports.

mod in_memory_directory;

pub use in_memory_directory::{DirectoryFixture, InMemoryCustomerDirectory, InvoiceFixture};
