//! Channel senders.
//!
//! - `ConsoleSender` - stdout, used by the console binary
//! - `RecordingSender` - keeps deliveries in memory for tests

mod console;
mod recording;

pub use console::ConsoleSender;
pub use recording::RecordingSender;
