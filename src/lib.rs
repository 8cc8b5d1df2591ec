//! DECSA Bot - Customer-service conversation engine
//!
//! A per-user dialogue state machine for an electricity distribution
//! company's chat channels. Customers file complaints, check complaint
//! status, update contact details and look up invoices; free text is routed
//! by a language-model intent classifier and complaint descriptions are
//! screened by a claim validator.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
