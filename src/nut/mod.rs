//! Network UPS Tools protocol support.
//!
//! This module implements the small part of the upsd line protocol that the
//! exporter relies on: listing the UPSs a server knows about and listing the
//! variables of one UPS.

pub mod client;
pub mod quote;

// Re-export commonly used items
pub use client::{normalize_address, NutClient, VariableSet};
pub use quote::{quote, unquote};
