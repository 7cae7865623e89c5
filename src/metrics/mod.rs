//! UPS metric identities, translation and collection.
//!
//! This module maps NUT variables onto gauge metrics, converts the variables
//! of each UPS into labeled observations, and drives collection passes across
//! NUT servers into an [`ObservationSink`].

pub mod collector;
pub mod data;
pub mod exposition;
pub mod registry;
pub mod traits;
pub mod translate;

// Re-export commonly used items
pub use collector::{CollectionSummary, NutCollector};
pub use data::{Labels, MetricDescriptor, Observation};
pub use exposition::PrometheusSink;
pub use traits::ObservationSink;
