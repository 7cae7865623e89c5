//! Traits for consuming UPS metrics.

use crate::error::Result;
use crate::metrics::data::{MetricDescriptor, Observation};

/// Destination for the observations produced by a collection pass.
///
/// Implementations are told about every metric up front through
/// [`describe`](ObservationSink::describe), independent of what any UPS
/// reports, and then receive gauge values one at a time.
pub trait ObservationSink {
    /// Register the identity of every metric that may be observed.
    fn describe(&mut self, descriptors: &[MetricDescriptor]) -> Result<()>;

    /// Record one gauge value.
    fn observe(&mut self, observation: Observation) -> Result<()>;
}

/// Collects observations in memory.
impl ObservationSink for Vec<Observation> {
    fn describe(&mut self, _descriptors: &[MetricDescriptor]) -> Result<()> {
        Ok(())
    }

    fn observe(&mut self, observation: Observation) -> Result<()> {
        self.push(observation);
        Ok(())
    }
}
