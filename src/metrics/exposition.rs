//! Prometheus text exposition of UPS observations.

use crate::error::{NutError, Result};
use crate::metrics::data::{MetricDescriptor, Observation, LABEL_NAMES};
use crate::metrics::traits::ObservationSink;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

/// Sink that turns observations into Prometheus gauges.
///
/// A sink is meant to live for a single scrape: create it, run one
/// collection pass into it, then [`encode`](PrometheusSink::encode) it.
pub struct PrometheusSink {
    namespace: String,
    registry: Registry,
    gauges: HashMap<&'static str, GaugeVec>,
}

impl PrometheusSink {
    /// Create an empty sink whose metrics are prefixed with `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            registry: Registry::new(),
            gauges: HashMap::new(),
        }
    }

    /// Render everything observed so far in the text exposition format.
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| NutError::web_server_error(format!("metrics are not UTF-8: {e}")))
    }

    /// Content type of [`encode`](PrometheusSink::encode) output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl ObservationSink for PrometheusSink {
    fn describe(&mut self, descriptors: &[MetricDescriptor]) -> Result<()> {
        for desc in descriptors {
            if self.gauges.contains_key(desc.name) {
                continue;
            }
            let opts = Opts::new(desc.name, desc.help).namespace(self.namespace.clone());
            let gauge = GaugeVec::new(opts, &LABEL_NAMES)?;
            self.registry.register(Box::new(gauge.clone()))?;
            self.gauges.insert(desc.name, gauge);
        }
        Ok(())
    }

    fn observe(&mut self, observation: Observation) -> Result<()> {
        if !self.gauges.contains_key(observation.name()) {
            self.describe(std::slice::from_ref(observation.descriptor))?;
        }
        let gauge = self.gauges.get(observation.name()).ok_or_else(|| {
            NutError::protocol_error(format!("metric {} not registered", observation.name()))
        })?;
        gauge
            .get_metric_with_label_values(&observation.labels.values())?
            .set(observation.value);
        Ok(())
    }
}
