//! Data structures for UPS metrics.

use serde::{Deserialize, Serialize};

/// Label names attached to every UPS metric, in exposition order.
pub const LABEL_NAMES: [&str; 4] = ["model", "mfr", "serial", "type"];

/// Identity of one exported metric, keyed by the NUT variable it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    /// NUT variable name (e.g. `battery.charge`)
    pub variable: &'static str,
    /// Metric name without namespace (e.g. `battery_charge_percent`)
    pub name: &'static str,
    /// Help text
    pub help: &'static str,
}

/// Device labels read from the `device.*` variables of a UPS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// `device.model`
    pub model: String,
    /// `device.mfr`
    pub mfr: String,
    /// `device.serial`
    pub serial: String,
    /// `device.type`
    #[serde(rename = "type")]
    pub device_type: String,
}

impl Labels {
    /// Label values in the same order as [`LABEL_NAMES`].
    pub fn values(&self) -> [&str; 4] {
        [
            self.model.as_str(),
            self.mfr.as_str(),
            self.serial.as_str(),
            self.device_type.as_str(),
        ]
    }
}

/// One gauge value for one registered variable of one UPS.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Which metric this value belongs to
    pub descriptor: &'static MetricDescriptor,
    /// Gauge value
    pub value: f64,
    /// Device labels
    pub labels: Labels,
}

impl Observation {
    /// Unqualified metric name.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}
