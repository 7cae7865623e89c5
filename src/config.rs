//! Exporter configuration.

use crate::error::{NutError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which NUT servers to poll and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// NUT servers as `host` or `host:port`
    pub hosts: Vec<String>,
    /// Deadline for connecting and for each read or write, in milliseconds
    pub timeout_ms: u64,
    /// Prefix of every exported metric name
    pub namespace: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["localhost".to_string()],
            timeout_ms: crate::DEFAULT_TIMEOUT_MS,
            namespace: crate::DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl ExporterConfig {
    /// Set the NUT servers to poll.
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-operation deadline.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the metric namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Per-operation deadline as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the configuration can be used for polling.
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(NutError::config_error("at least one NUT host is required"));
        }
        if let Some(host) = self.hosts.iter().find(|h| h.trim().is_empty()) {
            return Err(NutError::config_error(format!("invalid NUT host {host:?}")));
        }
        if self.timeout_ms == 0 {
            return Err(NutError::config_error("timeout must be greater than zero"));
        }
        let valid_namespace = self
            .namespace
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
        if self.namespace.is_empty() || !valid_namespace {
            return Err(NutError::config_error(format!(
                "invalid metric namespace {:?}",
                self.namespace
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExporterConfig::default();
        assert_eq!(config.hosts, vec!["localhost"]);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.namespace, "nut");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExporterConfig::default()
            .with_hosts(["ups-a.lan", "ups-b.lan:3494"])
            .with_timeout_ms(250)
            .with_namespace("power");
        assert_eq!(config.hosts, vec!["ups-a.lan", "ups-b.lan:3494"]);
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.namespace, "power");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let no_hosts = ExporterConfig::default().with_hosts(Vec::<String>::new());
        assert!(matches!(no_hosts.validate(), Err(NutError::Config(_))));

        let blank_host = ExporterConfig::default().with_hosts([" "]);
        assert!(blank_host.validate().is_err());

        let zero_timeout = ExporterConfig::default().with_timeout_ms(0);
        assert!(zero_timeout.validate().is_err());

        assert!(ExporterConfig::default().with_namespace("").validate().is_err());
        assert!(ExporterConfig::default().with_namespace("1nut").validate().is_err());
        assert!(ExporterConfig::default().with_namespace("nut-ups").validate().is_err());
        assert!(ExporterConfig::default().with_namespace("nut_2").validate().is_ok());
    }
}
