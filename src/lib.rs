//! # NUT Exporter - UPS Telemetry for Prometheus
//!
//! Polls one or more Network UPS Tools (`upsd`) servers over their line
//! protocol and exposes the variables of every UPS as labeled Prometheus
//! gauges.
//!
//! ## Features
//!
//! - **Protocol client**: `LIST UPS` and `LIST VAR` with strict framing checks
//! - **Stable metric set**: every known variable is exported for every UPS,
//!   as `0` when the UPS does not report it
//! - **Partial failure isolation**: an unreachable host or broken UPS never
//!   stops the rest of a collection pass
//! - **Library + Binary**: Use as a crate or standalone exporter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nut_exporter::{ExporterConfig, NutCollector, PrometheusSink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExporterConfig::default().with_hosts(["ups.lan"]);
//!     let collector = NutCollector::new(&config)?;
//!
//!     let mut sink = PrometheusSink::new(&config.namespace);
//!     collector.collect(&mut sink).await?;
//!     println!("{}", sink.encode()?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod nut;
pub mod web;

// Re-export public API
pub use config::ExporterConfig;
pub use error::{NutError, Result};
pub use metrics::{
    CollectionSummary, Labels, MetricDescriptor, NutCollector, Observation, ObservationSink,
    PrometheusSink,
};
pub use nut::{NutClient, VariableSet};

pub use web::{start_web_server, WebConfig};

/// The port upsd listens on unless told otherwise
pub const DEFAULT_NUT_PORT: u16 = 3493;

/// The default deadline for NUT connections and reads, in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// The default prefix of exported metric names
pub const DEFAULT_NAMESPACE: &str = "nut";

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 9199;
