//! HTTP exposition of UPS metrics.
//!
//! Every request to the metrics path runs a full collection pass against the
//! configured NUT servers, so the data is as fresh as the scrape.

pub mod config;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use handlers::AppState;
pub use router::create_app;

use crate::config::ExporterConfig;
use crate::error::{NutError, Result};
use crate::metrics::NutCollector;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Start the web server and serve metrics for the NUT servers in `exporter`.
pub async fn start_web_server(config: WebConfig, exporter: ExporterConfig) -> Result<()> {
    let collector = Arc::new(NutCollector::new(&exporter)?);
    let state = AppState {
        collector,
        namespace: exporter.namespace.clone(),
        metrics_path: config.metrics_path.clone(),
    };
    let app = create_app(&config, state);

    // Parse the bind address
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| NutError::config_error(format!("Invalid bind address: {}", e)))?;

    info!("Starting NUT exporter on http://{}", addr);
    info!("Metrics endpoint: http://{}{}", addr, config.metrics_path);
    info!("Polling NUT servers: {}", exporter.hosts.join(", "));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NutError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| NutError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
