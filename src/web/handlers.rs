//! HTTP handlers for the exporter endpoints.

use crate::metrics::{NutCollector, PrometheusSink};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Collector run on every scrape
    pub collector: Arc<NutCollector>,
    /// Metric name prefix
    pub namespace: String,
    /// Path the metrics are served on, linked from the index page
    pub metrics_path: String,
}

/// Poll all NUT servers and return the result in the Prometheus text format.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let mut sink = PrometheusSink::new(state.namespace.as_str());

    if let Err(e) = state.collector.collect(&mut sink).await {
        error!("Failed to collect UPS metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    match sink.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, sink.content_type())], body).into_response(),
        Err(e) => {
            error!("Failed to encode UPS metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "nut-exporter",
        "version": env!("CARGO_PKG_VERSION"),
        "hosts": state.collector.hosts(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Landing page pointing at the metrics endpoint.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><title>NUT Exporter</title></head>\n<body>\n\
         <h1>NUT Exporter</h1>\n<p><a href=\"{path}\">Metrics</a></p>\n</body>\n</html>\n",
        path = state.metrics_path
    ))
}
