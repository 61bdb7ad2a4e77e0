//! Prometheus metrics helpers for Bulletin.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bulletin_core::metrics::{start_metrics_server, try_init_metrics};
//!
//! if let Some(handle) = try_init_metrics() {
//!     start_metrics_server(9091, handle).await?;
//! }
//!
//! metrics::counter!("news_created_total").increment(1);
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: the area the metric belongs to (`news_`, `media_`, `preview_`)
//! - Suffix: unit or type (`_total`, `_bytes_total`)
//! - Labels: only low-cardinality values (a reason code, a backend name)

use std::net::SocketAddr;

use axum::{Router, routing::get};
use metrics::{describe_counter, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe every Bulletin metric.
///
/// Returns `None` if a recorder is already installed.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_metrics();
    Some(handle)
}

/// Serve `/metrics` on the given port from a background task.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

fn register_metrics() {
    // =========================================================================
    // Record creation
    // =========================================================================

    describe_counter!("news_created_total", "News records successfully created");
    describe_counter!(
        "news_create_rejected_total",
        "Create requests that did not produce a record (label: reason)"
    );

    // =========================================================================
    // Media ingestion
    // =========================================================================

    describe_counter!(
        "media_stored_total",
        "Media payloads written to a storage backend (label: backend)"
    );
    describe_counter!(
        "media_stored_bytes_total",
        Unit::Bytes,
        "Bytes written to media storage backends"
    );

    // =========================================================================
    // Preview rendering
    // =========================================================================

    describe_counter!("preview_rendered_total", "Link preview pages rendered");
    describe_counter!(
        "preview_not_found_total",
        "Preview requests for ids with no record"
    );
}
