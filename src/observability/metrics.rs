//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_proxy_requests_total` (counter): proxied requests by outcome
//! - `edge_proxy_rejections_total` (counter): filter rejections by stage
//! - `edge_proxy_upstream_forbidden_total` (counter): 403s from upstream
//! - `edge_proxy_upstream_duration_seconds` (histogram): upstream latency
//!
//! # Design Decisions
//! - Recording is always cheap; without an installed exporter the `metrics`
//!   macros are no-ops
//! - The Prometheus exporter is opt-in; once enabled, failing to start it is
//!   fatal

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid metrics address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("installing Prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// Install the Prometheus exporter listening on `address`.
pub fn init_metrics(address: &str) -> Result<SocketAddr, MetricsError> {
    let addr: SocketAddr = address.parse().map_err(|source| MetricsError::Address {
        address: address.to_string(),
        source,
    })?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(addr)
}

/// Which filter stage turned a request away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionStage {
    Path,
    Method,
}

impl RejectionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionStage::Path => "path",
            RejectionStage::Method => "method",
        }
    }
}

pub fn record_rejection(stage: RejectionStage) {
    counter!("edge_proxy_rejections_total", "stage" => stage.as_str()).increment(1);
}

/// Record the result of a forwarded request.
pub fn record_upstream(status: Option<u16>, start: Instant) {
    let outcome = match status {
        Some(s) if s < 400 => "success",
        Some(s) if s < 500 => "client_error",
        Some(_) => "server_error",
        None => "transport_error",
    };
    counter!("edge_proxy_requests_total", "outcome" => outcome).increment(1);
    histogram!("edge_proxy_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_forbidden() {
    counter!("edge_proxy_upstream_forbidden_total").increment(1);
}
