//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the OpenAPI document and compile the API router
//! - Parse the upstream target
//! - Start the optional metrics exporter
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ListenerConfig, ProxyConfig};
use crate::http::director::{UpstreamError, UpstreamTarget};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{self, MetricsError};
use crate::openapi::{load_spec_file, SpecError};
use crate::routing::ApiRouter;

/// Anything that stops the proxy from starting or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("loading spec {path:?}: {source}")]
    Spec {
        path: String,
        #[source]
        source: SpecError,
    },

    #[error("metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("creating api reverse proxy: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("binding {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serve: {0}")]
    Serve(#[source] std::io::Error),
}

/// Assemble the HTTP server from a validated configuration.
pub fn build_server(config: ProxyConfig) -> Result<HttpServer, StartupError> {
    let contract =
        load_spec_file(Path::new(&config.api.spec_file)).map_err(|source| StartupError::Spec {
            path: config.api.spec_file.clone(),
            source,
        })?;

    let api_router = ApiRouter::compile(&contract, config.api.match_order);
    let target = UpstreamTarget::from_config(&config.upstream)?;

    tracing::info!(
        routes = api_router.routes().len(),
        upstream = %config.upstream.url,
        host = %config.upstream.host,
        "API filter ready"
    );

    Ok(HttpServer::new(config, api_router, target))
}

/// Bind the configured listen address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let bind_error = |source| StartupError::Bind {
        address: config.bind_address.clone(),
        source,
    };

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(address = %local_addr, "Listening for connections");
    Ok(listener)
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        metrics::init_metrics(&config.observability.metrics_address)?;
    }

    let listener_config = config.listener.clone();
    let server = build_server(config)?;
    let listener = bind_listener(&listener_config).await?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
