//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with both subtrees
//! - Wire up middleware (request ID, tracing, timeout)
//! - Mount the OpenAPI filter and reverse proxy under the API prefix
//! - Serve the static bundle for every other path
//! - Run with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::director::{UpstreamDirector, UpstreamTarget};
use crate::http::middleware::{filter_openapi_paths, trace_requests, FilterState};
use crate::http::proxy::{proxy_handler, ReverseProxy};
use crate::http::static_files::spa_service;
use crate::routing::ApiRouter;

/// HTTP server for the edge proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server from already-validated parts.
    pub fn new(config: ProxyConfig, api_router: ApiRouter, target: UpstreamTarget) -> Self {
        let filter = FilterState::new(Arc::new(api_router), config.api.allow_header);
        let proxy = ReverseProxy::new(UpstreamDirector::new(target), &config);

        let router = Self::build_router(&config, filter, proxy);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, filter: FilterState, proxy: ReverseProxy) -> Router {
        let api = Router::new()
            .fallback(proxy_handler)
            .layer(middleware::from_fn_with_state(filter, filter_openapi_paths))
            .with_state(proxy);

        Router::new()
            .nest_service(&config.api.prefix, api)
            .fallback_service(spa_service(&config.static_files))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(middleware::from_fn(trace_requests)),
            )
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.config.api.prefix,
            web_dir = %self.config.static_files.root,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
