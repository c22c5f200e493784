//! OpenAPI request filter.
//!
//! Runs inside the API subtree, so the prefix is already stripped from the
//! request URI. Requests whose path is not declared by the specification get
//! a 404; declared paths with an undeclared method get a 405. Everything else
//! reaches the proxy unchanged.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::http::response;
use crate::observability::metrics::{self, RejectionStage};
use crate::routing::{ApiRouter, RouteDecision};

/// State shared by every invocation of the filter.
#[derive(Clone)]
pub struct FilterState {
    router: Arc<ApiRouter>,
    allow_header: bool,
}

impl FilterState {
    pub fn new(router: Arc<ApiRouter>, allow_header: bool) -> Self {
        Self {
            router,
            allow_header,
        }
    }
}

pub async fn filter_openapi_paths(
    State(state): State<FilterState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let original_path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match state.router.route(request.uri().path(), request.method()) {
        RouteDecision::NotFound => {
            tracing::info!(path = %original_path, "skipping path");
            metrics::record_rejection(RejectionStage::Path);
            response::not_found()
        }
        RouteDecision::MethodNotAllowed(route) => {
            tracing::info!(
                path = %original_path,
                op = %request.method(),
                template = %route.template,
                "skipping operation"
            );
            metrics::record_rejection(RejectionStage::Method);

            let allow = if state.allow_header {
                HeaderValue::from_str(&route.operations.allow_header_value()).ok()
            } else {
                None
            };
            response::method_not_allowed(allow)
        }
        RouteDecision::Allowed(route) => {
            tracing::debug!(path = %original_path, template = %route.template, "request allowed");
            next.run(request).await
        }
    }
}
