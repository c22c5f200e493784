//! Per-request debug record for both subtrees.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

pub async fn trace_requests(request: Request<Body>, next: Next) -> Response {
    tracing::debug!(
        path = %request.uri().path(),
        query = request.uri().query().unwrap_or(""),
        "Received request"
    );
    next.run(request).await
}
