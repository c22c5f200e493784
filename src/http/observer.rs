//! Read-only inspection of upstream responses.

use axum::http::StatusCode;

use crate::observability::metrics;

/// What the observer saw for one proxied response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Upstream refused the request with 403.
    Forbidden,
    /// Any other status; nothing is recorded.
    PassThrough,
}

/// Emits diagnostics for upstream responses without touching them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseObserver;

impl ResponseObserver {
    /// Inspect the upstream status for a request originally sent to `path`.
    pub fn observe(&self, status: StatusCode, path: &str, upstream_path: &str) -> Observation {
        if status == StatusCode::FORBIDDEN {
            tracing::error!(
                path = %path,
                upstream_path = %upstream_path,
                "attempt to access api forbidden"
            );
            metrics::record_upstream_forbidden();
            return Observation::Forbidden;
        }

        Observation::PassThrough
    }
}
