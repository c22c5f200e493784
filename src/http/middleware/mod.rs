//! Axum middleware applied by the HTTP server.

pub mod filter;
pub mod trace;

pub use filter::{filter_openapi_paths, FilterState};
pub use trace::trace_requests;
