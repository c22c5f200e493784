//! OpenAPI-aware edge proxy library.
//!
//! Requests under the API prefix are checked against the path templates and
//! operations of an OpenAPI document, then forwarded to a single upstream
//! with a rewritten URL and an allowlisted set of headers. All other paths
//! are served from a static web bundle with a fallback to its root document.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod openapi;
pub mod routing;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
