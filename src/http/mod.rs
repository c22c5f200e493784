//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → prefix subtree:
//!         middleware/filter.rs (OpenAPI path + method check, 404/405)
//!         → proxy.rs (transport)
//!             → director.rs (rewrite URI, allowlist headers, force Host)
//!             → upstream
//!             → observer.rs (inspect status)
//!             → response.rs (hop-by-hop stripping, error responses)
//!     → everything else:
//!         static_files.rs (files, fallback to the root document)
//! ```

pub mod director;
pub mod middleware;
pub mod observer;
pub mod proxy;
pub mod response;
pub mod server;
pub mod static_files;

pub use director::{UpstreamDirector, UpstreamError, UpstreamTarget};
pub use observer::{Observation, ResponseObserver};
pub use proxy::ReverseProxy;
pub use server::HttpServer;
