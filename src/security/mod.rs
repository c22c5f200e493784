//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound (proxied) request:
//!     → headers.rs (replace headers with the allowlisted subset)
//!
//! Upstream response:
//!     → headers.rs (strip hop-by-hop headers)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a header is forwarded only if explicitly allowed
//! - No trust in client input

pub mod headers;

pub use headers::{allowlisted_headers, strip_hop_by_hop, ALLOWED_HEADERS};
