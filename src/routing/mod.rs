//! Routing subsystem for the filtered API subtree.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path with prefix stripped, method)
//!     → router.rs (ordered route scan)
//!     → matcher.rs (structural template match)
//!     → authorizer.rs (declared method check)
//!     → Return: Allowed / NotFound / MethodNotAllowed
//!
//! Route Compilation (at startup):
//!     ApiContract (OpenAPI paths, document order)
//!     → Apply MatchOrder
//!     → Parse templates into segments
//!     → Freeze as immutable ApiRouter
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by priority)

pub mod authorizer;
pub mod matcher;
pub mod router;

pub use authorizer::OperationSet;
pub use matcher::{find_match, PathTemplate, Segment};
pub use router::{ApiRoute, ApiRouter, RouteDecision};
