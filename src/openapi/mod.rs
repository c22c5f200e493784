//! OpenAPI specification subsystem.
//!
//! # Data Flow
//! ```text
//! spec file (YAML or JSON)
//!     → loader.rs (parse, walk `paths` in document order)
//!     → ApiContract (ordered templates + declared methods)
//!     → routing::ApiRouter::compile (startup only)
//! ```
//!
//! Only the shape of `paths` is consumed: which templates exist and which
//! operations each declares. Schemas, parameters and security are ignored.

pub mod error;
pub mod loader;

use axum::http::Method;

pub use error::SpecError;
pub use loader::{load_spec_file, parse_spec};

/// The parts of an OpenAPI document the edge filter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContract {
    /// Value of the `openapi` (or legacy `swagger`) version key.
    pub version: String,
    /// `info.title`, when present.
    pub title: Option<String>,
    /// Path templates in document order.
    pub paths: Vec<DeclaredPath>,
}

/// One entry of the `paths` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredPath {
    /// Raw template, e.g. `/assets/{id}`.
    pub template: String,
    /// Declared operations, in document order.
    pub methods: Vec<Method>,
}
