use thiserror::Error;

/// Errors produced while loading the OpenAPI document.
#[derive(Debug, Error)]
pub enum SpecError {
    /// I/O error reading the spec file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML/JSON syntax error.
    #[error("parse error: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// Root is not a mapping carrying an `openapi` or `swagger` version.
    #[error("not an OpenAPI document: {0}")]
    NotOpenApi(String),

    /// The `paths` section or one of its items has the wrong shape.
    #[error("malformed paths: {0}")]
    MalformedPaths(String),
}
