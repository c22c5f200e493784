//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required fields that have no sensible default
//! - Validate addresses, the upstream URL and the API prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.upstream.url.is_empty() {
        errors.push(ValidationError::Missing("upstream.url"));
    } else if let Err(reason) = check_upstream_url(&config.upstream.url) {
        errors.push(ValidationError::invalid("upstream.url", reason));
    }

    if config.upstream.host.is_empty() {
        errors.push(ValidationError::Missing("upstream.host"));
    } else if HeaderValue::from_str(&config.upstream.host).is_err() {
        errors.push(ValidationError::invalid(
            "upstream.host",
            "not a valid header value",
        ));
    }

    if let Err(reason) = check_prefix(&config.api.prefix) {
        errors.push(ValidationError::invalid("api.prefix", reason));
    }

    if config.api.spec_file.is_empty() {
        errors.push(ValidationError::Missing("api.spec_file"));
    }

    if config.static_files.root.is_empty() {
        errors.push(ValidationError::Missing("static_files.root"));
    }
    if config.static_files.index.is_empty() {
        errors.push(ValidationError::Missing("static_files.index"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::invalid(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::invalid(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The prefix is mounted as a literal route, so it may not carry route syntax.
fn check_prefix(prefix: &str) -> Result<(), String> {
    let Some(rest) = prefix.strip_prefix('/') else {
        return Err(format!("'{}' must start with '/'", prefix));
    };
    if rest.is_empty() || rest.split('/').any(str::is_empty) {
        return Err(format!(
            "'{}' must have non-empty segments and not end with '/'",
            prefix
        ));
    }
    if let Some(c) = rest.chars().find(|c| matches!(c, '{' | '}' | '*' | '?' | '#')) {
        return Err(format!("'{}' must not contain '{}'", prefix, c));
    }
    Ok(())
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}': {}", raw, e))?;
    if url.scheme() != "http" {
        return Err(format!("scheme '{}' is not supported, use http", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(format!("'{}' has no host", raw));
    }
    if url.fragment().is_some() {
        return Err(format!("'{}' must not carry a fragment", raw));
    }
    Ok(())
}
