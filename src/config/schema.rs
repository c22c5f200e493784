//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API server the filtered subtree is forwarded to.
    pub upstream: UpstreamConfig,

    /// Filtered API subtree and its OpenAPI contract.
    pub api: ApiConfig,

    /// Static single-page-application bundle.
    pub static_files: StaticFilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the upstream (e.g., "http://127.0.0.1:2283/api").
    pub url: String,

    /// Value forced into the outbound `Host` header.
    pub host: String,

    /// Append the connecting peer address to `X-Forwarded-For`.
    pub append_forwarded_for: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: String::new(),
            append_forwarded_for: true,
        }
    }
}

/// Priority applied to the templates of the OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchOrder {
    /// Document declaration order; the first template declared wins.
    #[default]
    Declared,
    /// Fewest parameter placeholders first, ties by descending path.
    Specificity,
}

/// Filtered API subtree configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path prefix routed through the OpenAPI filter (e.g., "/api").
    pub prefix: String,

    /// Path to the OpenAPI document (YAML or JSON).
    pub spec_file: String,

    /// Matching priority of the path templates.
    pub match_order: MatchOrder,

    /// Populate the `Allow` header on 405 responses.
    pub allow_header: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            spec_file: String::new(),
            match_order: MatchOrder::Declared,
            allow_header: true,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the web bundle.
    pub root: String,

    /// Root document served for unmatched paths.
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            index: "index.html".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            url = "http://127.0.0.1:2283/api"
            host = "photos.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.api.match_order, MatchOrder::Declared);
        assert!(config.api.allow_header);
        assert!(config.upstream.append_forwarded_for);
        assert_eq!(config.static_files.index, "index.html");
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_enums_are_lowercase() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [api]
            match_order = "specificity"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.match_order, MatchOrder::Specificity);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
