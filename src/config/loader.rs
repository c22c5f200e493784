//! Configuration loading from disk and the command line.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::cli::Cli;
use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the effective configuration: optional file first, then CLI flags.
pub fn load_from_cli(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };

    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    const FILE: &str = r#"
        [listener]
        bind_address = "127.0.0.1:9000"

        [upstream]
        url = "http://10.0.0.5:2283/api"
        host = "file.example.com"

        [api]
        spec_file = "spec.yaml"

        [static_files]
        root = "/srv/web"
    "#;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.upstream.host, "file.example.com");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILE.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "api-edge-proxy",
            "--config",
            &path,
            "--host",
            "cli.example.com",
            "--debug",
        ])
        .unwrap();

        let config = load_from_cli(&cli).unwrap();
        assert_eq!(config.upstream.host, "cli.example.com");
        assert_eq!(config.upstream.url, "http://10.0.0.5:2283/api");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_missing_required_flags_fail_validation() {
        let cli = Cli::try_parse_from(["api-edge-proxy", "--upstream", "http://api.local"]).unwrap();
        match load_from_cli(&cli) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.contains(&ValidationError::Missing("upstream.host")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/edge-proxy.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
