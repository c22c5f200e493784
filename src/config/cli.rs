//! Command line flags.
//!
//! Every flag is optional at parse time so that a config file can supply the
//! value instead; required settings are enforced by validation afterwards.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Parser)]
#[command(name = "api-edge-proxy")]
#[command(about = "OpenAPI-filtering edge proxy in front of an API server and a web bundle", long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, env = "API_EDGE_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to OpenAPI specification file
    #[arg(long, env = "API_EDGE_PROXY_OPENAPI_SPEC_FILE")]
    pub openapi_spec_file: Option<String>,

    /// Listen address for the HTTP server
    #[arg(long, env = "API_EDGE_PROXY_LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Upstream server URL
    #[arg(long, env = "API_EDGE_PROXY_UPSTREAM")]
    pub upstream: Option<String>,

    /// Host header value sent upstream
    #[arg(long, env = "API_EDGE_PROXY_HOST")]
    pub host: Option<String>,

    /// Directory holding the web bundle
    #[arg(long, env = "API_EDGE_PROXY_WEB_DIR")]
    pub web_dir: Option<String>,

    /// Enable debug logging
    #[arg(long, env = "API_EDGE_PROXY_DEBUG")]
    pub debug: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(path) = &self.openapi_spec_file {
            config.api.spec_file = path.clone();
        }
        if let Some(addr) = &self.listen_addr {
            config.listener.bind_address = normalize_listen_addr(addr);
        }
        if let Some(url) = &self.upstream {
            config.upstream.url = url.clone();
        }
        if let Some(host) = &self.host {
            config.upstream.host = host.clone();
        }
        if let Some(dir) = &self.web_dir {
            config.static_files.root = dir.clone();
        }
        if self.debug {
            config.observability.log_level = "debug".to_string();
        }
    }
}

/// Accept the short ":8080" form for all interfaces.
fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}
