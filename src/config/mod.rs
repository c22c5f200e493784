//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli.rs (flags and env vars override single fields)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → passed by reference into every component constructor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{load_config, load_from_cli, ConfigError};
pub use schema::{
    ApiConfig, ListenerConfig, LogFormat, MatchOrder, ObservabilityConfig, ProxyConfig,
    StaticFilesConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
