//! Configuration loading and validation.
//!
//! TOML file merged with `MARQUEE_`-prefixed environment variables.

mod loader;
mod types;
mod validate;

use thiserror::Error;

pub use loader::{load_config, load_config_from_str};
pub use types::{AutocompleteConfig, BackendConfig, Config};
pub use validate::validate_config;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
