mod loader;
mod types;
mod validate;

pub use loader::{
    load_market_config, load_settings, load_settings_from_env, load_settings_from_str,
    save_market_config, try_load_market_config, try_save_market_config,
};
pub use types::*;
pub use validate::{validate_market_config, validate_settings};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Configuration I/O error: {0}")]
    Io(String),
}
