use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;
use tracing::{error, info};

use super::{
    types::{MarketConfig, Settings},
    ConfigError,
};

/// Load settings from file with environment variable overrides
///
/// Nested keys use a double underscore, e.g. `TICKETMARKET_SIMULATION__TICK_MS=50`.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    settings_figment(Some(path))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load default settings with environment variable overrides only
pub fn load_settings_from_env() -> Result<Settings, ConfigError> {
    settings_figment(None)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load settings from TOML string (useful for testing)
pub fn load_settings_from_str(toml_str: &str) -> Result<Settings, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn settings_figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed("TICKETMARKET_").split("__"))
}

/// Write a market configuration as JSON
pub fn save_market_config(config: &MarketConfig, path: &Path) -> Result<(), ConfigError> {
    let json =
        serde_json::to_string(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;
    Ok(())
}

/// Read a market configuration from JSON
///
/// The values are not validated here; callers run [`super::validate_market_config`].
pub fn load_market_config(path: &Path) -> Result<MarketConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save a market configuration, logging instead of failing
///
/// Returns true when the file was written.
pub fn try_save_market_config(config: &MarketConfig, path: &Path) -> bool {
    match save_market_config(config, path) {
        Ok(()) => {
            info!("Configuration saved to {}", path.display());
            true
        }
        Err(e) => {
            error!("Error saving configuration to {}: {}", path.display(), e);
            false
        }
    }
}

/// Load a market configuration, logging instead of failing
pub fn try_load_market_config(path: &Path) -> Option<MarketConfig> {
    match load_market_config(path) {
        Ok(config) => {
            info!("Configuration loaded from {}", path.display());
            Some(config)
        }
        Err(e) => {
            error!("Error loading configuration from {}: {}", path.display(), e);
            None
        }
    }
}
