//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GuardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `guard.default_max_bytes`.
pub const DEFAULT_MAX_BYTES_ENV: &str = "JSON_GUARD_DEFAULT_MAX_BYTES";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON_GUARD_DEFAULT_MAX_BYTES must be a positive integer, got {0:?}")]
    Env(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GuardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides and validate a TOML document.
pub fn parse_config(content: &str) -> Result<GuardConfig, ConfigError> {
    let mut config: GuardConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, std::env::var(DEFAULT_MAX_BYTES_ENV).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load from `path` when it exists, otherwise start from defaults.
pub fn load_or_default(path: &Path) -> Result<GuardConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    let mut config = GuardConfig::default();
    apply_env_overrides(&mut config, std::env::var(DEFAULT_MAX_BYTES_ENV).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut GuardConfig, default_max_bytes: Option<String>) -> Result<(), ConfigError> {
    if let Some(raw) = default_max_bytes {
        let value = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or(ConfigError::Env(raw))?;
        config.guard.default_max_bytes = value;
    }
    Ok(())
}
