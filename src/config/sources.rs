use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const CONFIG_ENV_VAR: &str = "VIEWRANK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/viewrank.toml";
const ENV_PREFIX: &str = "VIEWRANK";
const ENV_SEPARATOR: &str = "__";
const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Failure to materialize the service account key
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("Failed to read credentials file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load the service account key into config
/// The key itself is never stored in TOML files, only its file path is
pub fn load_secrets(config: &mut Config) -> Result<(), SecretsError> {
    if config.analytics.credentials_file.is_none() {
        if let Ok(path) = env::var(CREDENTIALS_ENV_VAR) {
            config.analytics.credentials_file = Some(PathBuf::from(path));
        }
    }

    let Some(path) = config.analytics.credentials_file.clone() else {
        return Ok(());
    };

    let raw = fs::read_to_string(&path).map_err(|source| SecretsError::Read {
        path: path.clone(),
        source,
    })?;
    let key = serde_json::from_str(&raw).map_err(|source| SecretsError::Parse {
        path: path.clone(),
        source,
    })?;

    config.analytics.credentials = Some(key);
    Ok(())
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Start with defaults (handled by struct Default implementations)
    // Add TOML file if it exists (optional)
    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // Add environment variable overrides
    // VIEWRANK__RANKING__EXPIRATION -> ranking.expiration
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
