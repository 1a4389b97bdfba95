//! Configuration management for viewrank
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use viewrank::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Ranking window: {}", config.ranking.period);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `VIEWRANK__<section>__<key>`
//!
//! Examples:
//! - `VIEWRANK__ANALYTICS__VIEW_ID=123456`
//! - `VIEWRANK__CACHE__NAMESPACE=views`
//! - `VIEWRANK__REFRESH__INTERVAL_SECS=3600`
//!
//! The service account key is read from the file named by
//! `analytics.credentials_file`, or by `GOOGLE_APPLICATION_CREDENTIALS` when
//! the config leaves it unset. The key itself never passes through layered
//! sources.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/viewrank.toml`.
//! This can be overridden using the `VIEWRANK_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{
    AnalyticsConfig, CacheConfig, Config, RankingConfig, RefreshConfig, SiteConfig,
};
pub use sources::SecretsError;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Failed to load secrets: {0}")]
    SecretsError(#[from] SecretsError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`VIEWRANK__*`)
    /// 2. TOML file (default: `config/viewrank.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - The configured credentials file cannot be read or parsed
    /// - Validation fails (zero periods, broken rewrite patterns, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = sources::load()?;
        sources::load_secrets(&mut config)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let mut config = sources::load_from_sources(path)?;
        sources::load_secrets(&mut config)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
