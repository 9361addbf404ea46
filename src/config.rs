use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Verifier configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub api: ApiSettings,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Target RFQ service
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiSettings {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub api_key: String,
}

/// Harness-level execution settings.
///
/// Scenarios always run on a single worker with zero retries; only the
/// default per-scenario timeout is tunable.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSettings {
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
}

impl RunnerSettings {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Build settings directly, bypassing files and environment
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api: ApiSettings {
                base_url: base_url.into(),
                api_key: api_key.into(),
            },
            runner: RunnerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }

    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with RFQ__)
    /// 4. Plain `BASE_URL` and `API_KEY` variables
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development, not checked in
            .add_source(File::with_name("config/local").required(false))
            // e.g., RFQ__API__BASE_URL -> api.base_url
            .add_source(env_source())
            .build()?;

        Self::from_config(substitute_env_vars(settings)?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        Self::from_config(substitute_env_vars(settings)?)
    }

    /// Deserialize and validate an already-built configuration
    pub fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("RFQ")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the plain `BASE_URL` / `API_KEY` variables used by `.env` files
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(base_url) = env::var("BASE_URL") {
        builder = builder.set_override("api.base_url", base_url)?;
    }
    if let Ok(api_key) = env::var("API_KEY") {
        builder = builder.set_override("api.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(base_url: &str, api_key: &str) -> Config {
        Config::builder()
            .set_override("api.base_url", base_url)
            .and_then(|b| b.set_override("api.api_key", api_key))
            .and_then(|b| b.build())
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_config(config_with("https://rfq.test", "key")).unwrap();
        assert_eq!(settings.runner.default_timeout_secs, 30);
        assert_eq!(settings.runner.default_timeout(), Duration::from_secs(30));
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "compact");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = Settings::from_config(config_with("not a url", "key")).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let err = Settings::from_config(config_with("https://rfq.test", "")).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_missing_api_section() {
        let config = Config::builder().build().unwrap();
        let err = Settings::from_config(config).unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }
}
