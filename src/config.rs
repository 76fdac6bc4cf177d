use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine configuration directory")]
    NoConfigDir,

    #[error("No sender address configured (set sender_email or SENDER_EMAIL)")]
    MissingSender,

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Mailer configuration, loaded from `config.toml` in the config directory
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the mail is sent from
    pub sender_email: String,
    /// Graph API base URL; overridable so tests can target a local server
    pub graph_base_url: String,
    /// Bounded per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sender_email: String::new(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Platform config directory for this tool
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("graphpost"))
    }

    /// Load configuration from `config.toml` under the given directory.
    ///
    /// A missing file falls back to defaults. The `SENDER_EMAIL`
    /// environment variable overrides the configured sender; a transaction
    /// cannot start without one.
    pub fn load(config_dir: &Path) -> ConfigResult<Self> {
        let path = config_dir.join("config.toml");
        let mut config = if path.exists() {
            toml::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            Config::default()
        };

        if let Ok(sender) = std::env::var("SENDER_EMAIL") {
            config.sender_email = sender;
        }

        if config.sender_email.is_empty() {
            return Err(ConfigError::MissingSender);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_public_graph_endpoint() {
        let config = Config::default();
        assert_eq!(config.graph_base_url, DEFAULT_GRAPH_BASE_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"sender_email = "me@example.com""#).unwrap();
        assert_eq!(config.sender_email, "me@example.com");
        assert_eq!(config.graph_base_url, DEFAULT_GRAPH_BASE_URL);
    }

    #[test]
    fn full_config_file_parses() {
        let config: Config = toml::from_str(
            r#"
            sender_email = "me@example.com"
            graph_base_url = "http://localhost:8080/v1.0"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.graph_base_url, "http://localhost:8080/v1.0");
        assert_eq!(config.request_timeout_secs, 5);
    }
}
