//! Configuration management for the Foodzippy admin console

use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Base name of the optional configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "foodzippy-admin";

/// Prefix of environment overrides, e.g. `FOODZIPPY_API__BASE_URL`
pub const ENV_PREFIX: &str = "FOODZIPPY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Network retry configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Badge polling configuration
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the admin backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Explicit session file; the platform config directory is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Retry policy for calls that may hit a cold backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Unread badge polling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollingConfig {
    /// Seconds between two refreshes of the unread counters
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    /// Page size used when listing notifications
    #[serde(default = "default_notification_page_size")]
    pub notification_page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout_seconds() -> u64 {
    30
}

const fn default_connect_timeout_seconds() -> u64 {
    10
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_delay_ms() -> u64 {
    6000
}

const fn default_interval_seconds() -> u64 {
    30
}

const fn default_notification_page_size() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            notification_page_size: default_notification_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ApiConfig {
    /// Total request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Connection timeout
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl RetryConfig {
    /// Delay between attempts
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl PollingConfig {
    /// Interval between badge refreshes
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl SessionConfig {
    /// Session file location, falling back to the platform config directory
    #[must_use]
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }

        directories::ProjectDirs::from("com", "foodzippy", "foodzippy-admin").map_or_else(
            || PathBuf::from(".foodzippy-session.json"),
            |dirs| dirs.config_dir().join("session.json"),
        )
    }
}

impl Config {
    /// Load configuration from the optional `foodzippy-admin.*` file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file when given
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any source cannot be parsed.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = path.map_or_else(
            || config::File::with_name(CONFIG_FILE_NAME).required(false),
            |path| config::File::from(path).required(true),
        );

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay(), Duration::from_millis(6000));
        assert_eq!(config.polling.interval(), Duration::from_secs(30));
        assert_eq!(config.polling.notification_page_size, 20);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://admin.foodzippy.example/"

            [retry]
            delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.api.normalized_base_url(), "https://admin.foodzippy.example");
        assert_eq!(config.api.connect_timeout_seconds, 10);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 10);
        assert_eq!(config.polling, PollingConfig::default());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let mut config = Config::default();
        config.session.path = Some(PathBuf::from("/tmp/session.json"));

        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("base_url = \"http://localhost:5000\""));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://backend:5000\"\n\n[polling]\ninterval_seconds = 5"
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.api.base_url, "http://backend:5000");
        assert_eq!(config.polling.interval_seconds, 5);
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(Some(&dir.path().join("absent.toml")));

        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_session_path_resolution() {
        let explicit = SessionConfig {
            path: Some(PathBuf::from("/var/lib/foodzippy/session.json")),
        };
        assert_eq!(
            explicit.resolved_path(),
            PathBuf::from("/var/lib/foodzippy/session.json")
        );

        let derived = SessionConfig::default().resolved_path();
        assert!(derived.ends_with("session.json"));
    }
}
