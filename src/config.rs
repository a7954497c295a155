//! Settings file for the analysis driver.
//!
//! Every section is optional; an empty file (or no file at all) gives a
//! client for `http://localhost:8000` with pretty logging.

use crate::output::OutputFormat;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Analysis API connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }
}

/// Analysis API connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base address of the API, without a trailing path.
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,

    /// Time allowed to establish the connection.
    #[serde(
        default = "ApiConfig::default_connect_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub connect_timeout: Duration,

    /// Time allowed for a whole analysis request. `"none"` or `"0s"` waits
    /// indefinitely.
    #[serde(
        default = "ApiConfig::default_timeout",
        deserialize_with = "deserialize_timeout"
    )]
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            connect_timeout: Self::default_connect_timeout(),
            timeout: Self::default_timeout(),
        }
    }
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:8000".to_string()
    }

    fn default_connect_timeout() -> Duration {
        Duration::from_secs(5)
    }

    fn default_timeout() -> Option<Duration> {
        // a full 810-file MPI run takes minutes on a laptop
        Some(Duration::from_secs(600))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Log format: "pretty", "json", or "compact".
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }

    fn default_format() -> String {
        "pretty".to_string()
    }
}

/// Report settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Default report format when none is given on the command line.
    #[serde(default, deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(toml::de::Error),
}

/// Deserialize a duration from a human-readable string (e.g., "5s", "10m").
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Like [`deserialize_duration`], but `"none"`, `"off"` and zero disable the
/// timeout.
fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim() {
        "none" | "off" => Ok(None),
        s => {
            let duration = humantime::parse_duration(s).map_err(serde::de::Error::custom)?;
            Ok(Some(duration).filter(|d| !d.is_zero()))
        }
    }
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// Annotated default configuration, printed by `--print-config`.
pub const DEFAULT_CONFIG: &str = r#"# hybrid-bench configuration

[api]
# Base address of the analysis API
base_url = "http://localhost:8000"

# Time allowed to establish a connection
connect_timeout = "5s"

# Time allowed for one analysis request ("none" to wait indefinitely)
timeout = "10m"

[logging]
# Log level (RUST_LOG overrides this)
level = "info"

# Log format: pretty, compact, json
format = "pretty"

[output]
# Report format: table, json, html
format = "table"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.api.timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.api.timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_timeouts() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "http://analyzer:9000"
            connect_timeout = "250ms"
            timeout = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://analyzer:9000");
        assert_eq!(config.api.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.api.timeout, None);

        let config = Config::parse("[api]\ntimeout = \"0s\"\n").unwrap();
        assert_eq!(config.api.timeout, None);

        let config = Config::parse("[api]\ntimeout = \"90s\"\n").unwrap();
        assert_eq!(config.api.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::parse("[api]\ntimeout = \"soon\"\n").is_err());
        assert!(Config::parse("[output]\nformat = \"pdf\"\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/hybrid-bench.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
