//! Bootstrap configuration loading
//!
//! Settings are resolved once at startup with the following priority:
//! 1. Command-line argument / environment variable (collected by the binary
//!    into [`ConfigOverrides`])
//! 2. TOML config file
//! 3. Compiled default
//!
//! Nothing here can change while the service is running.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default language model used for action-item extraction
pub const DEFAULT_EXTRACTION_MODEL: &str = "gemini-2.5-flash-lite";

/// Default language model used for the health ping
pub const DEFAULT_HEALTH_MODEL: &str = "gemini-2.0-flash";

/// Default Generative Language API base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// TOML configuration file contents
///
/// Every field is optional; missing values fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Interface to bind the HTTP server to
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// SQLite connection URL
    #[serde(default)]
    pub database_url: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Language model backend configuration
    #[serde(default)]
    pub llm: LlmToml,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// `[llm]` table of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmToml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub extraction_model: Option<String>,
    pub health_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub extraction_model: Option<String>,
    pub health_model: Option<String>,
    pub log_level: Option<String>,
}

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: String,
    pub llm_timeout: Duration,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was built for
    pub fn for_current_platform() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_url: format!("sqlite://{}?mode=rwc", default_database_path().display()),
            log_level: "info".to_string(),
            llm_timeout: Duration::from_secs(30),
        }
    }
}

/// Resolved language model settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// API key; `None` leaves the service running with the model marked down
    pub api_key: Option<String>,
    pub base_url: String,
    pub extraction_model: String,
    pub health_model: String,
    pub timeout: Duration,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub log_level: String,
    pub llm: LlmSettings,
}

impl ServiceConfig {
    /// Merge overrides over the TOML file over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let llm = toml_config.llm;

        let api_key = overrides
            .api_key
            .filter(|k| is_valid_key(k))
            .or_else(|| llm.api_key.filter(|k| is_valid_key(k)));

        Self {
            host: overrides.host.or(toml_config.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml_config.port).unwrap_or(defaults.port),
            database_url: overrides
                .database_url
                .or(toml_config.database_url)
                .unwrap_or(defaults.database_url),
            log_level: overrides
                .log_level
                .or(toml_config.logging.level)
                .unwrap_or(defaults.log_level),
            llm: LlmSettings {
                api_key,
                base_url: overrides
                    .base_url
                    .or(llm.base_url)
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                extraction_model: overrides
                    .extraction_model
                    .or(llm.extraction_model)
                    .unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.to_string()),
                health_model: overrides
                    .health_model
                    .or(llm.health_model)
                    .unwrap_or_else(|| DEFAULT_HEALTH_MODEL.to_string()),
                timeout: llm
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.llm_timeout),
            },
        }
    }

    /// `host:port` string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Default TOML config path (`~/.config/minutes/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("minutes").join("config.toml"))
}

/// Load the TOML config file
///
/// `path` falls back to [`default_config_path`]. Returns `Ok(None)` when the
/// file does not exist; a file that exists but cannot be read or parsed is an
/// error.
pub fn load_toml_config(path: Option<&Path>) -> Result<Option<TomlConfig>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok(Some(config))
}

/// Get OS-dependent default database file path
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("minutes"))
        .unwrap_or_else(|| PathBuf::from("./minutes_data"))
        .join("minutes.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_nothing_uses_defaults() {
        let config = ServiceConfig::resolve(ConfigOverrides::default(), TomlConfig::default());

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert!(config.database_url.starts_with("sqlite://"));
        assert!(config.database_url.ends_with("minutes.db?mode=rwc"));
        assert_eq!(config.log_level, "info");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.extraction_model, DEFAULT_EXTRACTION_MODEL);
        assert_eq!(config.llm.health_model, DEFAULT_HEALTH_MODEL);
        assert_eq!(config.llm.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_beat_toml() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            port = 6000
            database_url = "sqlite://from-toml.db"

            [llm]
            api_key = "toml-key"
            extraction_model = "toml-model"
            "#,
        )
        .unwrap();

        let overrides = ConfigOverrides {
            port: Some(7000),
            api_key: Some("cli-key".to_string()),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(overrides, toml_config);

        assert_eq!(config.port, 7000);
        assert_eq!(config.database_url, "sqlite://from-toml.db");
        assert_eq!(config.llm.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.llm.extraction_model, "toml-model");
    }

    #[test]
    fn test_blank_api_key_falls_through() {
        let toml_config: TomlConfig = toml::from_str("[llm]\napi_key = \"toml-key\"\n").unwrap();
        let overrides = ConfigOverrides {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(overrides, toml_config);
        assert_eq!(config.llm.api_key.as_deref(), Some("toml-key"));
    }

    #[test]
    fn test_timeout_and_log_level_from_toml() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [llm]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        let config = ServiceConfig::resolve(ConfigOverrides::default(), toml_config);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bind_address() {
        let overrides = ConfigOverrides {
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(overrides, TomlConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key(" \t\n"));
    }
}
