//! Command-line arguments
//!
//! Every option falls back to an environment variable, so CLI beats ENV,
//! which beats the TOML file.

use clap::Parser;
use minutes_common::config::ConfigOverrides;
use std::path::PathBuf;

/// Command-line arguments for minutes-api
#[derive(Parser, Debug)]
#[command(name = "minutes-api")]
#[command(about = "Meeting transcript action-item extraction service")]
#[command(version)]
pub struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "MINUTES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to bind to
    #[arg(long, env = "MINUTES_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Generative Language API base URL
    #[arg(long, env = "MINUTES_LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// Model used for action item extraction
    #[arg(long, env = "MINUTES_EXTRACTION_MODEL")]
    pub extraction_model: Option<String>,

    /// Model used for the health ping
    #[arg(long, env = "MINUTES_HEALTH_MODEL")]
    pub health_model: Option<String>,

    /// Log filter directive (RUST_LOG still wins)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Split out the values that override the TOML file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            api_key: self.api_key.clone(),
            base_url: self.llm_base_url.clone(),
            extraction_model: self.extraction_model.clone(),
            health_model: self.health_model.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 8] = [
        "MINUTES_CONFIG",
        "MINUTES_HOST",
        "PORT",
        "DATABASE_URL",
        "GEMINI_API_KEY",
        "MINUTES_LLM_BASE_URL",
        "MINUTES_EXTRACTION_MODEL",
        "MINUTES_HEALTH_MODEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_arguments_no_overrides() {
        clear_env();
        let args = Args::try_parse_from(["minutes-api"]).unwrap();
        let overrides = args.overrides();
        assert!(overrides.port.is_none());
        assert!(overrides.api_key.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    #[serial]
    fn test_environment_fallback() {
        clear_env();
        env::set_var("PORT", "5055");
        env::set_var("GEMINI_API_KEY", "env-key");

        let args = Args::try_parse_from(["minutes-api"]).unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.port, Some(5055));
        assert_eq!(overrides.api_key.as_deref(), Some("env-key"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cli_beats_environment() {
        clear_env();
        env::set_var("PORT", "5055");

        let args = Args::try_parse_from(["minutes-api", "--port", "6001", "--database-url", "sqlite::memory:"])
            .unwrap();
        assert_eq!(args.port, Some(6001));
        assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        clear_env();
        assert!(Args::try_parse_from(["minutes-api", "--port", "not-a-port"]).is_err());
    }
}
