use crate::origin::AllowedOrigins;
use secrecy::SecretString;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RETELL_API_BASE: &str = "https://api.retellai.com";
pub const DEFAULT_ALLOWED_DOMAINS: &str = "localhost:3000";
pub const DEFAULT_VENDOR_TIMEOUT_SECS: u64 = 30;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub retell_api_key: SecretString,
    pub retell_api_base: String,
    pub allowed_origins: AllowedOrigins,
    pub vendor_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?,
            Err(_) => DEFAULT_PORT,
        };
        let bind_address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let retell_api_key = std::env::var("RETELL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingVar("RETELL_API_KEY".to_string()))?;

        let retell_api_base = std::env::var("RETELL_API_BASE")
            .unwrap_or_else(|_| DEFAULT_RETELL_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let domains =
            std::env::var("ALLOWED_DOMAINS").unwrap_or_else(|_| DEFAULT_ALLOWED_DOMAINS.to_string());
        let mut allowed_origins = AllowedOrigins::parse(&domains);
        if let Ok(frontend_url) = std::env::var("FRONTEND_URL") {
            allowed_origins.push_url(&frontend_url);
        }

        let vendor_timeout = match std::env::var("VENDOR_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "VENDOR_TIMEOUT_SECS".to_string(),
                        format!("'{}' is not a positive number of seconds", raw),
                    )
                })?,
            Err(_) => Duration::from_secs(DEFAULT_VENDOR_TIMEOUT_SECS),
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            retell_api_key,
            retell_api_base,
            allowed_origins,
            vendor_timeout,
            log_level,
        })
    }
}
