//! Reporter configuration from environment variables
//!
//! Environment variables:
//! - `CMC_BASE_URL` (default: https://pro-api.coinmarketcap.com)
//! - `CMC_API_KEY` (required)
//! - `CMC_ACCEPT_HEADER` (default: application/json)
//! - `REPORT_DIR` (default: `report/` next to the executable)
//! - `REPORT_INTERVAL_SECS` (default: 86400)
//! - `CMC_REQUEST_TIMEOUT_SECS` (default: unset, no timeout)
//! - `RUST_LOG` (default: info)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
pub const DEFAULT_ACCEPT_HEADER: &str = "application/json";
pub const DEFAULT_INTERVAL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub base_url: String,
    pub api_key: String,
    pub accept_header: String,
    pub report_dir: PathBuf,
    pub interval: Duration,
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

/// Reporter setting that could not be read
#[derive(Debug)]
pub enum ConfigError {
    /// `CMC_API_KEY` unset or blank
    MissingApiKey,
    /// A setting is present but unusable
    InvalidSetting { var: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingApiKey => {
                write!(f, "CMC_API_KEY is not set: export it or add it to .env")
            }
            ConfigError::InvalidSetting { var, reason } => write!(f, "Invalid {}: {}", var, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ReporterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CMC_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidSetting {
                var: "CMC_BASE_URL",
                reason: format!("expected an http:// or https:// URL, got '{}'", base_url),
            });
        }

        let api_key = lookup("CMC_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let accept_header = lookup("CMC_ACCEPT_HEADER")
            .unwrap_or_else(|| DEFAULT_ACCEPT_HEADER.to_string());

        let report_dir = lookup("REPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_report_dir);

        let interval_secs = match lookup("REPORT_INTERVAL_SECS") {
            Some(raw) => parse_secs("REPORT_INTERVAL_SECS", &raw)?,
            None => DEFAULT_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                var: "REPORT_INTERVAL_SECS",
                reason: "the report interval must be greater than zero".to_string(),
            });
        }

        let request_timeout = match lookup("CMC_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_secs("CMC_REQUEST_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            base_url,
            api_key,
            accept_header,
            report_dir,
            interval: Duration::from_secs(interval_secs),
            request_timeout,
            rust_log,
        })
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSetting {
        var,
        reason: format!("expected a whole number of seconds, got '{}'", raw),
    })
}

/// `report/` inside the directory holding the running executable
pub fn default_report_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("report")))
        .unwrap_or_else(|| PathBuf::from("report"))
}
