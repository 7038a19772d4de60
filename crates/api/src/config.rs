//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `API_URL`: storefront backend base URL, orders are posted to
///   `{API_URL}/orders` (default: `"http://localhost:5000/api"`)
/// - `STORAGE_DIR`: directory for persisted checkout state (default: unset,
///   state is kept in memory)
/// - `REQUEST_TIMEOUT_SECS`: backend request timeout (default: `10`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub api_url: String,
    pub storage_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            api_url: std::env::var("API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.api_url),
            storage_dir: std::env::var_os("STORAGE_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            api_url: "http://localhost:5000/api".to_string(),
            storage_dir: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}
