//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `JAANGKHON_API_URL` - Marketplace API root (default: `http://localhost:5000/api`)
//! - `JAANGKHON_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `JAANGKHON_SESSION_FILE` - Where the file session store keeps the token and user
//!   (default: `$HOME/.jaangkhon/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default API root used when `JAANGKHON_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const DEFAULT_TIMEOUT_SECS: &str = "30";
const SESSION_DIR: &str = ".jaangkhon";
const SESSION_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Root of the marketplace REST API, without a trailing slash
    pub api_url: String,
    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,
    /// Location of the persisted session file
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            session_file: default_session_file(),
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("JAANGKHON_API_URL", DEFAULT_API_URL))?;
        let timeout_secs = get_env_or_default("JAANGKHON_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("JAANGKHON_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let session_file =
            get_optional_env("JAANGKHON_SESSION_FILE").map_or_else(default_session_file, PathBuf::from);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            session_file,
            sentry_dsn,
        })
    }

    /// Same defaults, pointed at a different API root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not an absolute http(s) URL.
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            ..Self::default()
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate the API root and strip any trailing slash so endpoints can be
/// appended directly.
fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("JAANGKHON_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn default_session_file() -> PathBuf {
    get_optional_env("HOME").map_or_else(
        || PathBuf::from(SESSION_DIR).join(SESSION_FILE),
        |home| PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE),
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_strips_trailing_slash() {
        assert_eq!(
            parse_api_url("http://localhost:5000/api/").unwrap(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            parse_api_url(" https://shop.example.com/api ").unwrap(),
            "https://shop.example.com/api"
        );
    }

    #[test]
    fn test_parse_api_url_root_has_no_trailing_slash() {
        assert_eq!(
            parse_api_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_parse_api_url_rejects_bad_values() {
        assert!(matches!(
            parse_api_url("not a url"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_api_url("ftp://files.example.com").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.session_file.ends_with(".jaangkhon/session.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_with_api_url_keeps_other_defaults() {
        let config = StorefrontConfig::with_api_url("http://10.0.0.5:5000/api/").unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:5000/api");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
