//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_API_URL` - Base URL of the catalog service (default: `http://localhost:3333`)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout for catalog lookups (default: 10)
//! - `CART_STORAGE_PATH` - File backing the cart storage slot (default: `.rocketshoes/storage.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the catalog/stock service
    pub catalog_url: Url,
    /// Timeout applied to each catalog request
    pub catalog_timeout: Duration,
    /// File backing the key-value storage slot
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog_url = get_or_default(&lookup, "CATALOG_API_URL", DEFAULT_CATALOG_URL);
        let catalog_url = Url::parse(&catalog_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(catalog_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_API_URL".to_string(),
                format!("unsupported scheme {}", catalog_url.scheme()),
            ));
        }

        let timeout_secs = get_or_default(&lookup, "CATALOG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CATALOG_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let storage_path =
            PathBuf::from(get_or_default(&lookup, "CART_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        Ok(Self {
            catalog_url,
            catalog_timeout: Duration::from_secs(timeout_secs),
            storage_path,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.catalog_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.catalog_timeout, Duration::from_secs(10));
        assert_eq!(config.storage_path, PathBuf::from(".rocketshoes/storage.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CATALOG_API_URL", "https://api.example.com/v1"),
            ("CATALOG_TIMEOUT_SECS", "3"),
            ("CART_STORAGE_PATH", "/tmp/cart.json"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_url.as_str(), "https://api.example.com/v1");
        assert_eq!(config.catalog_timeout, Duration::from_secs(3));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_url() {
        let result = CartConfig::from_lookup(lookup_from(&[("CATALOG_API_URL", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "CATALOG_API_URL"));
    }

    #[test]
    fn test_unsupported_scheme() {
        let result = CartConfig::from_lookup(lookup_from(&[("CATALOG_API_URL", "ftp://example.com")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = CartConfig::from_lookup(lookup_from(&[("CATALOG_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());

        let result = CartConfig::from_lookup(lookup_from(&[("CATALOG_TIMEOUT_SECS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = CartConfig::from_lookup(lookup_from(&[("SENTRY_DSN", "  ")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
