//! Orders service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACCOUNTS_BASE_URL` - Base URL of the remote account service
//!
//! ## Optional
//! - `ORDERS_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDERS_PORT` - Listen port (default: 8002)
//! - `ACCOUNTS_FIND_BY_REF_PATH` - Account lookup path template; `{id}` is
//!   replaced with the URL-encoded account reference
//!   (default: `/accounts/{id}`)
//! - `ACCOUNTS_SERVICE_NAME` - Logical name the account service registers
//!   under (default: accounts-service)
//! - `ACCOUNTS_SERVICE_INSTANCES` - Comma-separated instance base URLs for
//!   the static registry; when unset, lookups go straight to
//!   `ACCOUNTS_BASE_URL`

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Orders service application configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Remote account service configuration
    pub accounts: AccountServiceConfig,
}

/// Remote account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Base URL used when the registry has no instance to offer
    pub base_url: Url,
    /// Lookup path template; `{id}` is replaced with the account reference
    pub find_by_ref_path: String,
    /// Logical service name queried against the registry
    pub service_name: String,
    /// Static registry entries, first instance wins
    pub instances: Vec<Url>,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or fail to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ORDERS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ORDERS_PORT", "8002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDERS_PORT".to_string(), e.to_string()))?;

        let accounts = AccountServiceConfig::from_env()?;

        Ok(Self {
            host,
            port,
            accounts,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AccountServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_url("ACCOUNTS_BASE_URL", &get_required_env("ACCOUNTS_BASE_URL")?)?;
        let find_by_ref_path = get_env_or_default("ACCOUNTS_FIND_BY_REF_PATH", "/accounts/{id}");
        let service_name = get_env_or_default("ACCOUNTS_SERVICE_NAME", "accounts-service");
        let instances = match get_optional_env("ACCOUNTS_SERVICE_INSTANCES") {
            Some(raw) => parse_instance_list("ACCOUNTS_SERVICE_INSTANCES", &raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            base_url,
            find_by_ref_path,
            service_name,
            instances,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a comma-separated list of instance base URLs.
///
/// Blank entries are skipped so trailing commas don't fail the load.
fn parse_instance_list(key: &str, raw: &str) -> Result<Vec<Url>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_url(key, entry))
        .collect()
}
