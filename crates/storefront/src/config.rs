//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! ## Cart
//! - `ROCKETSHOES_API_URL` - Base URL of the stock API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_HTTP_TIMEOUT_SECS` - Request timeout for stock API calls (default: 10)
//! - `ROCKETSHOES_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `ROCKETSHOES_CURRENCY` - Display currency, `BRL`, `USD` or `EUR` (default: BRL)
//!
//! ## Catalog API server
//! - `ROCKETSHOES_API_HOST` - Bind address (default: 127.0.0.1)
//! - `ROCKETSHOES_API_PORT` - Listen port (default: 3333)
//! - `ROCKETSHOES_CATALOG_PATH` - JSON file with `products` and `stock` (default: `server.json`)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Stock API client configuration
    pub api: ApiConfig,
    /// Directory backing the persisted cart
    pub storage_dir: PathBuf,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Catalog API server configuration
    pub server: ServerConfig,
}

/// Stock API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative paths join beneath it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Catalog API server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog JSON file
    pub catalog_path: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = parse_base_url(&get("ROCKETSHOES_API_URL", DEFAULT_API_URL))
            .map_err(|e| invalid("ROCKETSHOES_API_URL", e))?;
        let timeout_secs = get(
            "ROCKETSHOES_HTTP_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| invalid("ROCKETSHOES_HTTP_TIMEOUT_SECS", e))?;
        let currency = get("ROCKETSHOES_CURRENCY", "BRL")
            .parse::<CurrencyCode>()
            .map_err(|e| invalid("ROCKETSHOES_CURRENCY", e))?;
        let host = get("ROCKETSHOES_API_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("ROCKETSHOES_API_HOST", e))?;
        let port = get("ROCKETSHOES_API_PORT", "3333")
            .parse::<u16>()
            .map_err(|e| invalid("ROCKETSHOES_API_PORT", e))?;

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            storage_dir: PathBuf::from(get("ROCKETSHOES_STORAGE_DIR", ".rocketshoes")),
            currency,
            server: ServerConfig {
                host,
                port,
                catalog_path: PathBuf::from(get("ROCKETSHOES_CATALOG_PATH", "server.json")),
            },
        })
    }
}

impl ApiConfig {
    /// Client configuration for an API at `base_url`, with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

impl ServerConfig {
    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, making sure its path ends in `/`.
///
/// `Url::join` replaces the last path segment unless it is followed by a slash,
/// so `http://host/api` would otherwise resolve `stock/1` to `http://host/stock/1`.
fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}
