//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: data)
//! - `CATALOG_API_URL` - Base URL of the catalog, login and sell API
//!   (default: <https://imagineschool.herokuapp.com>)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `SHIPPING_FLAT_FEE` - Shipping charged below the threshold (default: 20.00)
//! - `SHIPPING_FREE_THRESHOLD` - Subtotal from which shipping is free (default: 200.00)
//! - `INSTALLMENTS` - Number of interest-free installments shown (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::cart::ShippingPolicy;

const DEFAULT_CATALOG_API_URL: &str = "https://imagineschool.herokuapp.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for device-local state (the persisted cart)
    pub data_dir: PathBuf,
    /// Remote catalog and checkout API
    pub catalog: CatalogConfig,
    /// Shipping fee rule
    pub shipping: ShippingPolicy,
    /// Number of installments the price is split into for display
    pub installments: NonZeroU32,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; `/products`, `/login`, `/products/sell` and `/uploads`
    /// live under it.
    pub api_url: Url,
    /// How long catalog responses are cached
    pub cache_ttl: Duration,
}

impl CatalogConfig {
    /// Configuration pointing at `api_url` with the default cache lifetime.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            cache_ttl: Duration::from_secs(300),
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
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "data"));
        let catalog = CatalogConfig::from_env()?;
        let shipping = ShippingPolicy {
            flat_fee: parse_amount("SHIPPING_FLAT_FEE", "20.00")?,
            free_threshold: parse_amount("SHIPPING_FREE_THRESHOLD", "200.00")?,
        };
        let installments = parse_env("INSTALLMENTS", "10")?;

        Ok(Self {
            host,
            port,
            data_dir,
            catalog,
            shipping,
            installments,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_api_url(
            "CATALOG_API_URL",
            &get_env_or_default("CATALOG_API_URL", DEFAULT_CATALOG_API_URL),
        )?;
        let ttl_secs: u64 = parse_env("CATALOG_CACHE_TTL_SECS", "300")?;
        Ok(Self {
            api_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a non-negative monetary amount.
fn parse_amount(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    let amount: Decimal = parse_env(key, default)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

/// Parse an HTTP(S) base URL.
fn parse_api_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be an http(s) URL (got {value})"),
        ));
    }
    Ok(url)
}
