//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `GREENROOT_API_BASE_URL` - Catalog API base URL (default: `https://openapi.programming-hero.com/api/`)
//! - `GREENROOT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `GREENROOT_CACHE_TTL_SECS` - Catalog cache TTL, 0 disables caching (default: 300)
//! - `GREENROOT_CURRENCY` - Display currency code (default: BDT)
//! - `GREENROOT_DETAIL_COPY` - Detail description policy, `demonstrative` or `product` (default: demonstrative)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate between 0.0 and 1.0 (default: 1.0)

use std::time::Duration;

use greenroot_core::CurrencyCode;
use thiserror::Error;
use url::Url;

use crate::render::DetailCopy;

const DEFAULT_API_BASE_URL: &str = "https://openapi.programming-hero.com/api/";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "10";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog API settings
    pub catalog: CatalogConfig,
    /// Presentation settings
    pub display: DisplayConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
}

/// Remote catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL the endpoint paths are resolved against (always ends in `/`)
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Cache time-to-live; zero disables caching
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Presentation configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayConfig {
    /// Currency whose symbol prefixes formatted prices
    pub currency: CurrencyCode,
    /// Which description the detail view shows
    pub detail_copy: DetailCopy,
}

impl StorefrontConfig {
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

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let catalog = CatalogConfig {
            base_url: parse_base_url(
                "GREENROOT_API_BASE_URL",
                &env.get_or_default("GREENROOT_API_BASE_URL", DEFAULT_API_BASE_URL),
            )?,
            timeout: Duration::from_secs(env.parse_or_default(
                "GREENROOT_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            cache_ttl: Duration::from_secs(
                env.parse_or_default("GREENROOT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            ),
        };

        let display = DisplayConfig {
            currency: env.parse_or_default("GREENROOT_CURRENCY", "BDT")?,
            detail_copy: env.parse_or_default("GREENROOT_DETAIL_COPY", "demonstrative")?,
        };

        let sentry_sample_rate: f32 = env.parse_or_default("SENTRY_SAMPLE_RATE", "1.0")?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(Self {
            catalog,
            display,
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            display: DisplayConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating empty values as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|s| !s.trim().is_empty())
    }

    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins append.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut value = value.trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }
    let url = Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be a hierarchical URL".to_string(),
        ));
    }
    Ok(url)
}
