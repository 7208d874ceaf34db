//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_DATA_DIR` - Directory holding persisted session state (default: .shopfront)
//! - `SHOPFRONT_CART_KEY` - Storage slot name for the cart (default: cart)
//! - `SHOPFRONT_FLAT_SHIPPING` - Flat shipping rate for non-empty carts (default: 5.99)
//! - `SHOPFRONT_CURRENCY` - ISO 4217 display currency (default: USD)
//! - `SHOPFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use shopfront_core::CurrencyCode;

use crate::storage::validate_key;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Root directory for the file-backed key/value store
    pub data_dir: PathBuf,
    /// Storage slot the cart is persisted under
    pub cart_key: String,
    /// Shipping charged when the cart has at least one line
    pub flat_shipping: Decimal,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".shopfront"),
            cart_key: crate::cart::DEFAULT_CART_KEY.to_string(),
            flat_shipping: Decimal::new(599, 2),
            currency: CurrencyCode::USD,
            log_format: LogFormat::Pretty,
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("SHOPFRONT_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let cart_key = lookup("SHOPFRONT_CART_KEY").unwrap_or(defaults.cart_key);
        validate_key(&cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_CART_KEY".to_string(), e.to_string()))?;

        let flat_shipping = match lookup("SHOPFRONT_FLAT_SHIPPING") {
            Some(raw) => parse_amount("SHOPFRONT_FLAT_SHIPPING", &raw)?,
            None => defaults.flat_shipping,
        };

        let currency = match lookup("SHOPFRONT_CURRENCY") {
            Some(raw) => parse_currency("SHOPFRONT_CURRENCY", &raw)?,
            None => defaults.currency,
        };

        let log_format = match lookup("SHOPFRONT_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_LOG_FORMAT".to_string(), e))?,
            None => defaults.log_format,
        };

        Ok(Self {
            data_dir,
            cart_key,
            flat_shipping,
            currency,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a non-negative decimal amount.
fn parse_amount(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse an ISO 4217 currency code.
fn parse_currency(key: &str, raw: &str) -> Result<CurrencyCode, ConfigError> {
    let code = raw.trim();
    CurrencyCode::from_code(code).ok_or_else(|| {
        ConfigError::InvalidEnvVar(key.to_string(), format!("unsupported currency '{code}'"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".shopfront"));
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.flat_shipping, Decimal::new(599, 2));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOPFRONT_DATA_DIR", "/var/lib/shopfront"),
            ("SHOPFRONT_CART_KEY", "cart-guest"),
            ("SHOPFRONT_FLAT_SHIPPING", "0"),
            ("SHOPFRONT_CURRENCY", "eur"),
            ("SHOPFRONT_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/shopfront"));
        assert_eq!(config.cart_key, "cart-guest");
        assert_eq!(config.flat_shipping, Decimal::ZERO);
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_negative_shipping() {
        let err = load(&[("SHOPFRONT_FLAT_SHIPPING", "-1.00")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SHOPFRONT_FLAT_SHIPPING"));
    }

    #[test]
    fn test_rejects_unparseable_shipping() {
        assert!(load(&[("SHOPFRONT_FLAT_SHIPPING", "free")]).is_err());
    }

    #[test]
    fn test_rejects_path_like_cart_key() {
        assert!(load(&[("SHOPFRONT_CART_KEY", "../cart")]).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        assert!(load(&[("SHOPFRONT_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_rejects_unknown_currency() {
        assert!(load(&[("SHOPFRONT_CURRENCY", "JPY")]).is_err());
    }
}
