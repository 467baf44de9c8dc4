//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENBASKET_API_BASE` - Base URL of the GreenBasket backend
//! - `GREENBASKET_UPI_PAYEE_VPA` - UPI virtual payment address of the merchant
//!
//! ## Optional
//! - `GREENBASKET_UPI_PAYEE_NAME` - Merchant display name in the payment app
//!   (default: GreenBasket)

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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the GreenBasket backend API
    pub api_base: Url,
    /// UPI payment intent configuration
    pub upi: UpiConfig,
}

/// UPI payment intent configuration.
///
/// Identifies the merchant in the `upi://pay` deep link handed to the
/// platform when the customer selects UPI.
#[derive(Debug, Clone)]
pub struct UpiConfig {
    /// Merchant display name shown by the payment app
    pub payee_name: String,
    /// Merchant virtual payment address (e.g., merchant@oksbi)
    pub payee_vpa: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = get_required_env("GREENBASKET_API_BASE")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GREENBASKET_API_BASE".to_string(), e.to_string())
            })?;

        let upi = UpiConfig {
            payee_name: get_env_or_default("GREENBASKET_UPI_PAYEE_NAME", "GreenBasket"),
            payee_vpa: get_required_env("GREENBASKET_UPI_PAYEE_VPA")?,
        };

        Ok(Self { api_base, upi })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_env() {
        let result = get_required_env("GREENBASKET_TEST_DOES_NOT_EXIST");
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_env_default_applies() {
        let value = get_env_or_default("GREENBASKET_TEST_DOES_NOT_EXIST", "fallback");
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = StorefrontConfig {
            api_base: "http://localhost:3000".parse().unwrap(),
            upi: UpiConfig {
                payee_name: "GreenBasket".to_string(),
                payee_vpa: "greenbasket@oksbi".to_string(),
            },
        };
        let clone = config.clone();
        assert_eq!(clone.api_base.as_str(), "http://localhost:3000/");
        assert_eq!(clone.upi.payee_vpa, "greenbasket@oksbi");
    }
}
