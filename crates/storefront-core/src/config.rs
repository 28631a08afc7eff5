use std::path::PathBuf;

use crate::app_config::{Environment, StorefrontConfig};
use crate::pricing::CurrencyFormat;
use crate::ConfigError;

/// Load storefront configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_config() -> Result<StorefrontConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load storefront configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_config_from_env() -> Result<StorefrontConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function, so tests
/// can drive it from a plain `HashMap`.
fn build_config<F>(lookup: F) -> Result<StorefrontConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = StorefrontConfig::default();

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"));
    let log_level = or_default("STOREFRONT_LOG_LEVEL", &defaults.log_level);
    let catalog_path = lookup("STOREFRONT_CATALOG_PATH")
        .map_or(defaults.catalog_path, PathBuf::from);

    let currency_code = or_default("STOREFRONT_CURRENCY", defaults.currency.code);
    let currency = CurrencyFormat::from_code(&currency_code).ok_or_else(|| {
        invalid(
            "STOREFRONT_CURRENCY",
            format!("unsupported currency '{currency_code}'; expected INR or USD"),
        )
    })?;

    let cart_timeout_ms = or_default(
        "STOREFRONT_CART_TIMEOUT_MS",
        &defaults.cart_timeout_ms.to_string(),
    )
    .parse::<u64>()
    .map_err(|e| invalid("STOREFRONT_CART_TIMEOUT_MS", e.to_string()))?;
    if cart_timeout_ms == 0 {
        return Err(invalid(
            "STOREFRONT_CART_TIMEOUT_MS",
            "must be greater than zero".to_string(),
        ));
    }

    let cart_capacity = match lookup("STOREFRONT_CART_CAPACITY") {
        Ok(raw) => Some(
            raw.parse::<u32>()
                .map_err(|e| invalid("STOREFRONT_CART_CAPACITY", e.to_string()))?,
        ),
        Err(_) => None,
    };

    Ok(StorefrontConfig {
        env,
        currency,
        log_level,
        catalog_path,
        cart_timeout_ms,
        cart_capacity,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
