use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let backend_url = require("MEDUSA_BACKEND_URL")?;
    let publishable_key = optional("MEDUSA_PUBLISHABLE_KEY");

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let default_currency = parse_currency_code(&or_default(
        "STOREFRONT_DEFAULT_CURRENCY",
        crate::DEFAULT_CURRENCY_CODE,
    ))?;
    let default_region_id = optional("STOREFRONT_DEFAULT_REGION_ID");
    let default_country =
        or_default("STOREFRONT_DEFAULT_COUNTRY", crate::DEFAULT_COUNTRY_CODE).to_lowercase();

    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "30")?;
    let price_timeout_ms = parse_u64("STOREFRONT_PRICE_TIMEOUT_MS", "3000")?;
    if price_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_PRICE_TIMEOUT_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1 (pricing)");
    let price_overrides_path = optional("STOREFRONT_PRICE_OVERRIDES_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        backend_url,
        publishable_key,
        default_currency,
        default_region_id,
        default_country,
        request_timeout_secs,
        price_timeout_ms,
        user_agent,
        price_overrides_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Accepts three ASCII letters in any case and returns them uppercased.
fn parse_currency_code(s: &str) -> Result<String, ConfigError> {
    let trimmed = s.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_DEFAULT_CURRENCY".to_string(),
            reason: format!("'{s}' is not a three-letter currency code"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
