use crate::app_config::{AppConfig, Environment};
use crate::geo::DEFAULT_MOVEMENT_THRESHOLD_KM;
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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_positive_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let value = raw
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a non-negative number, got {raw}"),
            });
        }
        Ok(value)
    };

    let api_base_url = require("SHOPFINDER_API_BASE_URL")?;
    let env = parse_environment(&or_default("SHOPFINDER_ENV", "development"))?;
    let log_level = or_default("SHOPFINDER_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("SHOPFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPFINDER_USER_AGENT", "shopfinder/0.1 (shop-discovery)");
    let geolocation_timeout_ms = parse_u64("SHOPFINDER_GEOLOCATION_TIMEOUT_MS", "10000")?;
    let movement_threshold_km = parse_positive_f64(
        "SHOPFINDER_MOVEMENT_THRESHOLD_KM",
        DEFAULT_MOVEMENT_THRESHOLD_KM,
    )?;
    let geolocate_url = lookup("SHOPFINDER_GEOLOCATE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    Ok(AppConfig {
        api_base_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        geolocation_timeout_ms,
        movement_threshold_km,
        geolocate_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPFINDER_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
