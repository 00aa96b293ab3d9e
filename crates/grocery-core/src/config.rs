use crate::app_config::{AppConfig, DeliveryConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap` without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = or_default("PRODUCT_RECEIVER_BASE_URL", DEFAULT_BASE_URL);
    if base_url.trim().is_empty() {
        return Err(invalid(
            "PRODUCT_RECEIVER_BASE_URL",
            "must not be empty".to_string(),
        ));
    }

    let max_retries = parse_u32("GROCERY_FEED_MAX_RETRIES", "3")?;

    let backoff_raw = or_default("GROCERY_FEED_BACKOFF_FACTOR", "2.0");
    let backoff_factor = backoff_raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid("GROCERY_FEED_BACKOFF_FACTOR", e.to_string()))?;
    if !backoff_factor.is_finite() || backoff_factor < 0.0 {
        return Err(invalid(
            "GROCERY_FEED_BACKOFF_FACTOR",
            format!("must be a finite, non-negative number (got {backoff_raw})"),
        ));
    }

    let max_concurrent_requests = parse_usize("GROCERY_FEED_MAX_CONCURRENT_REQUESTS", "20")?;
    if max_concurrent_requests == 0 {
        return Err(invalid(
            "GROCERY_FEED_MAX_CONCURRENT_REQUESTS",
            "must be at least 1".to_string(),
        ));
    }

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(invalid(var, "must be at least 1".to_string())),
            n => Ok(n),
        }
    };

    let request_timeout_secs = parse_positive_u64("GROCERY_FEED_REQUEST_TIMEOUT_SECS", "30")?;
    let health_timeout_secs = parse_u64("GROCERY_FEED_HEALTH_TIMEOUT_SECS", "60")?;
    let health_poll_interval_secs =
        parse_positive_u64("GROCERY_FEED_HEALTH_POLL_INTERVAL_SECS", "5")?;
    let user_agent = or_default("GROCERY_FEED_USER_AGENT", DEFAULT_USER_AGENT);

    let log_level = or_default("GROCERY_FEED_LOG_LEVEL", "info");
    let error_log_path = PathBuf::from(or_default(
        "GROCERY_FEED_ERROR_LOG",
        "grocery-feed-errors.log",
    ));
    let progress_every = parse_usize("GROCERY_FEED_PROGRESS_EVERY", "1000")?;

    Ok(AppConfig {
        delivery: DeliveryConfig {
            base_url,
            max_retries,
            backoff_factor,
            max_concurrent_requests,
            request_timeout_secs,
            health_timeout_secs,
            health_poll_interval_secs,
            user_agent,
        },
        log_level,
        error_log_path,
        progress_every,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
