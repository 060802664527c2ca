use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{CooldownPolicy, Credentials, ScrapeConfig, ScrapeWindow};
use crate::ConfigError;

/// Load scrape configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_scrape_config() -> Result<ScrapeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_scrape_config_from_env()
}

/// Load scrape configuration from environment variables already in the process.
///
/// Unlike [`load_scrape_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_scrape_config_from_env() -> Result<ScrapeConfig, ConfigError> {
    build_scrape_config(|key| std::env::var(key))
}

/// Build scrape configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the real environment so
/// tests can drive it with a plain `HashMap`.
fn build_scrape_config<F>(lookup: F) -> Result<ScrapeConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_secs = |var: &str, default: &str| -> Result<Duration, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let account = require("FB_ACCOUNT")?;
    let password = require("FB_PASSWORD")?;
    let driver_path = lookup("FB_DRIVER_PATH").ok().map(PathBuf::from);

    let max_attempts = parse_u32("FBSCRAPE_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FBSCRAPE_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let window = match lookup("FBSCRAPE_DAYS_LIMIT") {
        Ok(raw) => Some(ScrapeWindow::last_days(raw.parse::<u32>().map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: "FBSCRAPE_DAYS_LIMIT".to_string(),
                reason: e.to_string(),
            }
        })?)),
        Err(_) => None,
    };

    let cooldowns = CooldownPolicy {
        error_cooldown: parse_secs("FBSCRAPE_ERROR_COOLDOWN_SECS", "60")?,
        empty_cooldown: parse_secs("FBSCRAPE_EMPTY_COOLDOWN_SECS", "30")?,
        account_cooldown: parse_secs("FBSCRAPE_ACCOUNT_COOLDOWN_SECS", "120")?,
    };

    let output_dir = PathBuf::from(or_default("FBSCRAPE_OUTPUT_DIR", "facebook_data"));
    let accounts_path = lookup("FBSCRAPE_ACCOUNTS_PATH").ok().map(PathBuf::from);
    let log_level = or_default("FBSCRAPE_LOG_LEVEL", "info");

    Ok(ScrapeConfig {
        credentials: Credentials {
            account,
            password,
            driver_path,
        },
        max_attempts,
        window,
        cooldowns,
        output_dir,
        accounts_path,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
