use std::env::VarError;
use std::path::Path;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_DATA_PATH: &str = "./data/all_data.csv";

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

/// Load application configuration, taking the dataset path from `data_path`
/// when the caller already has one.
///
/// With an explicit path, production no longer requires `SALESDASH_DATA_PATH`.
/// Loads `.env` files like [`load_app_config`].
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_with_data_path(
    data_path: Option<&Path>,
) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(with_data_path(|key| std::env::var(key), data_path))
}

/// Wrap `lookup` so an explicit `data_path` answers for `SALESDASH_DATA_PATH`.
fn with_data_path<'a, F>(
    lookup: F,
    data_path: Option<&'a Path>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a
where
    F: Fn(&str) -> Result<String, VarError> + 'a,
{
    move |key| match data_path {
        Some(path) if key == "SALESDASH_DATA_PATH" => Ok(path.to_string_lossy().into_owned()),
        _ => lookup(key),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SALESDASH_ENV", "development"));

    // Production must point at its dataset explicitly.
    let data_path = if env == Environment::Production {
        PathBuf::from(require("SALESDASH_DATA_PATH")?)
    } else {
        PathBuf::from(or_default("SALESDASH_DATA_PATH", DEFAULT_DATA_PATH))
    };

    let bind_addr = parse("SALESDASH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SALESDASH_LOG_LEVEL", "info");
    let default_cities = split_list(&or_default("SALESDASH_DEFAULT_CITIES", "sao paulo"));
    let default_segments = split_list(&or_default(
        "SALESDASH_DEFAULT_SEGMENTS",
        "Mid Value Customers",
    ));

    let rate_limit_per_minute = parse_usize("SALESDASH_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SALESDASH_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let api_keys = split_list(&or_default("SALESDASH_API_KEYS", ""));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_path,
        default_cities,
        default_segments,
        rate_limit_per_minute,
        api_keys,
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

/// Split a comma-separated env value, trimming blanks away.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
