use crate::app_config::{AppConfig, Environment, StorageBackend};
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
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let storage = parse_storage(&or_default("SHOPCAT_STORAGE", "postgres"))
        .ok_or_else(|| invalid("SHOPCAT_STORAGE", "expected `postgres` or `memory`".into()))?;

    let database_url = match storage {
        StorageBackend::Postgres => Some(require("DATABASE_URL")?),
        StorageBackend::Memory => lookup("DATABASE_URL").ok(),
    };

    let env = parse_environment(&or_default("SHOPCAT_ENV", "development"));
    let bind_addr = parse_addr("SHOPCAT_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPCAT_LOG_LEVEL", "info");
    let image_base_url = or_default("SHOPCAT_IMAGE_BASE_URL", "/static")
        .trim_end_matches('/')
        .to_string();
    let api_keys = parse_api_keys(&or_default("SHOPCAT_API_KEYS", ""));

    let db_max_connections = parse_u32("SHOPCAT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SHOPCAT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SHOPCAT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(invalid(
            "SHOPCAT_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds max connections {db_max_connections}"),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        storage,
        bind_addr,
        log_level,
        image_base_url,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_storage(s: &str) -> Option<StorageBackend> {
    match s.trim().to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" => Some(StorageBackend::Postgres),
        "memory" => Some(StorageBackend::Memory),
        _ => None,
    }
}

/// Comma-separated, blanks dropped.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
