//! Runtime configuration read from the environment (and an optional `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use thiserror::Error;

use crate::catalog::default_db_path;
use crate::table::{DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS};

pub const ENV_API_URL: &str = "SERVICES_API_URL";
pub const ENV_DB_PATH: &str = "SERVICES_DB_PATH";
pub const ENV_LOG_DIR: &str = "SERVICES_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "SERVICES_LOG_LEVEL";
pub const ENV_PAGE_SIZE: &str = "SERVICES_PAGE_SIZE";
pub const ENV_HTTP_TIMEOUT: &str = "SERVICES_HTTP_TIMEOUT_SECS";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate home directory")]
    NoHomeDir,
    #[error("{name} must be one of 10, 25 or 50 (got `{value}`)")]
    InvalidPageSize { name: &'static str, value: String },
    #[error("{name} must be a positive number of seconds (got `{value}`)")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} must be one of error, warn, info, debug, trace (got `{value}`)")]
    InvalidLogLevel { name: &'static str, value: String },
}

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Http { base_url: String, timeout: Duration },
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend: Backend,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub rows_per_page: usize,
}

impl Config {
    /// Load `.env` when present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout = match read(ENV_HTTP_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: ENV_HTTP_TIMEOUT,
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let backend = match read(ENV_API_URL) {
            Some(base_url) => Backend::Http {
                base_url: base_url.trim().to_string(),
                timeout,
            },
            None => {
                let path = match read(ENV_DB_PATH) {
                    Some(path) => PathBuf::from(path),
                    None => default_db_path().map_err(|_| ConfigError::NoHomeDir)?,
                };
                Backend::Sqlite { path }
            }
        };

        let log_dir = match read(ENV_LOG_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_log_dir()?,
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(raw) => {
                let level = raw.trim().to_ascii_lowercase();
                if !matches!(level.as_str(), "error" | "warn" | "info" | "debug" | "trace") {
                    return Err(ConfigError::InvalidLogLevel {
                        name: ENV_LOG_LEVEL,
                        value: raw,
                    });
                }
                level
            }
            None => DEFAULT_LOG_LEVEL.to_string(),
        };

        let rows_per_page = match read(ENV_PAGE_SIZE) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if ROWS_PER_PAGE_OPTIONS.contains(&size) => size,
                _ => {
                    return Err(ConfigError::InvalidPageSize {
                        name: ENV_PAGE_SIZE,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_ROWS_PER_PAGE,
        };

        Ok(Self {
            backend,
            log_dir,
            log_level,
            rows_per_page,
        })
    }
}

fn default_log_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
    Ok(base_dirs
        .home_dir()
        .join(crate::catalog::DATA_DIR_NAME)
        .join(LOG_DIR_NAME))
}
