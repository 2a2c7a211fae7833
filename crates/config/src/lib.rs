use dotenv::{dotenv, from_path};
use std::env;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "students.db";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_LOG_FILTER: &str = "student_records=info,application=info,infrastructure=info,domain=info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load .env file from {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file path, or `:memory:`
    pub database_path: String,
    pub pool_size: u32,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the `.env`
    /// in the working directory, then read the environment.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing default `.env` is fine
            dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let pool_size = match get("DATABASE_POOL_SIZE") {
            Some(raw) => parse_pool_size(&raw)?,
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            database_path: get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            pool_size,
            log_filter: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    let size: u32 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
        key: "DATABASE_POOL_SIZE",
        reason: format!("{} ({})", e, raw),
    })?;
    if size == 0 {
        return Err(ConfigError::Invalid {
            key: "DATABASE_POOL_SIZE",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_PATH", "/var/lib/sms/students.db"),
            ("DATABASE_POOL_SIZE", "8"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, "/var/lib/sms/students.db");
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("DATABASE_PATH", "  ")])).unwrap();
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = Config::from_lookup(lookup(&[("DATABASE_POOL_SIZE", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DATABASE_POOL_SIZE", .. }));

        assert!(Config::from_lookup(lookup(&[("DATABASE_POOL_SIZE", "0")])).is_err());
    }

    #[test]
    fn test_missing_env_file_is_an_error() {
        let err = Config::from_env(Some("/definitely/not/here/.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }
}
