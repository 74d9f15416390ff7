use std::{env::var, str::FromStr};
use axum::http::HeaderValue;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    /// `None` allows any origin.
    pub cors_allow_origin: Option<HeaderValue>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub log_level: LevelFilter,
    pub expose_error_details: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            database_url: None,
            cors_allow_origin: None,
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: 5,
            idle_timeout: 300,
            log_level: LevelFilter::INFO,
            expose_error_details: false,
        }
    }
}

impl Config {
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to the defaults for
    /// unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Ok(Self {
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            database_url: lookup("DATABASE_URL"),
            cors_allow_origin: parse_origin(lookup("CORS_ALLOW_ORIGIN"))?,
            max_connections: parse_or("MAX_CONNECTIONS", lookup("MAX_CONNECTIONS"), defaults.max_connections)?,
            min_connections: parse_or("MIN_CONNECTIONS", lookup("MIN_CONNECTIONS"), defaults.min_connections)?,
            acquire_timeout: parse_or("ACQUIRE_TIMEOUT", lookup("ACQUIRE_TIMEOUT"), defaults.acquire_timeout)?,
            idle_timeout: parse_or("IDLE_TIMEOUT", lookup("IDLE_TIMEOUT"), defaults.idle_timeout)?,
            log_level: parse_or("LOG_LEVEL", lookup("LOG_LEVEL"), defaults.log_level)?,
            expose_error_details: parse_or("EXPOSE_ERROR_DETAILS", lookup("EXPOSE_ERROR_DETAILS"), defaults.expose_error_details)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn parse_origin(value: Option<String>) -> Result<Option<HeaderValue>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) if value.trim() == "*" => Ok(None),
        Some(value) => HeaderValue::from_str(value.trim())
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key: "CORS_ALLOW_ORIGIN", value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.database_url, None);
        assert_eq!(config.cors_allow_origin, None);
        assert_eq!(config.acquire_timeout, 5);
        assert_eq!(config.log_level, LevelFilter::INFO);
        assert!(!config.expose_error_details);
    }

    #[test]
    fn values_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/comments"),
            ("CORS_ALLOW_ORIGIN", "https://jackiechanfan.club"),
            ("LOG_LEVEL", "debug"),
            ("EXPOSE_ERROR_DETAILS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/comments"));
        assert_eq!(config.cors_allow_origin, Some(HeaderValue::from_static("https://jackiechanfan.club")));
        assert_eq!(config.log_level, LevelFilter::DEBUG);
        assert!(config.expose_error_details);
    }

    #[test]
    fn blank_database_url_selects_memory_store() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let config = Config::from_lookup(lookup_from(&[("CORS_ALLOW_ORIGIN", "*")])).unwrap();
        assert_eq!(config.cors_allow_origin, None);
    }

    #[test]
    fn invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("MAX_CONNECTIONS", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue { key: "MAX_CONNECTIONS", value: "lots".to_string() }
        );
    }
}
