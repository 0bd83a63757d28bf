use std::env;

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite:gymtrack.db?mode=rwc";
const DEFAULT_POOL_SIZE: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Ignored for `:memory:` databases, which always get one connection.
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 3000)?,
            pool_size: parse_var("DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unset or empty falls back to `default`; anything else must parse to a non-zero number.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .ok()
            .filter(|n: &T| *n != T::default())
            .ok_or(ConfigError::InvalidNumber { name, value }),
        _ => Ok(default),
    }
}
