use std::env;

use crate::error::ConfigError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BASE_CURRENCY: &str = "USD";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub base_currency: String,
    pub allowed_origin: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("OPENSPLIT_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
                name: "OPENSPLIT_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let base_currency = lookup("OPENSPLIT_BASE_CURRENCY")
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string())
            .trim()
            .to_uppercase();
        if base_currency.is_empty() {
            return Err(ConfigError::Empty {
                name: "OPENSPLIT_BASE_CURRENCY",
            });
        }

        Ok(Config {
            host: lookup("OPENSPLIT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            base_currency,
            allowed_origin: lookup("OPENSPLIT_ALLOWED_ORIGIN").filter(|o| !o.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}
