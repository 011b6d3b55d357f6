use std::time::Duration;

use crate::error::{ForecastError, Result};

/// CWA open-data endpoint for the 36-hour county/city forecast.
pub const API_URL: &str = "https://opendata.cwa.gov.tw/api/v1/rest/datastore/F-C0032-001";

/// Environment variable holding the CWA authorization key.
pub const API_KEY_VAR: &str = "CWA_KEY";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const CACHE_TTL: Duration = Duration::from_secs(900);

/// Runtime configuration. The only user-facing knob is the API key.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            cache_ttl: CACHE_TTL,
        }
    }

    /// Read the API key from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], with the variable lookup injected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ForecastError::Config(format!(
                    "{API_KEY_VAR} is not set.\n\
                     Hint: export {API_KEY_VAR}=<your CWA open-data authorization key> and run again."
                ))
            })?;

        Ok(Self::new(key))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}
