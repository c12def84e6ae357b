//! Environment-driven configuration.

use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

use todo_core::PoolOptions;

use crate::auth::Credentials;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("BASIC_AUTH_USERNAME and BASIC_AUTH_PASSWORD must be set together")]
    PartialCredentials,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// When set, every route requires these basic-auth credentials.
    pub credentials: Option<Credentials>,
    /// Bounds each request and each wait for a database connection.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. `from_env` uses the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUEST_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let credentials = match (lookup("BASIC_AUTH_USERNAME"), lookup("BASIC_AUTH_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        Ok(Self {
            database_url,
            port,
            credentials,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Pool settings whose connection wait shares the request deadline.
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            acquire_timeout: self.request_timeout,
            ..PoolOptions::default()
        }
    }
}
