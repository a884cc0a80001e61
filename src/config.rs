//! Configuration loaded from environment variables (and `.env` if present).
//!
//! - `DATABASE_URL` - SQLite URL (default: sqlite://users.db)
//! - `DATABASE_MAX_CONNECTIONS` - pool size, at least 1 (default: 5)
//! - `SERVER_HOST` - bind address (default: 127.0.0.1)
//! - `SERVER_PORT` - listen port (default: 5000)
//! - `APP_NAME`, `APP_VERSION`, `APP_ENV` - reported by `/` and `/health`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Service identity shown to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "User Management Server".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".to_owned(),
        }
    }
}

const DEFAULT_MAX_CONNECTIONS: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: NonZeroU32,
    pub host: IpAddr,
    pub port: u16,
    pub service: ServiceInfo,
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key, e.to_string())),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = ServiceInfo::default();

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://users.db".to_owned()),
            max_connections: parse_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            host: parse_var(&lookup, "SERVER_HOST", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
            port: parse_var(&lookup, "SERVER_PORT", 5000)?,
            service: ServiceInfo {
                name: lookup("APP_NAME").unwrap_or(defaults.name),
                version: lookup("APP_VERSION").unwrap_or(defaults.version),
                environment: lookup("APP_ENV").unwrap_or(defaults.environment),
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
