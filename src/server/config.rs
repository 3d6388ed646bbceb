//! Environment-driven server configuration.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::inbound::http::state::RefreshCookieConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ACCESS_TTL_SECS: u64 = 900;
const DEFAULT_REFRESH_TTL_SECS: u64 = 60 * 60 * 24 * 14;

/// Configuration failures that should abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("invalid value {value:?} for {variable}")]
    InvalidDuration { variable: String, value: String },
    #[error("{variable} is required outside development builds")]
    MissingSecret { variable: String },
    #[error("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ")]
    SharedSecret,
}

/// Server settings resolved from the environment.
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub access_secret: Zeroizing<Vec<u8>>,
    pub access_ttl: Duration,
    pub refresh_secret: Zeroizing<Vec<u8>>,
    pub refresh_ttl: Duration,
    pub cookies: RefreshCookieConfig,
}

impl ServerConfig {
    /// Resolve configuration from environment variables.
    ///
    /// Secrets come from `JWT_ACCESS_SECRET` and `JWT_REFRESH_SECRET`. Debug
    /// builds (or `POSTBOARD_ALLOW_DEV_SECRETS=1`) fall back to ephemeral
    /// secrets with a warning; release builds refuse to start without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr = env::var("POSTBOARD_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                value: raw_addr,
                message: err.to_string(),
            })?;

        let access_secret = secret_from_env("JWT_ACCESS_SECRET")?;
        let refresh_secret = secret_from_env("JWT_REFRESH_SECRET")?;
        // Shared secrets would make the token kinds interchangeable.
        if access_secret.as_slice() == refresh_secret.as_slice() {
            return Err(ConfigError::SharedSecret);
        }

        let access_ttl = duration_from_env("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl = duration_from_env("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;

        let cookie_secure = env::var("REFRESH_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            access_secret,
            access_ttl,
            refresh_secret,
            refresh_ttl,
            cookies: RefreshCookieConfig {
                secure: cookie_secure,
            },
        })
    }
}

fn secret_from_env(variable: &str) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
    match env::var(variable) {
        Ok(value) if !value.is_empty() => Ok(Zeroizing::new(value.into_bytes())),
        _ => {
            let allow_dev = env::var("POSTBOARD_ALLOW_DEV_SECRETS").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(variable, "using ephemeral token secret (dev only)");
                let mut secret = Vec::with_capacity(32);
                secret.extend_from_slice(Uuid::new_v4().as_bytes());
                secret.extend_from_slice(Uuid::new_v4().as_bytes());
                Ok(Zeroizing::new(secret))
            } else {
                Err(ConfigError::MissingSecret {
                    variable: variable.to_owned(),
                })
            }
        }
    }
}

fn duration_from_env(variable: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidDuration {
                variable: variable.to_owned(),
                value: raw,
            }),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}
