//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `LOGISTICS_*` environment variables and
//! optional configuration files. Every field is optional; accessors supply the
//! defaults. The JWT signing secret follows a build-mode policy: debug builds
//! fall back to an ephemeral random secret, release builds require an explicit
//! one of at least [`JWT_SECRET_MIN_LEN`] bytes.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_SWEEP_INTERVAL, RateLimitPolicy, RateLimitPolicyError};
use crate::middleware::{CorsPolicy, CorsPolicyError};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_RATE_LIMIT_RPS: f64 = 10.0;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
const DEFAULT_PERSISTENCE_TIMEOUT_MS: u64 = 5_000;

/// Shortest JWT secret accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and warn.
    Debug,
    /// Release builds require an explicit, long enough secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use logistics_api::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("invalid host address `{value}`")]
    InvalidHost { value: String },
    #[error("jwt secret is required in release builds (set LOGISTICS_JWT_SECRET)")]
    MissingJwtSecret,
    #[error("jwt secret must be at least {min_len} bytes, got {length}")]
    JwtSecretTooShort { length: usize, min_len: usize },
    #[error("jwt expiry must be a positive number of hours, got {hours}")]
    InvalidJwtExpiry { hours: i64 },
    #[error("db max connections must be at least 1")]
    InvalidPoolSize,
    #[error(transparent)]
    RateLimit(#[from] RateLimitPolicyError),
    #[error(transparent)]
    Cors(#[from] CorsPolicyError),
}

/// Runtime configuration for the API server.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOGISTICS")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL; in-memory persistence is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours.
    pub jwt_expiry_hours: Option<i64>,
    /// Sustained requests per second allowed per client address.
    pub rate_limit_rps: Option<f64>,
    /// Requests a client address may burst before throttling.
    pub rate_limit_burst: Option<u32>,
    /// Seconds between idle-bucket sweeps.
    pub rate_limit_sweep_secs: Option<u64>,
    /// Deadline, in milliseconds, for each repository call.
    pub persistence_timeout_ms: Option<u64>,
    /// Comma-separated browser origins; every origin is allowed when unset.
    pub cors_allowed_origins: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("rate_limit_rps", &self.rate_limit_rps)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .field("rate_limit_sweep_secs", &self.rate_limit_sweep_secs)
            .field("persistence_timeout_ms", &self.persistence_timeout_ms)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl AppSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::InvalidPoolSize),
            size => Ok(size),
        }
    }

    /// Token lifetime; must be positive.
    pub fn jwt_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.jwt_expiry_hours.unwrap_or(DEFAULT_JWT_EXPIRY_HOURS);
        if hours <= 0 {
            return Err(SettingsError::InvalidJwtExpiry { hours });
        }
        TimeDelta::try_hours(hours).ok_or(SettingsError::InvalidJwtExpiry { hours })
    }

    /// Resolve the signing secret for `mode`.
    ///
    /// A configured secret shorter than [`JWT_SECRET_MIN_LEN`] is rejected in
    /// every mode. Without one, debug builds generate a random secret that
    /// lasts for the life of the process, so tokens do not survive restarts.
    pub fn jwt_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref().filter(|secret| !secret.is_empty()) {
            Some(secret) if secret.len() < JWT_SECRET_MIN_LEN => {
                Err(SettingsError::JwtSecretTooShort {
                    length: secret.len(),
                    min_len: JWT_SECRET_MIN_LEN,
                })
            }
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None => match mode {
                BuildMode::Debug => {
                    warn!("LOGISTICS_JWT_SECRET not set; using an ephemeral secret (dev only)");
                    Ok(Zeroizing::new(rand::random::<[u8; JWT_SECRET_MIN_LEN]>().to_vec()))
                }
                BuildMode::Release => Err(SettingsError::MissingJwtSecret),
            },
        }
    }

    /// Bucket policy from `rate_limit_burst` and `rate_limit_rps`.
    pub fn rate_limit_policy(&self) -> Result<RateLimitPolicy, SettingsError> {
        Ok(RateLimitPolicy::new(
            self.rate_limit_burst.unwrap_or(DEFAULT_RATE_LIMIT_BURST),
            self.rate_limit_rps.unwrap_or(DEFAULT_RATE_LIMIT_RPS),
        )?)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        self.rate_limit_sweep_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_SWEEP_INTERVAL, Duration::from_secs)
    }

    /// Origin allow-list from `cors_allowed_origins`.
    pub fn cors_policy(&self) -> Result<CorsPolicy, SettingsError> {
        let origins = self.cors_allowed_origins.as_deref().unwrap_or_default();
        Ok(CorsPolicy::from_origins(origins.split(','))?)
    }

    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_millis(
            self.persistence_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_PERSISTENCE_TIMEOUT_MS),
        )
    }
}
