//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::TimeDelta;
use logistics_api::domain::RateLimitPolicy;
use logistics_api::middleware::CorsPolicy;
use logistics_api::outbound::persistence::DbPool;
use zeroize::Zeroizing;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) jwt_ttl: TimeDelta,
    pub(crate) rate_limit: RateLimitPolicy,
    pub(crate) sweep_interval: Duration,
    pub(crate) persistence_timeout: Duration,
    pub(crate) cors: CorsPolicy,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration that keeps state in memory.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Zeroizing<Vec<u8>>,
        jwt_ttl: TimeDelta,
        rate_limit: RateLimitPolicy,
    ) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            jwt_ttl,
            rate_limit,
            sweep_interval: logistics_api::domain::DEFAULT_SWEEP_INTERVAL,
            persistence_timeout: logistics_api::domain::DEFAULT_PERSISTENCE_TIMEOUT,
            cors: CorsPolicy::any_origin(),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the server uses the PostgreSQL repositories instead of
    /// the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Interval between idle rate-limit bucket sweeps.
    #[must_use]
    pub fn with_sweep_interval(mut self, every: Duration) -> Self {
        self.sweep_interval = every;
        self
    }

    /// Deadline applied to each repository call.
    #[must_use]
    pub fn with_persistence_timeout(mut self, timeout: Duration) -> Self {
        self.persistence_timeout = timeout;
        self
    }

    /// Origins browsers may call the API from.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
