//! Server entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use std::io;

use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use logistics_api::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use logistics_api::settings::{AppSettings, BuildMode};

use server::{ServerConfig, create_server};

fn invalid_config(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

async fn build_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let mut config = ServerConfig::new(
        settings.bind_addr().map_err(invalid_config)?,
        settings
            .jwt_secret(BuildMode::from_debug_assertions())
            .map_err(invalid_config)?,
        settings.jwt_ttl().map_err(invalid_config)?,
        settings.rate_limit_policy().map_err(invalid_config)?,
    )
    .with_sweep_interval(settings.rate_limit_sweep_interval())
    .with_persistence_timeout(settings.persistence_timeout())
    .with_cors(settings.cors_policy().map_err(invalid_config)?);

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url)
                .with_max_size(settings.db_max_connections().map_err(invalid_config)?)
                .with_connection_timeout(settings.persistence_timeout()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus()?));

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| {
        error!(error = %err, "failed to load settings");
        invalid_config(err)
    })?;
    info!(?settings, "settings loaded");

    let config = build_config(&settings).await.inspect_err(|err| {
        error!(error = %err, "failed to prepare server");
    })?;
    let (server, health_state) = create_server(config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
