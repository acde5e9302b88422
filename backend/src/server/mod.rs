//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub(crate) use metrics::prometheus;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_state;

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

#[cfg(debug_assertions)]
use logistics_api::doc::ApiDoc;
use logistics_api::domain::RateLimiter;
use logistics_api::inbound::http::configure;
use logistics_api::inbound::http::error::route_not_found;
use logistics_api::inbound::http::health::HealthState;
use logistics_api::inbound::http::state::HttpState;
use logistics_api::middleware::{CorsPolicy, RateLimit, Trace};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    limiter: Arc<RateLimiter>,
    cors: CorsPolicy,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<EitherBody<BoxBody>>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        limiter,
        cors,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(configure)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(RateLimit::new(limiter))
        .wrap(cors.layer())
        .wrap(Trace)
}

/// Construct an Actix HTTP server from `config`.
///
/// Starts the rate-limit sweeper on the current runtime and marks the
/// returned health state ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<(Server, web::Data<HealthState>)> {
    let (http_state, health_state) = build_state(&config);
    let limiter = Arc::new(RateLimiter::new(config.rate_limit, Arc::new(DefaultClock)));
    let sweeper = limiter.spawn_sweeper(config.sweep_interval);
    let ServerConfig {
        bind_addr,
        cors,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            limiter: Arc::clone(&limiter),
            cors: cors.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)
    .inspect_err(|_| sweeper.abort())?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok((server, health_state))
}
