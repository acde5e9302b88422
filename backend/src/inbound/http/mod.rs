//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON bodies into driving-port requests and map domain
//! errors onto HTTP statuses through [`error`].

pub mod auth;
pub mod authorization;
pub mod error;
pub mod health;
pub mod orders;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

use self::authorization::RequireAuth;

/// Register the API routes, the health probes and the extractor error
/// handlers.
///
/// Expects `web::Data<HttpState>` and `web::Data<HealthState>` to be
/// registered on the application.
///
/// [`HttpState`]: state::HttpState
/// [`HealthState`]: health::HealthState
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login)
                        .service(auth::update_password),
                )
                .service(
                    web::scope("/orders")
                        .wrap(RequireAuth)
                        .service(orders::create_order)
                        .service(orders::list_orders)
                        .service(orders::get_order)
                        .service(orders::update_order_status),
                ),
        )
        .service(health::health)
        .service(health::ready)
        .service(health::live);
}
