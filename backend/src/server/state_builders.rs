//! Builders wiring driven adapters into the use-case services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use logistics_api::domain::ports::{
    CoordinateService, OrderRepository, PasswordHasher, PersistenceProbe, TokenService,
    UserRepository,
};
use logistics_api::domain::{AuthService, Deadline, OrderService};
use logistics_api::inbound::http::health::HealthState;
use logistics_api::inbound::http::state::{HttpState, HttpStatePorts};
use logistics_api::outbound::geo::HaversineCoordinateService;
use logistics_api::outbound::memory::{
    InMemoryOrderRepository, InMemoryPersistenceProbe, InMemoryUserRepository,
};
use logistics_api::outbound::persistence::{
    DieselOrderRepository, DieselPersistenceProbe, DieselUserRepository,
};
use logistics_api::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use tracing::info;

use super::ServerConfig;

/// Collaborators shared by both persistence back ends.
struct Collaborators {
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    coordinates: Arc<dyn CoordinateService>,
    clock: Arc<dyn Clock>,
    deadline: Deadline,
}

impl Collaborators {
    fn from_config(config: &ServerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        Self {
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: Arc::new(JwtTokenService::new(
                &config.jwt_secret,
                config.jwt_ttl,
                Arc::clone(&clock),
            )),
            coordinates: Arc::new(HaversineCoordinateService::new()),
            clock,
            deadline: Deadline::new(config.persistence_timeout),
        }
    }
}

/// Assemble HTTP state over one pair of repositories.
fn build_with_repositories<U, O>(
    users: Arc<U>,
    orders: Arc<O>,
    collaborators: Collaborators,
) -> HttpState
where
    U: UserRepository + 'static,
    O: OrderRepository + 'static,
{
    let Collaborators {
        hasher,
        tokens,
        coordinates,
        clock,
        deadline,
    } = collaborators;
    let auth = AuthService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&tokens),
        Arc::clone(&clock),
    )
    .with_deadline(deadline);
    let order_service =
        Arc::new(OrderService::new(orders, users, coordinates, clock).with_deadline(deadline));

    HttpState::new(HttpStatePorts {
        auth: Arc::new(auth),
        orders: order_service.clone(),
        orders_query: order_service,
        tokens,
    })
}

/// Build HTTP and health state, selecting PostgreSQL when a pool is
/// configured and in-memory repositories otherwise.
pub(super) fn build_state(
    config: &ServerConfig,
) -> (web::Data<HttpState>, web::Data<HealthState>) {
    let collaborators = Collaborators::from_config(config);
    let (http_state, probe): (HttpState, Arc<dyn PersistenceProbe>) = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL persistence");
            (
                build_with_repositories(
                    Arc::new(DieselUserRepository::new(pool.clone())),
                    Arc::new(DieselOrderRepository::new(pool.clone())),
                    collaborators,
                ),
                Arc::new(DieselPersistenceProbe::new(pool.clone())),
            )
        }
        None => {
            info!("no database configured; using in-memory persistence");
            (
                build_with_repositories(
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryOrderRepository::new()),
                    collaborators,
                ),
                Arc::new(InMemoryPersistenceProbe),
            )
        }
    };
    (
        web::Data::new(http_state),
        web::Data::new(HealthState::new(probe)),
    )
}
