//! Shared wiring for HTTP integration tests.
//!
//! Builds the production middleware stack and routes over the in-memory
//! repositories, with cheap Argon2 parameters so registration stays fast.

use std::sync::Arc;

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;
use actix_web::{App, web};
use chrono::TimeDelta;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use logistics_api::domain::ports::TokenService;
use logistics_api::domain::{AuthService, OrderService, RateLimitPolicy, RateLimiter};
use logistics_api::inbound::http::configure;
use logistics_api::inbound::http::error::route_not_found;
use logistics_api::inbound::http::health::HealthState;
use logistics_api::inbound::http::state::{HttpState, HttpStatePorts};
use logistics_api::middleware::{CorsPolicy, RateLimit, Trace};
use logistics_api::outbound::geo::HaversineCoordinateService;
use logistics_api::outbound::memory::{
    InMemoryOrderRepository, InMemoryPersistenceProbe, InMemoryUserRepository,
};
use logistics_api::outbound::security::{Argon2PasswordHasher, JwtTokenService};

pub const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

pub type TestResponse = ServiceResponse<EitherBody<EitherBody<BoxBody>>>;

/// Rate limit generous enough that only dedicated tests hit it.
pub fn relaxed_policy() -> RateLimitPolicy {
    RateLimitPolicy::new(1_000, 1_000.0).expect("valid policy")
}

/// Build the full application over fresh in-memory state.
pub async fn init_app(
    policy: RateLimitPolicy,
) -> impl Service<actix_http::Request, Response = TestResponse, Error = actix_web::Error> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryUserRepository::new());
    let orders = Arc::new(InMemoryOrderRepository::new());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        SECRET,
        TimeDelta::hours(1),
        Arc::clone(&clock),
    ));
    let hasher = Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).expect("argon2 params"));
    let auth = AuthService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&tokens),
        Arc::clone(&clock),
    );
    let order_service = Arc::new(OrderService::new(
        orders,
        users,
        Arc::new(HaversineCoordinateService::new()),
        Arc::clone(&clock),
    ));
    let http_state = web::Data::new(HttpState::new(HttpStatePorts {
        auth: Arc::new(auth),
        orders: order_service.clone(),
        orders_query: order_service,
        tokens,
    }));
    let health_state = web::Data::new(HealthState::new(Arc::new(InMemoryPersistenceProbe)));
    health_state.mark_ready();
    let limiter = Arc::new(RateLimiter::new(policy, clock));

    actix_test::init_service(
        App::new()
            .app_data(health_state)
            .app_data(http_state)
            .configure(configure)
            .default_service(web::to(route_not_found))
            .wrap(RateLimit::new(limiter))
            .wrap(CorsPolicy::any_origin().layer())
            .wrap(Trace),
    )
    .await
}

pub fn order_body() -> Value {
    json!({
        "originCoordinates": { "latitude": 19.4326, "longitude": -99.1332 },
        "destinationCoordinates": { "latitude": 20.6597, "longitude": -103.3496 },
        "originAddress": {
            "street": "Av. Reforma", "zipCode": "06600", "extNum": "222",
            "city": "Ciudad de México", "state": "CDMX", "country": "MX"
        },
        "destinationAddress": {
            "street": "Av. Chapultepec", "zipCode": "44100", "extNum": "15",
            "city": "Guadalajara", "state": "JAL", "country": "MX"
        },
        "productQuantity": 3,
        "totalWeight": 12.5
    })
}

/// Register an identity and return its bearer token.
pub async fn register<S>(app: &S, email: &str, role: &str) -> String
where
    S: Service<actix_http::Request, Response = TestResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": email, "password": "secret1", "role": role }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    body["token"].as_str().expect("token in body").to_owned()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {token}"))
}
