//! Per-address request throttling for the whole application.
//!
//! Requests are keyed on the peer IP address. Rejected requests receive `429`
//! with the standard error payload and never reach the wrapped service.

use std::net::IpAddr;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::RateLimiter;

/// Key used when the peer address is unknown, as in some test harnesses.
const UNKNOWN_ADDRESS: &str = "unknown";

fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip())
        .map_or_else(|| UNKNOWN_ADDRESS.to_owned(), |ip: IpAddr| ip.to_string())
}

/// Throttle requests through a shared [`RateLimiter`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use actix_web::App;
/// use logistics_api::domain::{RateLimitPolicy, RateLimiter};
/// use logistics_api::middleware::RateLimit;
/// use mockable::DefaultClock;
///
/// let policy = RateLimitPolicy::new(20, 10.0).expect("valid policy");
/// let limiter = Arc::new(RateLimiter::new(policy, Arc::new(DefaultClock)));
/// let app = App::new().wrap(RateLimit::new(limiter));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.limiter.allow(&client_key(&req)) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                let response = req.error_response(err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
