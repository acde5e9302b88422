//! Bearer-token authorization middleware and the identity extractor.
//!
//! [`RequireAuth`] verifies the `Authorization` header through the
//! [`AuthorizationGate`](crate::domain::AuthorizationGate) held in
//! [`HttpState`] and stores the resulting [`AuthenticatedUser`] in the request
//! extensions. [`RequireRole`] must sit inside `RequireAuth` and rejects
//! callers holding a different role. Both short-circuit with the standard
//! error payload, so wrapped handlers never run for rejected requests.
//!
//! ```text
//! web::scope("/orders").wrap(RequireAuth)
//! #[put("/{id}/status", wrap = "RequireRole::admin()")]
//! ```

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, warn};

use crate::domain::{AuthenticatedUser, Error, Role};
use crate::inbound::http::state::HttpState;

fn authorization_header(req: &ServiceRequest) -> Result<Option<&str>, Error> {
    match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| Error::unauthorized("invalid authorization header format")),
        None => Ok(None),
    }
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, Error> {
    let state = req.app_data::<web::Data<HttpState>>().ok_or_else(|| {
        error!("http state missing from app data");
        Error::internal("internal server error")
    })?;
    state.gate.authenticate(authorization_header(req)?)
}

fn reject<B>(req: ServiceRequest, err: Error) -> ServiceResponse<EitherBody<B>> {
    req.error_response(err).map_into_right_body()
}

/// Require a valid bearer token on every wrapped route.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequireAuth`].
pub struct RequireAuthMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
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
        match authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => Box::pin(ready(Ok(reject(req, err)))),
        }
    }
}

/// Require the authenticated caller to hold exactly `role`.
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    pub const fn new(role: Role) -> Self {
        Self { role }
    }

    pub const fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub const fn client() -> Self {
        Self::new(Role::Client)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            role: self.role,
        }))
    }
}

/// Service wrapper produced by [`RequireRole`].
pub struct RequireRoleMiddleware<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let verdict = match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => user.require_role(self.role).inspect_err(|_| {
                warn!(
                    user_id = %user.user_id,
                    held = %user.role,
                    required = %self.role,
                    "role check failed"
                );
            }),
            None => Err(Error::unauthorized("authentication required")),
        };
        match verdict {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => Box::pin(ready(Ok(reject(req, err)))),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| Error::unauthorized("authentication required")),
        )
    }
}

#[cfg(test)]
#[path = "authorization_tests.rs"]
mod tests;
