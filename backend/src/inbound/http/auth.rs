//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"ada@example.com","password":"secret1","role":"client"}
//! POST /api/v1/auth/login    {"email":"ada@example.com","password":"secret1"}
//! PUT  /api/v1/auth/password {"currentPassword":"secret1","newPassword":"secret2"}
//! ```

use actix_web::{HttpResponse, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginRequest, RegisterRequest, SessionResponse, UpdatePasswordRequest, UserPayload,
};
use crate::domain::{AuthenticatedUser, Error, LoginCredentials, LoginValidationError, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::authorization::RequireAuth;
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    #[schema(example = "client")]
    pub role: String,
}

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequestBody {
    pub current_password: String,
    #[schema(min_length = 6)]
    pub new_password: String,
}

/// Public identity view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserPayload> for UserResponseBody {
    fn from(value: UserPayload) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.to_string(),
            role: value.role,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Identity plus a bearer token for subsequent requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseBody {
    pub user: UserResponseBody,
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionResponse> for SessionResponseBody {
    fn from(value: SessionResponse) -> Self {
        Self {
            user: value.user.into(),
            token: value.token.token,
            token_type: "Bearer".to_owned(),
            expires_at: value.token.expires_at,
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::validation("email is required")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::validation("password is required")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Register a new identity and return a signed token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Identity created", body = SessionResponseBody),
        (status = 400, description = "Invalid email, password or role", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 429, description = "Too many requests", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let RegisterRequestBody {
        email,
        password,
        role,
    } = payload.into_inner();
    let session = state
        .auth
        .register(RegisterRequest {
            email,
            password: Zeroizing::new(password),
            role,
        })
        .await?;
    Ok(HttpResponse::Created().json(SessionResponseBody::from(session)))
}

/// Exchange credentials for a signed token.
///
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", body = SessionResponseBody),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 429, description = "Too many requests", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<web::Json<SessionResponseBody>> {
    let LoginRequestBody { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_login_validation_error)?;
    let session = state.auth.login(LoginRequest { credentials }).await?;
    Ok(web::Json(session.into()))
}

/// Change the caller's password.
#[utoipa::path(
    put,
    path = "/api/v1/auth/password",
    request_body = UpdatePasswordRequestBody,
    responses(
        (status = 200, description = "Password updated", body = UserResponseBody),
        (status = 400, description = "Wrong current password or weak new password", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Identity no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updatePassword",
    security(("bearer" = []))
)]
#[put("/password", wrap = "RequireAuth")]
pub async fn update_password(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<UpdatePasswordRequestBody>,
) -> ApiResult<web::Json<UserResponseBody>> {
    let UpdatePasswordRequestBody {
        current_password,
        new_password,
    } = payload.into_inner();
    let updated = state
        .auth
        .update_password(UpdatePasswordRequest {
            user_id: user.user_id,
            current_password: Zeroizing::new(current_password),
            new_password: Zeroizing::new(new_password),
        })
        .await?;
    Ok(web::Json(updated.into()))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
