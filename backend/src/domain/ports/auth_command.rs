//! Driving port for identity use cases: registration, login and password
//! changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::{Email, Error, IssuedToken, LoginCredentials, Role, User, UserId};

/// Public view of an identity. Never carries password material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPayload {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            email: user.email().clone(),
            role: user.role(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Raw registration input.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: Zeroizing<String>,
    pub role: String,
}

/// Identity and token returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub user: UserPayload,
    pub token: IssuedToken,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub credentials: LoginCredentials,
}

/// Password change for an authenticated identity.
#[derive(Debug, Clone)]
pub struct UpdatePasswordRequest {
    pub user_id: UserId,
    pub current_password: Zeroizing<String>,
    pub new_password: Zeroizing<String>,
}

/// Identity use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Create an identity and sign a token for it.
    async fn register(&self, request: RegisterRequest) -> Result<SessionResponse, Error>;

    /// Check credentials and sign a token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, request: LoginRequest) -> Result<SessionResponse, Error>;

    /// Replace the password after re-checking the current one.
    async fn update_password(&self, request: UpdatePasswordRequest) -> Result<UserPayload, Error>;
}
