//! Authentication primitives: login credentials, token claims and the
//! identity bound to an authenticated request.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use zeroize::Zeroizing;

use super::ports::{TokenError, TokenService};
use super::{Email, Error, Role, UserId};

/// Message shared by every failed login so callers cannot probe for accounts.
pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email is required"),
            Self::EmptyPassword => write!(f, "password is required"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Login input as provided by the caller.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming. It is not
///   otherwise validated: a malformed address simply fails to match.
/// - `password` must be non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use logistics_api::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Trimmed email as typed by the caller.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Verified contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub email: Email,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity bound to a request once its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Succeed only when the caller holds `role`.
    ///
    /// # Examples
    /// ```
    /// use logistics_api::domain::{AuthenticatedUser, Email, ErrorCode, Role, UserId};
    ///
    /// let user = AuthenticatedUser {
    ///     user_id: UserId::random(),
    ///     email: Email::new("ops@example.com").unwrap(),
    ///     role: Role::Client,
    /// };
    /// let err = user.require_role(Role::Admin).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::forbidden("forbidden access"))
        }
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.subject,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme must be `Bearer` (case-insensitive) followed by a single space
/// and a non-empty token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, Error> {
    let header = header
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header required"))?;
    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("invalid authorization header format"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(Error::unauthorized("invalid authorization header format"));
    }
    Ok(token)
}

/// Turns a raw `Authorization` header into an [`AuthenticatedUser`].
#[derive(Clone)]
pub struct AuthorizationGate {
    tokens: Arc<dyn TokenService>,
}

impl AuthorizationGate {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }

    /// Extract and verify a bearer token.
    ///
    /// Every failure is `Unauthorized`; expired tokens say so, anything else
    /// is reported as an invalid token.
    pub fn authenticate(&self, header: Option<&str>) -> Result<AuthenticatedUser, Error> {
        let token = bearer_token(header)?;
        self.tokens
            .verify(token)
            .map(AuthenticatedUser::from)
            .map_err(|err| {
                debug!(error = %err, "bearer token rejected");
                match err {
                    TokenError::Expired => Error::unauthorized("token has expired"),
                    TokenError::Invalid { .. } | TokenError::Signing { .. } => {
                        Error::unauthorized("invalid token")
                    }
                }
            })
    }
}

impl fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationGate").finish_non_exhaustive()
    }
}
