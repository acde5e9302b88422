//! Identity use cases: registration, login and password changes.
//!
//! Login failures are deliberately uniform: an unknown email, a wrong
//! password and a malformed email all produce the same validation error.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AuthCommand, LoginRequest, PasswordHashError, PasswordHasher, RegisterRequest,
    SessionResponse, TokenError, TokenService, UpdatePasswordRequest, UserPayload,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Deadline, Email, Error, INVALID_CREDENTIALS, IssuedToken, Password, Role, User,
};

/// Identity service implementing [`AuthCommand`].
#[derive(Clone)]
pub struct AuthService<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
    deadline: Deadline,
}

impl<U> AuthService<U> {
    /// Create a new service over the given collaborators.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
            deadline: Deadline::default(),
        }
    }

    /// Bound every repository call by `deadline`.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    fn map_user_error(err: UserPersistenceError) -> Error {
        match err {
            UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already exists"),
            other => {
                error!(error = %other, "user repository failure");
                Error::internal("internal server error")
            }
        }
    }

    fn map_hash_error(err: PasswordHashError) -> Error {
        error!(error = %err, "password hashing failure");
        Error::internal("internal server error")
    }

    fn map_token_error(err: TokenError) -> Error {
        error!(error = %err, "token signing failure");
        Error::internal("internal server error")
    }

    fn invalid_credentials() -> Error {
        Error::validation(INVALID_CREDENTIALS)
    }

    fn issue(&self, user: &User) -> Result<IssuedToken, Error> {
        self.tokens.issue(user).map_err(Self::map_token_error)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, Error> {
        self.deadline
            .run("users.find_by_email", self.users.find_by_email(email))
            .await?
            .map_err(Self::map_user_error)
    }
}

#[async_trait]
impl<U> AuthCommand for AuthService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegisterRequest) -> Result<SessionResponse, Error> {
        let email = Email::new(&request.email).map_err(|err| Error::validation(err.to_string()))?;
        let taken = self
            .deadline
            .run("users.exists_by_email", self.users.exists_by_email(&email))
            .await?
            .map_err(Self::map_user_error)?;
        if taken {
            return Err(Error::conflict("email already exists"));
        }

        let password =
            Password::new(&request.password).map_err(|err| Error::validation(err.to_string()))?;
        let role =
            Role::from_str(&request.role).map_err(|err| Error::validation(err.to_string()))?;

        let digest = self.hasher.hash(&password).map_err(Self::map_hash_error)?;
        let user = User::register(email, digest, role, self.clock.utc());
        self.deadline
            .run("users.create", self.users.create(&user))
            .await?
            .map_err(Self::map_user_error)?;

        let token = self.issue(&user)?;
        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(SessionResponse {
            user: UserPayload::from(&user),
            token,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<SessionResponse, Error> {
        let credentials = request.credentials;
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Self::invalid_credentials());
        };

        let Some(user) = self.find_by_email(&email).await? else {
            warn!("login rejected");
            return Err(Self::invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(user.password_digest(), credentials.password())
            .map_err(Self::map_hash_error)?;
        if !matches {
            warn!(user_id = %user.id(), "login rejected");
            return Err(Self::invalid_credentials());
        }

        let token = self.issue(&user)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(SessionResponse {
            user: UserPayload::from(&user),
            token,
        })
    }

    async fn update_password(&self, request: UpdatePasswordRequest) -> Result<UserPayload, Error> {
        let mut user = self
            .deadline
            .run("users.find_by_id", self.users.find_by_id(&request.user_id))
            .await?
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let matches = self
            .hasher
            .verify(user.password_digest(), &request.current_password)
            .map_err(Self::map_hash_error)?;
        if !matches {
            return Err(Self::invalid_credentials());
        }

        let password = Password::new(&request.new_password)
            .map_err(|err| Error::validation(err.to_string()))?;
        let digest = self.hasher.hash(&password).map_err(Self::map_hash_error)?;
        user.update_password(digest, self.clock.utc());
        self.deadline
            .run("users.update", self.users.update(&user))
            .await?
            .map_err(Self::map_user_error)?;

        info!(user_id = %user.id(), "password updated");
        Ok(UserPayload::from(&user))
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
