//! Port abstraction for identity persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique email constraint rejected an insert.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for registered identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity. Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the mutable fields (password digest, `updated_at`) of an existing identity.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch an identity by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an identity by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Whether an identity with this email exists.
    async fn exists_by_email(&self, email: &Email) -> Result<bool, UserPersistenceError>;
}
