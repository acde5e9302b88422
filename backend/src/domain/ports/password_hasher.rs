//! Port for one-way password hashing.

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Failures raised by hashing adapters.
    pub enum PasswordHashError {
        /// The digest could not be produced.
        Hash { message: String } => "failed to hash password: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Produces and checks password digests.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a policy-compliant password with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Whether `candidate` matches `digest`.
    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> Result<bool, PasswordHashError>;
}
