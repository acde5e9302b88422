//! Port for issuing and verifying signed identity tokens.

use crate::domain::{IssuedToken, TokenClaims, User};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token adapters.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "failed to sign token: {message}",
        /// Signature, algorithm or claim shape is wrong.
        Invalid { message: String } => "invalid token: {message}",
        /// The token is past its expiry.
        Expired => "token has expired",
    }
}

/// Signs identity tokens and checks them on the way back in.
///
/// Verification parses the role into [`crate::domain::Role`]; an unknown role
/// makes the whole token invalid.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the user's id, email and role.
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError>;

    /// Check signature, claim shape and expiry, returning the claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
