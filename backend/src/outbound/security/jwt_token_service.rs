//! HS256 JSON Web Token adapter for the `TokenService` port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tests can move time explicitly. The signing secret is process-wide and
//! never rotated.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{Email, IssuedToken, Role, TokenClaims, User, UserId};

/// Wire shape of the signed claims.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies identity tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &[u8], ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("secret", &"**redacted**")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

fn timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::invalid(format!("{claim} is out of range")))
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.ttl;
        let claims = WireClaims {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            role: user.role().as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let claims = data.claims;

        let expires_at = timestamp(claims.exp, "exp")?;
        if expires_at <= self.clock.utc() {
            return Err(TokenError::expired());
        }
        let subject =
            UserId::new(&claims.sub).map_err(|err| TokenError::invalid(format!("sub: {err}")))?;
        let email =
            Email::new(&claims.email).map_err(|err| TokenError::invalid(format!("email: {err}")))?;
        let role = Role::from_str(&claims.role)
            .map_err(|_| TokenError::invalid(format!("unknown role `{}`", claims.role)))?;

        Ok(TokenClaims {
            subject,
            email,
            role,
            issued_at: timestamp(claims.iat, "iat")?,
            expires_at,
        })
    }
}
