//! Argon2id adapter for the `PasswordHasher` port.
//!
//! Digests are stored in PHC string format so the parameters and salt travel
//! with the hash.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier, Version};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

/// Hashes passwords with Argon2id and a random 16-byte salt.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Hasher using the crate's recommended Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Fails when the parameters are outside Argon2's accepted ranges.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        let hash = self
            .argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
        match self.argon2.verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(1024, 1, 1).expect("valid params")
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("policy-compliant password")
    }

    #[rstest]
    fn digest_verifies_matching_password(hasher: Argon2PasswordHasher) {
        let digest = hasher.hash(&password("correct horse")).expect("hash");

        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&digest, "correct horse").expect("verify"));
        assert!(!hasher.verify(&digest, "battery staple").expect("verify"));
    }

    #[rstest]
    fn each_hash_uses_a_fresh_salt(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("secret1")).expect("hash");
        let second = hasher.hash(&password("secret1")).expect("hash");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn malformed_digest_is_reported(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&PasswordDigest::new("plain-text"), "secret1")
            .expect_err("malformed");
        assert!(matches!(err, PasswordHashError::MalformedDigest { .. }));
    }

    #[rstest]
    fn zero_memory_cost_is_rejected() {
        let err = Argon2PasswordHasher::with_params(0, 1, 1).expect_err("invalid params");
        assert!(matches!(err, PasswordHashError::Hash { .. }));
    }
}
