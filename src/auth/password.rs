//! Argon2id password hashing.

use crate::errors::{Error, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use std::fmt;

/// Hashes and verifies account passwords as PHC strings.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl PasswordHasher {
    /// Argon2id with caller-chosen cost parameters (tests use the minimum).
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        // 16 random bytes from a v4 UUID
        let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes()).map_err(|e| {
            Error::Provider {
                message: format!("salt encoding failed: {e}"),
            }
        })?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| Error::Provider {
                message: format!("password hashing failed: {e}"),
            })
    }

    /// `false` for a mismatch or an unparseable stored hash.
    #[must_use]
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        PasswordHash::new(stored_hash)
            .map(|parsed| {
                self.argon2
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
