//! Salted password hashing and verification using Argon2id.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::Rng;

use crate::utility::tracing_targets::PASSWORD_HASHER as TRACING_TARGET;
use crate::{Error, Result};

/// Password hashing service using Argon2id with default parameters.
///
/// Every hash carries its own random salt, so hashing the same password twice
/// yields two different PHC strings that both verify.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

/// Hash of a random password, shared by every unknown-user verification.
static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    ///
    /// Also prepares the hash used by [`verify_dummy_password`], so the first
    /// unknown-user login is not slower than the rest.
    ///
    /// [`verify_dummy_password`]: Self::verify_dummy_password
    pub fn new() -> Self {
        let hasher = Self {
            argon2: Argon2::default(),
        };

        hasher.dummy_hash();
        hasher
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC string (`$argon2id$v=19$...`) holding the algorithm,
    /// parameters, salt and digest, suitable for storing as-is.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Auth`] error if the hashing operation fails.
    ///
    /// [`ErrorKind::Auth`]: crate::ErrorKind::Auth
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing operation failed"
                );
                Error::auth("password hashing failed").with_source(e)
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash in constant time.
    ///
    /// Returns `Ok(false)` for a wrong password and also for a stored value
    /// that is not a parseable hash: a corrupt record must not let anyone in,
    /// and must not look different from a wrong password to the caller.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Auth`] error only when the hashing primitive
    /// itself fails.
    ///
    /// [`ErrorKind::Auth`]: crate::ErrorKind::Auth
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "stored password hash is not a valid PHC string"
                );
                return Ok(false);
            }
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => Ok(false),
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification system error"
                );
                Err(Error::auth("password verification failed").with_source(e))
            }
        }
    }

    /// Performs a throwaway verification against a random hash.
    ///
    /// Used when the user does not exist so that the response costs one
    /// verification, like a real one. Always returns `false`.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        if let Some(dummy_hash) = self.dummy_hash() {
            let _ = self.verify_password(password, dummy_hash);
        }

        false
    }

    fn dummy_hash(&self) -> Option<&'static str> {
        DUMMY_HASH
            .get_or_init(|| {
                let password_len = rand::random_range(16..32);
                let dummy_password: String = rand::rng()
                    .sample_iter(rand::distr::Alphanumeric)
                    .take(password_len)
                    .map(char::from)
                    .collect();

                self.hash_password(&dummy_password).ok()
            })
            .as_deref()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
