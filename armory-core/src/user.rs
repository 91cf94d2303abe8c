//! User entity and credential handling.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use crate::error::CoreError;
use crate::id::UserId;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LEN: usize = 12;

/// A user of the Armory service.
///
/// Owns zero or more payload records; the stored credential is an argon2
/// PHC string, never the plain password.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name, unique per deployment.
    pub username: String,
    password_hash: String,
}

impl User {
    /// Creates a user with a freshly hashed credential.
    ///
    /// # Errors
    /// Returns [`CoreError::PasswordHash`] if hashing fails.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, CoreError> {
        let mut user = Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: String::new(),
        };
        user.set_password(password)?;
        Ok(user)
    }

    /// Replaces the stored credential with a hash of `plain`.
    ///
    /// Length policy is enforced by the settings flow, not here.
    ///
    /// # Errors
    /// Returns [`CoreError::PasswordHash`] if hashing fails.
    pub fn set_password(&mut self, plain: &str) -> Result<(), CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| CoreError::PasswordHash { reason: e.to_string() })?;
        self.password_hash = hash.to_string();
        Ok(())
    }

    /// `true` if `candidate` matches the stored credential.
    #[must_use]
    pub fn validate_password(&self, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
