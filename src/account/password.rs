//! Password hashing and verification using Argon2id.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher};
use tracing::{debug, error, instrument};

use crate::shared::AppError;

/// Checks a candidate password against a stored hash
pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, hash: &str, candidate: &str) -> bool;
}

/// Argon2id verifier for PHC-format hashes
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordVerifier;

impl Argon2PasswordVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    /// A stored hash that cannot be parsed never matches.
    #[instrument(skip_all)]
    fn verify(&self, hash: &str, candidate: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        match argon2::PasswordVerifier::verify_password(
            &Argon2::default(),
            candidate.as_bytes(),
            &parsed_hash,
        ) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password does not match stored hash");
                false
            }
            Err(e) => {
                error!(error = %e, "Password verification failed");
                false
            }
        }
    }
}

/// Hashes a plaintext password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "Failed to hash password");
            AppError::Internal
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_matches() {
        let hash = hash_password("correct").unwrap();
        assert!(Argon2PasswordVerifier::new().verify(&hash, "correct"));
    }

    #[test]
    fn test_wrong_password_does_not_match() {
        let hash = hash_password("correct").unwrap();
        assert!(!Argon2PasswordVerifier::new().verify(&hash, "incorrect"));
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("correct").unwrap();
        assert_ne!(hash, "correct");
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("correct").unwrap();
        let second = hash_password("correct").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!Argon2PasswordVerifier::new().verify("not-a-hash", "not-a-hash"));
    }
}
