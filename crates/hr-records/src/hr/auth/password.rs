use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Salted one-way hashing of account passwords.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;
    /// `Ok(false)` for a wrong password; `Err` only when the stored hash is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}

/// Argon2id with the crate's default parameters and a fresh salt per hash.
#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| HashError(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|err| HashError(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);
