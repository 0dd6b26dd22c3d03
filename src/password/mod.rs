//! Verification of configured user credentials
//!
//! Passwords in the configuration may be stored as Argon2id or bcrypt
//! hashes. Anything that is not recognized as a hash is compared as plain
//! text, which is only meant for local development.

use crate::error::{AppError, AppResult};

/// Password hashing algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAlgorithm {
    Bcrypt,
    Argon2id,
}

impl std::fmt::Display for PasswordAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Argon2id => write!(f, "Argon2id"),
        }
    }
}

/// Abstract trait for password hashing algorithms
pub trait PasswordHasher: Send + Sync {
    fn hash_password(&self, password: &str) -> AppResult<String>;

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;

    /// Check if a string is a hash created by this algorithm
    fn is_hash(&self, value: &str) -> bool;

    fn algorithm(&self) -> PasswordAlgorithm;
}

pub mod argon2_hasher;
pub mod bcrypt_hasher;

pub use argon2_hasher::Argon2idHasher;
pub use bcrypt_hasher::BcryptHasher;

/// Password manager with support for multiple algorithms
///
/// New hashes are always Argon2id.
pub struct PasswordManager {
    hashers: Vec<Box<dyn PasswordHasher>>,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordManager {
    pub fn new() -> Self {
        Self {
            hashers: vec![Box::new(Argon2idHasher::new()), Box::new(BcryptHasher::new())],
        }
    }

    /// Hash a plaintext password for use in the configuration file
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::BadRequest("Password cannot be empty".to_string()));
        }
        Argon2idHasher::new().hash_password(password)
    }

    /// Verify a plaintext password against a stored hash or plain value
    pub fn verify_password(&self, password: &str, stored: &str) -> AppResult<bool> {
        match self.hashers.iter().find(|hasher| hasher.is_hash(stored)) {
            Some(hasher) => hasher.verify_password(password, stored),
            None => Ok(!stored.is_empty() && password == stored),
        }
    }

    /// Detect the algorithm used for a given hash
    pub fn detect_algorithm(&self, hash: &str) -> Option<PasswordAlgorithm> {
        self.hashers
            .iter()
            .find(|hasher| hasher.is_hash(hash))
            .map(|hasher| hasher.algorithm())
    }
}
