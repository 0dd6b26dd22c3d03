use super::{PasswordAlgorithm, PasswordHasher};
use crate::error::{AppError, AppResult};
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt hasher, accepted for credentials migrated from other systems
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password with bcrypt: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify bcrypt password: {}", e)))
    }

    fn is_hash(&self, value: &str) -> bool {
        // $2a$, $2b$, $2x$, $2y$ with a 60 character encoding
        value.starts_with("$2") && value.len() == 60 && value.matches('$').count() == 3
    }

    fn algorithm(&self) -> PasswordAlgorithm {
        PasswordAlgorithm::Bcrypt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_known_hash() {
        let hasher = BcryptHasher::new();
        let stored = hasher.hash_password("p").unwrap();

        assert!(hasher.is_hash(&stored));
        assert!(hasher.verify_password("p", &stored).unwrap());
        assert!(!hasher.verify_password("q", &stored).unwrap());
    }

    #[test]
    fn test_bcrypt_is_hash() {
        let hasher = BcryptHasher::new();

        assert!(hasher.is_hash("$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW"));
        assert!(!hasher.is_hash("$argon2id$example"));
        assert!(!hasher.is_hash("$2b$12$tooshort"));
        assert!(!hasher.is_hash("plain"));
    }
}
