//! Credential hashing.
//!
//! `PasswordHasher` is the collaborator the registration workflow hashes
//! through; `Argon2PasswordHasher` is the production implementation.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash as Argon2Hash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DomainError, DomainResult};

/// Encoded one-way password hash (PHC string format).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

// Don't expose hash in debug output
impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[REDACTED]").finish()
    }
}

impl PasswordHash {
    /// Wrap an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One-way salted password hashing with verification.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password with a fresh random salt.
    fn hash(&self, plain_password: &str) -> DomainResult<PasswordHash>;

    /// Verify a plain text password against a stored hash.
    fn verify(&self, plain_password: &str, hash: &PasswordHash) -> DomainResult<bool>;
}

/// Argon2id hasher with tunable cost.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("Argon2PasswordHasher")
            .field("memory_kib", &params.m_cost())
            .field("iterations", &params.t_cost())
            .field("parallelism", &params.p_cost())
            .finish()
    }
}

impl Argon2PasswordHasher {
    /// Build a hasher from cost parameters.
    ///
    /// # Errors
    /// Returns `DomainError::Hashing` if the parameters are out of range.
    /// Call this at startup so a misconfigured hasher stops the process
    /// instead of failing every request.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::hashing(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> DomainResult<PasswordHash> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| DomainError::hashing(format!("Password hash failed: {}", e)))?;

        Ok(PasswordHash(hash.to_string()))
    }

    fn verify(&self, plain_password: &str, hash: &PasswordHash) -> DomainResult<bool> {
        let parsed = Argon2Hash::new(hash.as_str())
            .map_err(|e| DomainError::hashing(format!("Invalid hash format: {}", e)))?;

        // Cost parameters are read from the encoded hash itself.
        Ok(self
            .argon2
            .verify_password(plain_password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("Abcdef1!").unwrap();

        assert_ne!(hash.as_str(), "Abcdef1!");
        assert!(hasher.verify("Abcdef1!", &hash).unwrap());
        assert!(!hasher.verify("Abcdef1?", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = cheap_hasher();
        let first = hasher.hash("SamePassword1!").unwrap();
        let second = hasher.hash("SamePassword1!").unwrap();

        // Different salts produce different hashes
        assert_ne!(first, second);
        // But both verify correctly
        assert!(hasher.verify("SamePassword1!", &first).unwrap());
        assert!(hasher.verify("SamePassword1!", &second).unwrap());
    }

    #[test]
    fn test_hash_is_argon2id() {
        let hash = cheap_hasher().hash("Abcdef1!").unwrap();
        assert!(hash.as_str().starts_with("$argon2id$"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = Argon2PasswordHasher::new(1024, 0, 1);
        assert!(matches!(result, Err(DomainError::Hashing(_))));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = cheap_hasher();
        let result = hasher.verify("Abcdef1!", &PasswordHash::from_hash("not-a-hash".into()));
        assert!(matches!(result, Err(DomainError::Hashing(_))));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let hash = PasswordHash::from_hash("$argon2id$secret".to_string());
        assert!(!format!("{:?}", hash).contains("secret"));
    }
}
