//! Password hashing and verification using Argon2id

use crate::config::HashingConfig;
use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hashing failures. A mismatching password is not an error.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

/// One-way, salted, adaptive-cost password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash (algorithm, parameters, salt and digest).
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Check `password` against `hash` in constant time.
    ///
    /// Returns `Ok(false)` on mismatch; errors only when `hash` cannot be parsed.
    fn verify(&self, hash: &str, password: &str) -> Result<bool, HashError>;
}

/// Argon2id hasher with configurable cost parameters
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // m=64MiB, t=3 iterations, p=4 lanes
        let params = Params::new(65536, 3, 4, None).unwrap_or_default();
        Self::with_params(params)
    }

    /// Create hasher from the `hashing` config section
    pub fn from_config(config: &HashingConfig) -> Result<Self, argon2::Error> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)?;
        Ok(Self::with_params(params))
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool, HashError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| HashError::MalformedHash(e.to_string()))?;

        // 参数与盐取自 hash 本身
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::MalformedHash(e.to_string())),
        }
    }
}
