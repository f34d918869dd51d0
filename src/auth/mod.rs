//! Credential primitives: password hashing and token issuance

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService, TokenError, TokenIssuer};
pub use password::{Argon2Hasher, HashError, PasswordHasher};
