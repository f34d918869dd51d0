//! JWT token issuance
//! HS256-signed bearer tokens carrying the identity id and an absolute expiry

use crate::{config::AppConfig, models::IdentityId};
use chrono::Utc;
use config::ConfigError;
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identity id of the token subject
    pub uid: IdentityId,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime out of range: {0:?}")]
    InvalidTtl(Duration),
}

/// Mints signed, time-limited bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: IdentityId, ttl: Duration) -> Result<String, TokenError>;
}

/// JWT service
///
/// Holds the process-wide signing key; it is fixed for the lifetime of the
/// service.
pub struct JwtService {
    encoding_key: EncodingKey,
    header: Header,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::new(&config.security.jwt_secret)
    }

    pub fn new(secret: &Secret<String>) -> Result<Self, ConfigError> {
        let secret = secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret too short (min 32 chars)".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            // HS256
            header: Header::default(),
        })
    }
}

impl TokenIssuer for JwtService {
    fn issue(&self, subject: IdentityId, ttl: Duration) -> Result<String, TokenError> {
        let lifetime = chrono::Duration::from_std(ttl).map_err(|_| TokenError::InvalidTtl(ttl))?;
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(lifetime)
            .ok_or(TokenError::InvalidTtl(ttl))?;

        let claims = Claims {
            uid: subject,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        Ok(encode(&self.header, &claims, &self.encoding_key)?)
    }
}
