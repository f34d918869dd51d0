//! Credential store layer
//!
//! `CredentialStore` is the contract the authentication service depends on.
//! Email uniqueness is enforced here, not by the caller.

pub mod identity_repo;
pub mod memory;

pub use identity_repo::PgCredentialStore;
pub use memory::InMemoryCredentialStore;

use crate::models::{Identity, IdentityId};
use async_trait::async_trait;

/// 存储层错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email already registered")]
    UniqueViolation,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable lookup and insertion of identities keyed by email.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError>;

    /// Insert a new non-admin identity and return its id.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if `email` is already present.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<IdentityId, StoreError>;

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError>;
}
