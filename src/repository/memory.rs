//! In-process credential store
//! 开发环境与测试使用，数据不持久化

use super::{CredentialStore, StoreError};
use crate::models::{Identity, IdentityId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    next_id: i64,
    by_id: HashMap<IdentityId, Identity>,
    by_email: HashMap<String, IdentityId>,
}

/// Memory-backed [`CredentialStore`].
///
/// The email check and the insert happen under one write lock, so uniqueness
/// holds under concurrent registration just like a unique index.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identity with an explicit admin flag (fixtures, bootstrap admins).
    pub async fn seed(
        &self,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<IdentityId, StoreError> {
        let mut state = self.state.write().await;

        if state.by_email.contains_key(email) {
            return Err(StoreError::UniqueViolation);
        }

        state.next_id += 1;
        let id = IdentityId::new(state.next_id);

        state.by_email.insert(email.to_string(), id);
        state.by_id.insert(
            id,
            Identity {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                is_admin,
                created_at: Utc::now(),
            },
        );

        Ok(id)
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .by_email
            .get(email)
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<IdentityId, StoreError> {
        self.seed(email, password_hash, false).await
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        Ok(self.state.read().await.by_id.get(&id).cloned())
    }
}
