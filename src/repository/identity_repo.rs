//! Identity repository (PostgreSQL 数据库访问层)

use super::{CredentialStore, StoreError};
use crate::models::{Identity, IdentityId};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    /// 根据邮箱查找身份
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, StoreError> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT id, email, password_hash, is_admin, created_at FROM identities WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(identity)
    }

    /// 创建身份
    /// 唯一索引 identities_email_key 是邮箱唯一性的最终保证
    async fn insert(&self, email: &str, password_hash: &str) -> Result<IdentityId, StoreError> {
        let id = sqlx::query_scalar::<_, IdentityId>(
            r#"
            INSERT INTO identities (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;

        Ok(id)
    }

    /// 根据 ID 查找身份
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT id, email, password_hash, is_admin, created_at FROM identities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(identity)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::UniqueViolation,
        _ => StoreError::Database(err),
    }
}
