//! 认证服务：注册、登录、管理员查询
//!
//! 服务本身不持有可变状态，只持有存储、哈希器与令牌签发器的共享引用。

use crate::{
    auth::{PasswordHasher, TokenIssuer},
    error::AuthError,
    models::IdentityId,
    repository::{CredentialStore, StoreError},
};
use std::{future::Future, sync::Arc, time::Duration};
use tracing::Instrument;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
    token_ttl: Duration,
    deadline: Option<Duration>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            token_issuer,
            token_ttl,
            deadline: None,
        }
    }

    /// 为每个操作设置截止时间，超时后放弃进行中的调用
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// 注册新用户
    pub async fn register(&self, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        require("email", email.trim())?;
        require("password", password)?;

        let span = tracing::info_span!("auth.register", email = %email);
        let result = self
            .within_deadline(self.register_identity(email, password))
            .instrument(span)
            .await;

        record_outcome("auth_register_total", &result);
        result
    }

    /// 用户登录，成功时返回签名令牌
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        require("email", email.trim())?;
        require("password", password)?;

        let span = tracing::info_span!("auth.login", email = %email);
        let result = self
            .within_deadline(self.authenticate(email, password))
            .instrument(span)
            .await;

        record_outcome("auth_login_total", &result);
        result
    }

    /// 查询用户是否为管理员
    pub async fn is_admin(&self, user_id: IdentityId) -> Result<bool, AuthError> {
        if !user_id.is_valid() {
            return Err(AuthError::InvalidArgument("user_id"));
        }

        let span = tracing::info_span!("auth.is_admin", %user_id);
        let result = self
            .within_deadline(self.lookup_admin_flag(user_id))
            .instrument(span)
            .await;

        record_outcome("auth_is_admin_total", &result);
        result
    }

    async fn register_identity(&self, email: &str, password: &str) -> Result<IdentityId, AuthError> {
        // 快速路径：唯一性以存储层约束为准
        if self
            .store
            .find_by_email(email)
            .await
            .map_err(store_failure)?
            .is_some()
        {
            tracing::warn!("Email already in use");
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;

        match self.store.insert(email, &password_hash).await {
            Ok(user_id) => {
                tracing::info!(%user_id, "User registered");
                Ok(user_id)
            }
            Err(StoreError::UniqueViolation) => {
                tracing::warn!("Email registered concurrently");
                Err(AuthError::UserAlreadyExists)
            }
            Err(e) => Err(store_failure(e)),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let Some(identity) = self.store.find_by_email(email).await.map_err(store_failure)? else {
            tracing::warn!(reason = "unknown_email", "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(identity.password_hash, password).await? {
            tracing::warn!(reason = "password_mismatch", user_id = %identity.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .token_issuer
            .issue(identity.id, self.token_ttl)
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %identity.id, "Failed to sign token");
                AuthError::SigningFailure
            })?;

        tracing::info!(user_id = %identity.id, "User logged in");
        Ok(token)
    }

    async fn lookup_admin_flag(&self, user_id: IdentityId) -> Result<bool, AuthError> {
        let identity = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(store_failure)?
            .ok_or(AuthError::UserNotFound)?;

        Ok(identity.is_admin)
    }

    /// 哈希计算为 CPU 密集型，放到阻塞线程池执行
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                AuthError::Internal
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to hash password");
                AuthError::Internal
            })
    }

    async fn verify_password(&self, hash: String, password: &str) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                AuthError::Internal
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to verify password");
                AuthError::Internal
            })
    }

    async fn within_deadline<T, F>(&self, op: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, op).await.unwrap_or_else(|_| {
                tracing::warn!(deadline_ms = deadline.as_millis() as u64, "Operation deadline exceeded");
                Err(AuthError::DeadlineExceeded)
            }),
            None => op.await,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AuthError> {
    if value.is_empty() {
        return Err(AuthError::InvalidArgument(field));
    }
    Ok(())
}

/// 存储错误只记录日志，对外统一为 Internal
fn store_failure(err: StoreError) -> AuthError {
    tracing::error!(error = %err, "Credential store failure");
    AuthError::Internal
}

fn record_outcome<T>(metric: &'static str, result: &Result<T, AuthError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    metrics::counter!(metric, "outcome" => outcome).increment(1);
}
