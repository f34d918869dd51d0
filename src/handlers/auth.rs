//! 认证相关的 HTTP 处理器
//! 输入校验与错误分类全部由 AuthService 负责，这里只做协议转换

use super::extract::{ApiJson, ApiPath};
use crate::{error::AuthError, middleware::AppState, models::*};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let user_id = state
        .auth_service
        .register(&req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let token = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse { token }))
}

/// 查询管理员标记
pub async fn is_admin(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<impl IntoResponse, AuthError> {
    let is_admin = state
        .auth_service
        .is_admin(IdentityId::from(user_id))
        .await?;

    Ok(Json(IsAdminResponse { is_admin }))
}
