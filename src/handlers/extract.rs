//! 请求提取器
//! 包装 axum 的 Json / Path，把提取失败统一转换为 AuthError，
//! 保证错误响应始终是 JSON 格式且不回显解析细节

use crate::error::AuthError;
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// JSON 请求体
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(
                    status = rejection.status().as_u16(),
                    detail = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(AuthError::InvalidArgument("body"))
            }
        }
    }
}

/// 路径参数
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "Rejected path parameter");
                Err(AuthError::InvalidArgument("path"))
            }
        }
    }
}
