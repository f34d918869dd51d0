//! 统一错误模型
//! 定义认证领域的错误分类以及对外的错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 认证服务错误类型
///
/// 只携带分类信息，底层存储/哈希错误仅写入本地日志，不向调用方泄露。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Token signing failed")]
    SigningFailure,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserAlreadyExists => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
            AuthError::SigningFailure | AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 机器可读的错误分类
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidArgument(_) => "invalid_argument",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UserAlreadyExists => "user_already_exists",
            AuthError::UserNotFound => "user_not_found",
            AuthError::SigningFailure => "signing_failure",
            AuthError::DeadlineExceeded => "deadline_exceeded",
            AuthError::Internal => "internal",
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidArgument(field) => format!("Invalid or missing {}", field),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::UserAlreadyExists => "User already exists".to_string(),
            AuthError::UserNotFound => "User not found".to_string(),
            AuthError::DeadlineExceeded => "Request timeout".to_string(),
            AuthError::SigningFailure | AuthError::Internal => {
                "Internal server error".to_string()
            }
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub kind: &'static str,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // 与 x-request-id 响应头保持一致
        let request_id = crate::middleware::current_request_id()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                kind: self.kind(),
                message: self.user_message(),
                request_id,
            },
        };

        // 客户端错误记为 warn，服务端错误记为 error
        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                kind = self.kind(),
                request_id = %error_response.error.request_id,
                "Request failed"
            );
        } else {
            tracing::warn!(
                code = self.code(),
                kind = self.kind(),
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}
