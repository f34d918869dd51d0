//! Authentication-related request/response models

use serde::{Deserialize, Serialize};

use super::identity::IdentityId;

/// Register request
///
/// Missing fields deserialize as empty strings and are rejected by the service.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: IdentityId,
}

/// Login request
///
/// Not `Debug`, it carries a plaintext password.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Admin query response
#[derive(Debug, Serialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}
