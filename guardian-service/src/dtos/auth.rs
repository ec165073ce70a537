use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::SanitizedUser;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,

    #[schema(example = "password")]
    pub password: String,

    #[serde(default)]
    #[schema(example = false)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "user@example.com")]
    pub email: String,

    #[schema(example = "Str0ngPassw0rd", min_length = 8)]
    pub password: String,

    #[schema(example = "Str0ngPassw0rd")]
    pub confirm_password: String,

    #[schema(example = "Jane")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    #[schema(example = "Registration successful. You can now sign in.")]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[schema(example = "user@example.com")]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    #[schema(example = "If the address is registered, a reset link has been issued.")]
    pub message: String,
    /// Populated in dev environments only; production delivers the token
    /// out of band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[schema(example = "eyJhbGciOiJIUzI1NiJ9...")]
    pub token: String,

    #[schema(example = "N3wStr0ngPass", min_length = 8)]
    pub password: String,

    #[schema(example = "N3wStr0ngPass")]
    pub confirm_password: String,
}

/// Session established after a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: SanitizedUser,
    pub token: String,
    pub expires_in: i64,
    #[schema(example = "Bearer")]
    pub token_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}
