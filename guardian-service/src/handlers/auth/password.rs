use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;

use crate::{
    dtos::auth::{
        MessageResponse, ResetPasswordRequest, ResetPasswordResponse, UpdatePasswordRequest,
    },
    handlers::client_meta,
    AppState,
};

/// Request a password reset token. The response does not reveal whether the
/// address is registered.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Reset requested", body = ResetPasswordResponse),
        (status = 422, description = "Missing or malformed email", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reset_token = state
        .sessions
        .request_password_reset(req, client_meta(&headers))
        .await?;
    Ok((
        StatusCode::OK,
        Json(ResetPasswordResponse {
            message: "If the address is registered, a reset link has been issued.".to_string(),
            reset_token,
        }),
    ))
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/auth/update-password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Passwords do not match", body = ErrorResponse),
        (status = 401, description = "Invalid or expired reset token", body = ErrorResponse),
        (status = 422, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn update_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .update_password(req, client_meta(&headers))
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password updated successfully".to_string(),
        }),
    ))
}
