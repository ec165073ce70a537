use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;

use crate::{
    dtos::auth::{LoginRequest, MessageResponse},
    handlers::client_meta,
    middleware::AuthUser,
    AppState,
};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.sessions.login(req, client_meta(&headers)).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Logout and revoke the current session token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out successfully", body = MessageResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .logout(Some(&user.0.claims), client_meta(&headers))
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}
