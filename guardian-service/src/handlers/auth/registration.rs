use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;

use crate::{
    dtos::auth::{RegisterRequest, RegisterResponse},
    handlers::client_meta,
    AppState,
};

/// Register a new account. Registration does not sign the caller in.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Passwords do not match or email in use", body = ErrorResponse),
        (status = 422, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = state.sessions.register(req, client_meta(&headers)).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            message: "Registration successful. You can now sign in.".to_string(),
        }),
    ))
}
