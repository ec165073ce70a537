use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use guardian_core::error::AppError;

use crate::{middleware::AuthUser, AppState};

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user", body = SanitizedUser),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    State(_state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(user.0.user.sanitized())))
}
