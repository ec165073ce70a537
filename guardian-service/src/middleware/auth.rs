use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};

use crate::{dtos::ErrorResponse, models::User, services::SessionClaims, AppState};

/// The authenticated identity behind a request, resolved from the bearer
/// token and stashed in request extensions.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: SessionClaims,
}

/// Middleware to require authentication
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Missing or invalid Authorization header".to_string(),
                }),
            ));
        }
    };

    let claims = match state.sessions.validate_token(token) {
        Ok(claims) => claims,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid or expired token".to_string(),
                }),
            ));
        }
    };

    // Revocation and account state are checked against the live directory,
    // not just the signature.
    let user = match state.sessions.current_user(&claims).await {
        Ok(user) => user,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Token has been revoked".to_string(),
                }),
            ));
        }
    };

    req.extensions_mut().insert(CurrentUser { user, claims });

    Ok(next.run(req).await)
}

/// Extractor to easily get the current user in handlers
pub struct AuthUser(pub CurrentUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = parts.extensions.get::<CurrentUser>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Auth context missing from request extensions".to_string(),
            }),
        ))?;

        Ok(AuthUser(current.clone()))
    }
}
