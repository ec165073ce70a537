use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::resources::CreateApiKeyRequest,
    handlers::client_meta,
    middleware::AuthUser,
    models::{AuditEvent, AuditEventType, AuditSeverity, Permission},
    services::authorize,
    utils::ValidatedJson,
    AppState,
};

/// List API keys, revoked ones included
#[utoipa::path(
    get,
    path = "/api-keys",
    responses(
        (status = 200, description = "All API keys", body = [ApiKey]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing api-keys:read", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_api_keys(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize::require(&user.0.user, Permission::ApiKeysRead)?;
    let keys = state.api_keys.list().await;
    Ok((StatusCode::OK, Json(keys)))
}

/// Create an API key
#[utoipa::path(
    post,
    path = "/api-keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "Key created; the key material is only returned here", body = ApiKey),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing api-keys:write", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::ApiKeysWrite)?;

    let key = state.api_keys.create(req, actor.id).await;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(AuditEventType::ApiKeyCreate, AuditSeverity::Info)
                .actor(actor.id, &actor.email)
                .client(meta.ip_address, meta.user_agent)
                .resource(key.id.to_string(), "api-key")
                .details(serde_json::json!({ "name": key.name })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(key)))
}

/// Revoke an API key. The record is kept with `isActive` cleared.
#[utoipa::path(
    delete,
    path = "/api-keys/{id}",
    params(
        ("id" = Uuid, Path, description = "API key id")
    ),
    responses(
        (status = 200, description = "Key revoked", body = ApiKey),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing api-keys:delete", body = ErrorResponse),
        (status = 404, description = "Unknown key", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn revoke_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::ApiKeysDelete)?;

    let key = state.api_keys.revoke(id).await?;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(AuditEventType::ApiKeyRevoke, AuditSeverity::Warning)
                .actor(actor.id, &actor.email)
                .client(meta.ip_address, meta.user_agent)
                .resource(key.id.to_string(), "api-key")
                .details(serde_json::json!({ "name": key.name })),
        )
        .await;

    Ok((StatusCode::OK, Json(key)))
}
