use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::resources::{ConnectionTestResponse, CreateConnectionRequest, UpdateConnectionRequest},
    handlers::client_meta,
    middleware::AuthUser,
    models::{AuditEvent, AuditEventType, AuditSeverity, Permission},
    services::authorize,
    utils::ValidatedJson,
    AppState,
};

/// List AI connections
#[utoipa::path(
    get,
    path = "/ai-connections",
    responses(
        (status = 200, description = "All connections", body = [AiConnection]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing ai-connections:read", body = ErrorResponse)
    ),
    tag = "AI Connections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_connections(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    authorize::require(&user.0.user, Permission::AiConnectionsRead)?;
    let connections = state.connections.list().await;
    Ok((StatusCode::OK, Json(connections)))
}

/// Create an AI connection
#[utoipa::path(
    post,
    path = "/ai-connections",
    request_body = CreateConnectionRequest,
    responses(
        (status = 201, description = "Connection created", body = AiConnection),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing ai-connections:write", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI Connections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::AiConnectionsWrite)?;

    let connection = state.connections.create(req).await;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(AuditEventType::AiConnectionCreate, AuditSeverity::Info)
                .actor(actor.id, &actor.email)
                .client(meta.ip_address, meta.user_agent)
                .resource(connection.id.to_string(), "ai-connection")
                .details(serde_json::json!({ "name": connection.name })),
        )
        .await;

    Ok((StatusCode::CREATED, Json(connection)))
}

/// Update an AI connection. Config entries merge; tags replace.
#[utoipa::path(
    patch,
    path = "/ai-connections/{id}",
    params(
        ("id" = Uuid, Path, description = "Connection id")
    ),
    request_body = UpdateConnectionRequest,
    responses(
        (status = 200, description = "Connection updated", body = AiConnection),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing ai-connections:write", body = ErrorResponse),
        (status = 404, description = "Unknown connection", body = ErrorResponse)
    ),
    tag = "AI Connections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateConnectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::AiConnectionsWrite)?;

    let connection = state.connections.update(id, req).await?;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(AuditEventType::AiConnectionUpdate, AuditSeverity::Info)
                .actor(actor.id, &actor.email)
                .client(meta.ip_address, meta.user_agent)
                .resource(connection.id.to_string(), "ai-connection")
                .details(serde_json::json!({ "name": connection.name })),
        )
        .await;

    Ok((StatusCode::OK, Json(connection)))
}

/// Delete an AI connection outright
#[utoipa::path(
    delete,
    path = "/ai-connections/{id}",
    params(
        ("id" = Uuid, Path, description = "Connection id")
    ),
    responses(
        (status = 200, description = "Connection deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing ai-connections:delete", body = ErrorResponse),
        (status = 404, description = "Unknown connection", body = ErrorResponse)
    ),
    tag = "AI Connections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::AiConnectionsDelete)?;

    let removed = state.connections.delete(id).await?;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(AuditEventType::AiConnectionDelete, AuditSeverity::Warning)
                .actor(actor.id, &actor.email)
                .client(meta.ip_address, meta.user_agent)
                .resource(removed.id.to_string(), "ai-connection")
                .details(serde_json::json!({ "name": removed.name })),
        )
        .await;

    Ok((
        StatusCode::OK,
        Json(crate::dtos::auth::MessageResponse {
            message: "Connection deleted".to_string(),
        }),
    ))
}

/// Probe an AI connection. Succeeds when the connection is active.
#[utoipa::path(
    post,
    path = "/ai-connections/{id}/test",
    params(
        ("id" = Uuid, Path, description = "Connection id")
    ),
    responses(
        (status = 200, description = "Probe outcome", body = ConnectionTestResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing ai-connections:read", body = ErrorResponse),
        (status = 404, description = "Unknown connection", body = ErrorResponse)
    ),
    tag = "AI Connections",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn test_connection(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let actor = &user.0.user;
    authorize::require(actor, Permission::AiConnectionsRead)?;

    let (connection, success) = state.connections.test(id).await?;

    let meta = client_meta(&headers);
    state
        .audit
        .record(
            AuditEvent::new(
                AuditEventType::AiConnectionTest,
                if success {
                    AuditSeverity::Info
                } else {
                    AuditSeverity::Warning
                },
            )
            .actor(actor.id, &actor.email)
            .client(meta.ip_address, meta.user_agent)
            .resource(connection.id.to_string(), "ai-connection")
            .details(serde_json::json!({ "name": connection.name, "success": success })),
        )
        .await;

    let message = if success {
        "Connection test completed successfully".to_string()
    } else {
        "Connection is not active".to_string()
    };
    Ok((
        StatusCode::OK,
        Json(ConnectionTestResponse { success, message }),
    ))
}
