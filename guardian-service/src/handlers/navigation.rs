//! Navigation visibility.
//!
//! Returns the navigation entries the current identity may see. This is a
//! UI hint only; every gated route re-checks its permission server-side.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use guardian_core::error::AppError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    middleware::AuthUser,
    models::Permission,
    services::authorize::visible_for,
    AppState,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    #[schema(example = "Dashboard")]
    pub label: &'static str,
    #[schema(example = "/dashboard")]
    pub path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<Permission>,
}

const NAV_ENTRIES: &[NavigationEntry] = &[
    NavigationEntry {
        label: "Dashboard",
        path: "/dashboard",
        required_permission: None,
    },
    NavigationEntry {
        label: "Users",
        path: "/users",
        required_permission: Some(Permission::UsersRead),
    },
    NavigationEntry {
        label: "Permissions",
        path: "/permissions",
        required_permission: Some(Permission::RolesRead),
    },
    NavigationEntry {
        label: "API Keys",
        path: "/api-keys",
        required_permission: Some(Permission::ApiKeysRead),
    },
    NavigationEntry {
        label: "AI Connections",
        path: "/ai-connections",
        required_permission: Some(Permission::AiConnectionsRead),
    },
    NavigationEntry {
        label: "Audit Logs",
        path: "/audit-logs",
        required_permission: Some(Permission::LogsRead),
    },
    NavigationEntry {
        label: "Settings",
        path: "/settings",
        required_permission: None,
    },
];

/// List navigation entries visible to the current user
#[utoipa::path(
    get,
    path = "/navigation",
    responses(
        (status = 200, description = "Visible navigation entries", body = [NavigationEntry]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "User",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_navigation(
    State(_state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let visible: Vec<NavigationEntry> = NAV_ENTRIES
        .iter()
        .filter(|entry| visible_for(Some(&user.0.user), entry.required_permission))
        .cloned()
        .collect();
    Ok((StatusCode::OK, Json(visible)))
}
