use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{AuditEvent, ConnectionType, Permission};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Production API Key")]
    pub name: String,

    pub permissions: Vec<Permission>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "OpenAI GPT-4")]
    pub name: String,

    #[serde(rename = "type")]
    pub connection_type: ConnectionType,

    #[schema(value_type = Object)]
    pub config: Map<String, Value>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields keep their current value. The config map is
/// merged key-wise, tags are replaced wholesale.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConnectionRequest {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub connection_type: Option<ConnectionType>,

    #[schema(value_type = Object)]
    pub config: Option<Map<String, Value>>,

    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionTestResponse {
    pub success: bool,
    #[schema(example = "Connection test completed successfully")]
    pub message: String,
}

/// Query parameters accepted by `GET /audit-events`. `type` and `severity`
/// take comma-separated lists.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(rename = "type")]
    #[param(example = "auth:login,api-key:create")]
    pub event_type: Option<String>,

    #[param(example = "info,warning")]
    pub severity: Option<String>,

    pub user_id: Option<uuid::Uuid>,

    pub resource_id: Option<String>,

    #[param(value_type = Option<String>, example = "2025-01-01T00:00:00Z")]
    pub from: Option<DateTime<Utc>>,

    #[param(value_type = Option<String>, example = "2025-12-31T23:59:59Z")]
    pub to: Option<DateTime<Utc>>,

    /// Case-insensitive substring search.
    pub q: Option<String>,

    pub page: Option<usize>,

    pub page_size: Option<usize>,
}

/// One page of filtered audit events. `total_events` counts the whole
/// filtered set, not the page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    pub total_events: usize,
    pub page: usize,
    pub page_size: usize,
}
