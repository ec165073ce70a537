//! AI connection model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Aws,
    Azure,
    Gcp,
    Openai,
    Anthropic,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Active,
    Inactive,
    Error,
    Pending,
}

/// A configured connection to an external AI provider. The config map is
/// opaque to this service; deleting a connection removes it entirely.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiConnection {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[schema(value_type = Object)]
    pub config: Map<String, Value>,
    pub tags: Vec<String>,
}

impl AiConnection {
    pub fn new(
        name: String,
        connection_type: ConnectionType,
        config: Map<String, Value>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            connection_type,
            status: ConnectionStatus::Active,
            created_at: Utc::now(),
            last_used: None,
            config,
            tags,
        }
    }
}
