//! Audit event model and filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AuditEventType {
    #[serde(rename = "auth:login")]
    AuthLogin,
    #[serde(rename = "auth:logout")]
    AuthLogout,
    #[serde(rename = "auth:register")]
    AuthRegister,
    #[serde(rename = "auth:password-reset")]
    AuthPasswordReset,
    #[serde(rename = "user:create")]
    UserCreate,
    #[serde(rename = "user:update")]
    UserUpdate,
    #[serde(rename = "user:delete")]
    UserDelete,
    #[serde(rename = "role:create")]
    RoleCreate,
    #[serde(rename = "role:update")]
    RoleUpdate,
    #[serde(rename = "role:delete")]
    RoleDelete,
    #[serde(rename = "api-key:create")]
    ApiKeyCreate,
    #[serde(rename = "api-key:revoke")]
    ApiKeyRevoke,
    #[serde(rename = "ai-connection:create")]
    AiConnectionCreate,
    #[serde(rename = "ai-connection:update")]
    AiConnectionUpdate,
    #[serde(rename = "ai-connection:delete")]
    AiConnectionDelete,
    #[serde(rename = "ai-connection:test")]
    AiConnectionTest,
}

impl AuditEventType {
    pub const ALL: [AuditEventType; 16] = [
        AuditEventType::AuthLogin,
        AuditEventType::AuthLogout,
        AuditEventType::AuthRegister,
        AuditEventType::AuthPasswordReset,
        AuditEventType::UserCreate,
        AuditEventType::UserUpdate,
        AuditEventType::UserDelete,
        AuditEventType::RoleCreate,
        AuditEventType::RoleUpdate,
        AuditEventType::RoleDelete,
        AuditEventType::ApiKeyCreate,
        AuditEventType::ApiKeyRevoke,
        AuditEventType::AiConnectionCreate,
        AuditEventType::AiConnectionUpdate,
        AuditEventType::AiConnectionDelete,
        AuditEventType::AiConnectionTest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::AuthLogin => "auth:login",
            AuditEventType::AuthLogout => "auth:logout",
            AuditEventType::AuthRegister => "auth:register",
            AuditEventType::AuthPasswordReset => "auth:password-reset",
            AuditEventType::UserCreate => "user:create",
            AuditEventType::UserUpdate => "user:update",
            AuditEventType::UserDelete => "user:delete",
            AuditEventType::RoleCreate => "role:create",
            AuditEventType::RoleUpdate => "role:update",
            AuditEventType::RoleDelete => "role:delete",
            AuditEventType::ApiKeyCreate => "api-key:create",
            AuditEventType::ApiKeyRevoke => "api-key:revoke",
            AuditEventType::AiConnectionCreate => "ai-connection:create",
            AuditEventType::AiConnectionUpdate => "ai-connection:update",
            AuditEventType::AiConnectionDelete => "ai-connection:delete",
            AuditEventType::AiConnectionTest => "ai-connection:test",
        }
    }
}

impl std::str::FromStr for AuditEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditEventType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown audit event type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Info,
    Warning,
    Error,
}

impl std::str::FromStr for AuditSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(AuditSeverity::Info),
            "warning" => Ok(AuditSeverity::Warning),
            "error" => Ok(AuditSeverity::Error),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: AuditEventType,
    pub user_id: Option<Uuid>,
    pub user_email: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    #[schema(value_type = Object)]
    pub details: Value,
    pub severity: AuditSeverity,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType, severity: AuditSeverity) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            user_id: None,
            user_email: None,
            ip_address: None,
            user_agent: None,
            resource_id: None,
            resource_type: None,
            details: Value::Null,
            severity,
            timestamp: Utc::now(),
        }
    }

    pub fn actor(mut self, user_id: Uuid, user_email: &str) -> Self {
        self.user_id = Some(user_id);
        self.user_email = Some(user_email.to_string());
        self
    }

    pub fn client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    pub fn resource(mut self, resource_id: String, resource_type: &str) -> Self {
        self.resource_id = Some(resource_id);
        self.resource_type = Some(resource_type.to_string());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// Filter applied by the audit store, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub event_types: Vec<AuditEventType>,
    pub severities: Vec<AuditSeverity>,
    pub user_id: Option<Uuid>,
    pub resource_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}
