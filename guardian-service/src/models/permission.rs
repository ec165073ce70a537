//! Permission and role enums.
//!
//! A role is a label; it does not grant anything by itself. Capabilities are
//! carried explicitly in each identity's permission set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Atomic capability gating one feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    #[serde(rename = "users:read")]
    UsersRead,
    #[serde(rename = "users:write")]
    UsersWrite,
    #[serde(rename = "users:delete")]
    UsersDelete,
    #[serde(rename = "roles:read")]
    RolesRead,
    #[serde(rename = "roles:write")]
    RolesWrite,
    #[serde(rename = "roles:delete")]
    RolesDelete,
    #[serde(rename = "api-keys:read")]
    ApiKeysRead,
    #[serde(rename = "api-keys:write")]
    ApiKeysWrite,
    #[serde(rename = "api-keys:delete")]
    ApiKeysDelete,
    #[serde(rename = "logs:read")]
    LogsRead,
    #[serde(rename = "ai-connections:read")]
    AiConnectionsRead,
    #[serde(rename = "ai-connections:write")]
    AiConnectionsWrite,
    #[serde(rename = "ai-connections:delete")]
    AiConnectionsDelete,
}

impl Permission {
    /// Every permission in the global enum.
    pub const ALL: [Permission; 13] = [
        Permission::UsersRead,
        Permission::UsersWrite,
        Permission::UsersDelete,
        Permission::RolesRead,
        Permission::RolesWrite,
        Permission::RolesDelete,
        Permission::ApiKeysRead,
        Permission::ApiKeysWrite,
        Permission::ApiKeysDelete,
        Permission::LogsRead,
        Permission::AiConnectionsRead,
        Permission::AiConnectionsWrite,
        Permission::AiConnectionsDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UsersRead => "users:read",
            Permission::UsersWrite => "users:write",
            Permission::UsersDelete => "users:delete",
            Permission::RolesRead => "roles:read",
            Permission::RolesWrite => "roles:write",
            Permission::RolesDelete => "roles:delete",
            Permission::ApiKeysRead => "api-keys:read",
            Permission::ApiKeysWrite => "api-keys:write",
            Permission::ApiKeysDelete => "api-keys:delete",
            Permission::LogsRead => "logs:read",
            Permission::AiConnectionsRead => "ai-connections:read",
            Permission::AiConnectionsWrite => "ai-connections:write",
            Permission::AiConnectionsDelete => "ai-connections:delete",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// User role labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Developer,
    Analyst,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Developer => "developer",
            Role::Analyst => "analyst",
            Role::User => "user",
        }
    }
}
