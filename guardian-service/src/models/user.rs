//! User model - identities held by the session service's directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Permission, Role};

/// User entity. The password hash never leaves the service; responses use
/// [`SanitizedUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub mfa_enabled: bool,
    pub password_hash: String,
}

impl User {
    /// Create a new user with no permissions.
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        role: Role,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            role,
            permissions: Vec::new(),
            created_at: Utc::now(),
            last_login: None,
            is_active: true,
            mfa_enabled: false,
            password_hash,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Convert to sanitized response (no sensitive fields).
    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser::from(self.clone())
    }
}

/// User response for the API (without the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub mfa_enabled: bool,
}

impl From<User> for SanitizedUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            permissions: u.permissions,
            created_at: u.created_at,
            last_login: u.last_login,
            is_active: u.is_active,
            mfa_enabled: u.mfa_enabled,
        }
    }
}
