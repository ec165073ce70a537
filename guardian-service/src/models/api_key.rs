//! API key model.
//!
//! Keys are never physically removed: revocation flips `is_active` and keeps
//! the record for auditability.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Permission;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
    /// Opaque key material, shown to the caller on creation.
    #[schema(example = "ag_a1b2c3d4e5f6")]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub permissions: Vec<Permission>,
    pub is_active: bool,
}

impl ApiKey {
    pub fn new(
        name: String,
        permissions: Vec<Permission>,
        expires_at: Option<DateTime<Utc>>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            key: generate_key_material(),
            expires_at,
            last_used: None,
            created_at: Utc::now(),
            created_by,
            permissions,
            is_active: true,
        }
    }
}

fn generate_key_material() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 16] = rng.gen();
    format!("ag_{}", hex::encode(bytes))
}
