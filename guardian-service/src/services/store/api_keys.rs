//! API key store.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dtos::resources::CreateApiKeyRequest;
use crate::models::{ApiKey, Permission};
use crate::services::ServiceError;

#[derive(Clone, Default)]
pub struct ApiKeyStore {
    keys: Arc<RwLock<Vec<ApiKey>>>,
}

impl ApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All keys, revoked ones included.
    pub async fn list(&self) -> Vec<ApiKey> {
        self.keys.read().await.clone()
    }

    pub async fn create(&self, req: CreateApiKeyRequest, created_by: Uuid) -> ApiKey {
        let key = ApiKey::new(req.name, req.permissions, req.expires_at, created_by);
        tracing::info!(key_id = %key.id, name = %key.name, "API key created");
        self.keys.write().await.push(key.clone());
        key
    }

    /// Revocation is a soft delete: the record stays, `is_active` flips off.
    /// Revoking an already-revoked key succeeds without change.
    pub async fn revoke(&self, id: Uuid) -> Result<ApiKey, ServiceError> {
        let mut keys = self.keys.write().await;
        let key = keys
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or_else(|| ServiceError::NotFound("API key".to_string()))?;
        key.is_active = false;
        tracing::info!(key_id = %key.id, "API key revoked");
        Ok(key.clone())
    }

    pub async fn seed(&self, keys: Vec<ApiKey>) {
        self.keys.write().await.extend(keys);
    }
}

/// Demo fixtures for the development environment.
pub fn demo_keys(created_by: Uuid) -> Vec<ApiKey> {
    vec![
        ApiKey::new(
            "Production API Key".to_string(),
            vec![Permission::UsersRead, Permission::LogsRead],
            None,
            created_by,
        ),
        ApiKey::new(
            "CI Pipeline Key".to_string(),
            vec![Permission::ApiKeysRead],
            Some(chrono::Utc::now() + chrono::Duration::days(90)),
            created_by,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(name: &str) -> CreateApiKeyRequest {
        CreateApiKeyRequest {
            name: name.to_string(),
            permissions: vec![Permission::UsersRead],
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_created_keys_are_listed() {
        let store = ApiKeyStore::new();
        let owner = Uuid::new_v4();
        let key = store.create(create_req("First"), owner).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, key.id);
        assert_eq!(listed[0].created_by, owner);
    }

    #[tokio::test]
    async fn test_revoke_keeps_the_record() {
        let store = ApiKeyStore::new();
        let key = store.create(create_req("To revoke"), Uuid::new_v4()).await;

        let revoked = store.revoke(key.id).await.unwrap();
        assert!(!revoked.is_active);

        // Still listed after revocation.
        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].is_active);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let store = ApiKeyStore::new();
        let key = store.create(create_req("Twice"), Uuid::new_v4()).await;

        store.revoke(key.id).await.unwrap();
        let again = store.revoke(key.id).await.unwrap();
        assert!(!again.is_active);
    }

    #[tokio::test]
    async fn test_revoke_unknown_key_is_not_found() {
        let store = ApiKeyStore::new();
        assert!(matches!(
            store.revoke(Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
