//! AI connection store.
//!
//! Unlike API keys, deleting a connection removes the record outright.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dtos::resources::{CreateConnectionRequest, UpdateConnectionRequest};
use crate::models::{AiConnection, ConnectionStatus};
use crate::services::ServiceError;

#[derive(Clone, Default)]
pub struct ConnectionStore {
    connections: Arc<RwLock<Vec<AiConnection>>>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<AiConnection> {
        self.connections.read().await.clone()
    }

    pub async fn create(&self, req: CreateConnectionRequest) -> AiConnection {
        let connection = AiConnection::new(req.name, req.connection_type, req.config, req.tags);
        tracing::info!(connection_id = %connection.id, name = %connection.name, "AI connection created");
        self.connections.write().await.push(connection.clone());
        connection
    }

    /// Partial update. The config map merges key-wise over the existing one;
    /// tags replace wholesale.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateConnectionRequest,
    ) -> Result<AiConnection, ServiceError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Connection".to_string()))?;

        if let Some(name) = req.name {
            connection.name = name;
        }
        if let Some(connection_type) = req.connection_type {
            connection.connection_type = connection_type;
        }
        if let Some(config) = req.config {
            for (key, value) in config {
                connection.config.insert(key, value);
            }
        }
        if let Some(tags) = req.tags {
            connection.tags = tags;
        }

        tracing::info!(connection_id = %connection.id, "AI connection updated");
        Ok(connection.clone())
    }

    /// Physical removal.
    pub async fn delete(&self, id: Uuid) -> Result<AiConnection, ServiceError> {
        let mut connections = self.connections.write().await;
        let index = connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Connection".to_string()))?;
        let removed = connections.remove(index);
        tracing::info!(connection_id = %removed.id, "AI connection deleted");
        Ok(removed)
    }

    /// Probe a connection. The test passes exactly when the stored status is
    /// active; it does not reach out to the provider.
    pub async fn test(&self, id: Uuid) -> Result<(AiConnection, bool), ServiceError> {
        let mut connections = self.connections.write().await;
        let connection = connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound("Connection".to_string()))?;

        let success = connection.status == ConnectionStatus::Active;
        connection.last_used = Some(chrono::Utc::now());
        Ok((connection.clone(), success))
    }

    pub async fn seed(&self, connections: Vec<AiConnection>) {
        self.connections.write().await.extend(connections);
    }
}

/// Demo fixtures for the development environment.
pub fn demo_connections() -> Vec<AiConnection> {
    use crate::models::ConnectionType;
    use serde_json::json;

    let object = |value: serde_json::Value| match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    let mut openai = AiConnection::new(
        "OpenAI GPT-4".to_string(),
        ConnectionType::Openai,
        object(json!({ "model": "gpt-4", "endpoint": "https://api.openai.com/v1" })),
        vec!["production".to_string(), "llm".to_string()],
    );
    openai.status = ConnectionStatus::Active;

    let mut bedrock = AiConnection::new(
        "AWS Bedrock".to_string(),
        ConnectionType::Aws,
        object(json!({ "region": "us-east-1", "model": "anthropic.claude-3" })),
        vec!["staging".to_string()],
    );
    bedrock.status = ConnectionStatus::Inactive;

    let mut azure = AiConnection::new(
        "Azure OpenAI".to_string(),
        ConnectionType::Azure,
        object(json!({ "deployment": "gpt-35-turbo", "resourceGroup": "ai-rg" })),
        vec![],
    );
    azure.status = ConnectionStatus::Error;

    vec![openai, bedrock, azure]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionType;
    use serde_json::json;

    fn create_req(name: &str) -> CreateConnectionRequest {
        CreateConnectionRequest {
            name: name.to_string(),
            connection_type: ConnectionType::Openai,
            config: serde_json::Map::from_iter([
                ("model".to_string(), json!("gpt-4")),
                ("timeout".to_string(), json!(30)),
            ]),
            tags: vec!["prod".to_string()],
        }
    }

    #[tokio::test]
    async fn test_update_merges_config_and_replaces_tags() {
        let store = ConnectionStore::new();
        let created = store.create(create_req("Conn")).await;

        let updated = store
            .update(
                created.id,
                UpdateConnectionRequest {
                    config: Some(serde_json::Map::from_iter([(
                        "model".to_string(),
                        json!("gpt-4o"),
                    )])),
                    tags: Some(vec!["staging".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Merge overwrote one key and kept the other.
        assert_eq!(updated.config["model"], json!("gpt-4o"));
        assert_eq!(updated.config["timeout"], json!(30));
        // Tags were replaced, not merged.
        assert_eq!(updated.tags, vec!["staging".to_string()]);
        // Untouched fields survive.
        assert_eq!(updated.name, "Conn");
    }

    #[tokio::test]
    async fn test_delete_removes_the_record() {
        let store = ConnectionStore::new();
        let created = store.create(create_req("Gone")).await;

        store.delete(created.id).await.unwrap();
        assert!(store.list().await.is_empty());

        // A second delete reports not found.
        assert!(matches!(
            store.delete(created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_success_tracks_status() {
        let store = ConnectionStore::new();
        let created = store.create(create_req("Probe")).await;

        let (_, success) = store.test(created.id).await.unwrap();
        assert!(success);

        // Flip status away from active; the probe must fail.
        {
            let mut connections = store.connections.write().await;
            connections[0].status = ConnectionStatus::Error;
        }
        let (probed, success) = store.test(created.id).await.unwrap();
        assert!(!success);
        assert!(probed.last_used.is_some());
    }

    #[tokio::test]
    async fn test_unknown_connection_is_not_found() {
        let store = ConnectionStore::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.update(missing, UpdateConnectionRequest::default()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            store.test(missing).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
