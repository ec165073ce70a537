//! Persisted session vault.
//!
//! A single external key-value entry holding the serialized session. Absence
//! means anonymous. The file implementation writes synchronously on
//! login/logout and is read once at startup; the stored shape carries no
//! version and no migration path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::services::ServiceError;

/// The one persisted entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSession {
    pub fn new(token: String) -> Self {
        Self {
            token,
            saved_at: Utc::now(),
        }
    }
}

pub trait SessionVault: Send + Sync {
    fn load(&self) -> Result<Option<PersistedSession>, ServiceError>;
    fn save(&self, session: &PersistedSession) -> Result<(), ServiceError>;
    fn clear(&self) -> Result<(), ServiceError>;
}

/// File-backed vault: one JSON document on disk.
pub struct FileSessionVault {
    path: PathBuf,
}

impl FileSessionVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionVault for FileSessionVault {
    fn load(&self) -> Result<Option<PersistedSession>, ServiceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::Unknown(anyhow::anyhow!(
                    "Failed to read session vault: {}",
                    e
                )))
            }
        };

        // A corrupt entry is treated like no entry: discard it so startup
        // proceeds anonymously instead of aborting.
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt session vault entry");
                self.clear()?;
                Ok(None)
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), ServiceError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| ServiceError::Unknown(anyhow::anyhow!(e)))?;
        std::fs::write(&self.path, raw).map_err(|e| {
            ServiceError::Unknown(anyhow::anyhow!("Failed to write session vault: {}", e))
        })
    }

    fn clear(&self) -> Result<(), ServiceError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Unknown(anyhow::anyhow!(
                "Failed to clear session vault: {}",
                e
            ))),
        }
    }
}

/// In-memory vault for tests.
#[derive(Default)]
pub struct MockSessionVault {
    entry: std::sync::Mutex<Option<PersistedSession>>,
}

impl SessionVault for MockSessionVault {
    fn load(&self) -> Result<Option<PersistedSession>, ServiceError> {
        Ok(self.entry.lock().expect("vault lock poisoned").clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), ServiceError> {
        *self.entry.lock().expect("vault lock poisoned") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ServiceError> {
        *self.entry.lock().expect("vault lock poisoned") = None;
        Ok(())
    }
}
