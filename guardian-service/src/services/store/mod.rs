//! In-memory resource stores.

pub mod api_keys;
pub mod audit;
pub mod connections;

pub use api_keys::ApiKeyStore;
pub use audit::AuditStore;
pub use connections::ConnectionStore;
