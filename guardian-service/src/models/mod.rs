pub mod api_key;
pub mod audit_event;
pub mod connection;
pub mod permission;
pub mod user;

pub use api_key::ApiKey;
pub use audit_event::{AuditEvent, AuditEventType, AuditFilter, AuditSeverity};
pub use connection::{AiConnection, ConnectionStatus, ConnectionType};
pub use permission::{Permission, Role};
pub use user::{SanitizedUser, User};
