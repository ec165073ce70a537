pub mod authorize;
pub mod credentials;
pub mod error;
pub mod session;
pub mod store;
pub mod token;
pub mod vault;

pub use credentials::CredentialValidator;
pub use error::ServiceError;
pub use session::{ClientMeta, SessionService};
pub use store::{ApiKeyStore, AuditStore, ConnectionStore};
pub use token::{SessionClaims, SessionTokenService};
pub use vault::{FileSessionVault, MockSessionVault, SessionVault};
