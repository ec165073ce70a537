//! Session service.
//!
//! Owns the user directory, token issuance and revocation, the persisted
//! vault entry, and the audit trail for auth operations. All writes to the
//! vault happen on login/logout; the vault is read once at startup to
//! restore a surviving session.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dtos::auth::{
    LoginRequest, RegisterRequest, ResetPasswordRequest, SessionResponse, UpdatePasswordRequest,
};
use crate::models::{AuditEvent, AuditEventType, AuditSeverity, Role, SanitizedUser, User};
use crate::services::credentials::CredentialValidator;
use crate::services::store::AuditStore;
use crate::services::token::{SessionClaims, SessionTokenService};
use crate::services::vault::{PersistedSession, SessionVault};
use crate::services::ServiceError;
use crate::utils::password::{hash_password, verify_password, Password, PasswordHashString};

/// Request metadata recorded on audit events.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
pub struct SessionService {
    directory: Arc<RwLock<Vec<User>>>,
    tokens: SessionTokenService,
    vault: Arc<dyn SessionVault>,
    /// Revoked token IDs mapped to their expiry, pruned on insert.
    revoked: Arc<DashMap<String, i64>>,
    audit: AuditStore,
    expose_reset_token: bool,
}

impl SessionService {
    pub fn new(
        tokens: SessionTokenService,
        vault: Arc<dyn SessionVault>,
        audit: AuditStore,
        expose_reset_token: bool,
    ) -> Self {
        Self {
            directory: Arc::new(RwLock::new(Vec::new())),
            tokens,
            vault,
            revoked: Arc::new(DashMap::new()),
            audit,
            expose_reset_token,
        }
    }

    /// Seed the directory with the demo administrator and return its id.
    pub async fn seed_demo_admin(&self) -> Result<Uuid, ServiceError> {
        let hash = hash_password(&Password::new("password".to_string()))?;
        let mut admin = User::new(
            "admin@example.com".to_string(),
            "Admin".to_string(),
            "User".to_string(),
            Role::Admin,
            hash.into_string(),
        );
        admin.permissions = crate::models::Permission::ALL.to_vec();
        admin.mfa_enabled = true;
        let id = admin.id;
        self.directory.write().await.push(admin);
        tracing::info!("Seeded demo administrator");
        Ok(id)
    }

    /// Authenticate and open a session. Input checks run before any store
    /// access; unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn login(
        &self,
        req: LoginRequest,
        meta: ClientMeta,
    ) -> Result<SessionResponse, ServiceError> {
        CredentialValidator::validate_login(&req)?;

        let user = self.find_by_email(&req.email).await;
        let user = match user {
            Some(user) if user.is_active => user,
            _ => {
                self.audit_failed_login(&req.email, &meta, "Invalid credentials")
                    .await;
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let password = Password::new(req.password);
        let hash = PasswordHashString::new(user.password_hash.clone());
        if verify_password(&password, &hash).is_err() {
            self.audit_failed_login(&req.email, &meta, "Invalid credentials")
                .await;
            return Err(ServiceError::InvalidCredentials);
        }

        let (token, expires_in) = self
            .tokens
            .issue_session(user.id, &user.email, req.remember_me)?;

        let now = chrono::Utc::now();
        {
            let mut directory = self.directory.write().await;
            if let Some(stored) = directory.iter_mut().find(|u| u.id == user.id) {
                stored.last_login = Some(now);
            }
        }

        // The vault always holds the newest session, remember-me or not.
        self.vault.save(&PersistedSession::new(token.clone()))?;

        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthLogin, AuditSeverity::Info)
                    .actor(user.id, &user.email)
                    .client(meta.ip_address, meta.user_agent)
                    .details(serde_json::json!({ "success": true, "rememberMe": req.remember_me })),
            )
            .await;
        tracing::info!(user_id = %user.id, "User logged in");

        let mut sanitized = user.sanitized();
        sanitized.last_login = Some(now);
        Ok(SessionResponse {
            user: sanitized,
            token,
            expires_in,
            token_type: "Bearer".to_string(),
        })
    }

    /// Create an account. Registration does not authenticate; the caller
    /// signs in afterwards.
    pub async fn register(
        &self,
        req: RegisterRequest,
        meta: ClientMeta,
    ) -> Result<Uuid, ServiceError> {
        CredentialValidator::validate_registration(&req)?;

        if self.find_by_email(&req.email).await.is_some() {
            return Err(ServiceError::ValidationError(
                "An account with this email already exists".to_string(),
            ));
        }

        let hash = hash_password(&Password::new(req.password))?;
        let user = User::new(
            req.email,
            req.first_name,
            req.last_name,
            Role::User,
            hash.into_string(),
        );
        let (id, email) = (user.id, user.email.clone());
        self.directory.write().await.push(user);

        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthRegister, AuditSeverity::Info)
                    .actor(id, &email)
                    .client(meta.ip_address, meta.user_agent),
            )
            .await;
        tracing::info!(user_id = %id, "User registered");
        Ok(id)
    }

    /// Close the session behind the given claims. Logout is idempotent: an
    /// already-revoked or absent token still clears the vault and succeeds.
    pub async fn logout(
        &self,
        claims: Option<&SessionClaims>,
        meta: ClientMeta,
    ) -> Result<(), ServiceError> {
        if let Some(claims) = claims {
            self.revoke(&claims.jti, claims.exp);

            let user = self.find_by_id_str(&claims.sub).await;
            let mut event = AuditEvent::new(AuditEventType::AuthLogout, AuditSeverity::Info)
                .client(meta.ip_address, meta.user_agent);
            if let Some(user) = user {
                event = event.actor(user.id, &user.email);
            }
            self.audit.record(event).await;
            tracing::info!(user_id = %claims.sub, "User logged out");
        }

        self.vault.clear()
    }

    /// Issue a password-reset token. Unknown addresses get the same response
    /// as known ones; the token itself is only returned when the service is
    /// configured to expose it (dev environments).
    pub async fn request_password_reset(
        &self,
        req: ResetPasswordRequest,
        meta: ClientMeta,
    ) -> Result<Option<String>, ServiceError> {
        CredentialValidator::validate_reset_request(&req)?;

        let user = match self.find_by_email(&req.email).await {
            Some(user) => user,
            None => {
                tracing::warn!("Password reset requested for unknown address");
                return Ok(None);
            }
        };

        let token = self.tokens.issue_reset(user.id)?;
        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthPasswordReset, AuditSeverity::Info)
                    .actor(user.id, &user.email)
                    .client(meta.ip_address, meta.user_agent)
                    .details(serde_json::json!({ "stage": "requested" })),
            )
            .await;

        Ok(self.expose_reset_token.then_some(token))
    }

    /// Consume a reset token and replace the password.
    pub async fn update_password(
        &self,
        req: UpdatePasswordRequest,
        meta: ClientMeta,
    ) -> Result<(), ServiceError> {
        CredentialValidator::validate_password_update(&req)?;

        let claims = self.tokens.validate_reset(&req.token)?;
        if self.is_revoked(&claims.jti) {
            return Err(ServiceError::InvalidToken);
        }
        let user_id: Uuid = claims.sub.parse().map_err(|_| ServiceError::InvalidToken)?;

        let hash = hash_password(&Password::new(req.password))?;

        let email = {
            let mut directory = self.directory.write().await;
            let user = directory
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(ServiceError::InvalidToken)?;
            user.password_hash = hash.into_string();
            user.email.clone()
        };

        // A reset token is single-use.
        self.revoke(&claims.jti, claims.exp);

        self.audit
            .record(
                AuditEvent::new(AuditEventType::AuthPasswordReset, AuditSeverity::Info)
                    .actor(user_id, &email)
                    .client(meta.ip_address, meta.user_agent)
                    .details(serde_json::json!({ "stage": "completed" })),
            )
            .await;
        tracing::info!(user_id = %user_id, "Password updated via reset token");
        Ok(())
    }

    /// Read the vault once at startup. A valid entry restores the session; a
    /// stale or invalid one is cleared silently.
    pub async fn restore(&self) -> Result<Option<SanitizedUser>, ServiceError> {
        let persisted = match self.vault.load()? {
            Some(persisted) => persisted,
            None => return Ok(None),
        };

        match self.tokens.validate_session(&persisted.token) {
            Ok(claims) if !self.is_revoked(&claims.jti) => {
                if let Some(user) = self.find_by_id_str(&claims.sub).await {
                    if user.is_active {
                        tracing::info!(user_id = %user.id, "Restored persisted session");
                        return Ok(Some(user.sanitized()));
                    }
                }
                self.vault.clear()?;
                Ok(None)
            }
            _ => {
                tracing::info!("Discarding stale persisted session");
                self.vault.clear()?;
                Ok(None)
            }
        }
    }

    /// Resolve validated claims to the current user, rejecting revoked
    /// tokens and deactivated accounts.
    pub async fn current_user(&self, claims: &SessionClaims) -> Result<User, ServiceError> {
        if self.is_revoked(&claims.jti) {
            return Err(ServiceError::InvalidToken);
        }
        let user = self
            .find_by_id_str(&claims.sub)
            .await
            .ok_or(ServiceError::InvalidToken)?;
        if !user.is_active {
            return Err(ServiceError::InvalidToken);
        }
        Ok(user)
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        self.tokens.validate_session(token)
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    fn revoke(&self, jti: &str, exp: i64) {
        let now = chrono::Utc::now().timestamp();
        self.revoked.retain(|_, expiry| *expiry > now);
        self.revoked.insert(jti.to_string(), exp);
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let needle = email.to_lowercase();
        self.directory
            .read()
            .await
            .iter()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned()
    }

    async fn find_by_id_str(&self, sub: &str) -> Option<User> {
        let id: Uuid = sub.parse().ok()?;
        self.directory
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    async fn audit_failed_login(&self, email: &str, meta: &ClientMeta, reason: &str) {
        let mut event = AuditEvent::new(AuditEventType::AuthLogin, AuditSeverity::Warning)
            .client(meta.ip_address.clone(), meta.user_agent.clone())
            .details(serde_json::json!({ "success": false, "reason": reason }));
        event.user_email = Some(email.to_string());
        self.audit.record(event).await;
        tracing::warn!("Failed login attempt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::models::{AuditFilter, Permission};
    use crate::services::vault::{FileSessionVault, MockSessionVault};

    fn test_session_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            token_expiry_minutes: 30,
            remember_me_expiry_days: 14,
            reset_token_expiry_minutes: 15,
            vault_path: "session.json".to_string(),
            expose_reset_token: true,
        }
    }

    async fn service_with_vault(vault: Arc<dyn SessionVault>) -> SessionService {
        let tokens = SessionTokenService::new(&test_session_config());
        let service = SessionService::new(tokens, vault, AuditStore::new(), true);
        service.seed_demo_admin().await.unwrap();
        service
    }

    async fn service() -> SessionService {
        service_with_vault(Arc::new(MockSessionVault::default())).await
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me: false,
        }
    }

    #[tokio::test]
    async fn test_login_succeeds_for_seeded_admin() {
        let service = service().await;
        let session = service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();

        assert_eq!(session.user.email, "admin@example.com");
        assert_eq!(session.user.permissions.len(), Permission::ALL.len());
        assert!(session.user.last_login.is_some());
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.expires_in, 30 * 60);

        let claims = service.validate_token(&session.token).unwrap();
        assert_eq!(claims.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_identical() {
        let service = service().await;

        let wrong = service
            .login(login_req("admin@example.com", "nope-nope"), ClientMeta::default())
            .await;
        let unknown = service
            .login(login_req("ghost@example.com", "password"), ClientMeta::default())
            .await;

        assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));
        assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_malformed_login_fails_before_lookup() {
        let service = service().await;
        assert!(matches!(
            service
                .login(login_req("", "password"), ClientMeta::default())
                .await,
            Err(ServiceError::MissingField("email"))
        ));
        assert!(matches!(
            service
                .login(login_req("not-an-email", "password"), ClientMeta::default())
                .await,
            Err(ServiceError::FormatError(_))
        ));
    }

    #[tokio::test]
    async fn test_registration_does_not_authenticate() {
        let service = service().await;
        let req = RegisterRequest {
            email: "jane@example.com".to_string(),
            password: "Str0ngPass".to_string(),
            confirm_password: "Str0ngPass".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        };

        service.register(req, ClientMeta::default()).await.unwrap();

        // No session token was issued; the new user signs in explicitly and
        // starts with an empty permission set.
        let session = service
            .login(login_req("jane@example.com", "Str0ngPass"), ClientMeta::default())
            .await
            .unwrap();
        assert!(session.user.permissions.is_empty());
        assert_eq!(session.user.role, Role::User);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let service = service().await;
        let req = RegisterRequest {
            email: "admin@example.com".to_string(),
            password: "Str0ngPass".to_string(),
            confirm_password: "Str0ngPass".to_string(),
            first_name: "Other".to_string(),
            last_name: "Admin".to_string(),
        };
        assert!(matches!(
            service.register(req, ClientMeta::default()).await,
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_the_token() {
        let service = service().await;
        let session = service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();
        let claims = service.validate_token(&session.token).unwrap();

        assert!(service.current_user(&claims).await.is_ok());

        service
            .logout(Some(&claims), ClientMeta::default())
            .await
            .unwrap();

        // The signature still verifies, but the session is gone.
        assert!(service.validate_token(&session.token).is_ok());
        assert!(matches!(
            service.current_user(&claims).await,
            Err(ServiceError::InvalidToken)
        ));

        // Logging out again, or with no token at all, still succeeds.
        service
            .logout(Some(&claims), ClientMeta::default())
            .await
            .unwrap();
        service.logout(None, ClientMeta::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_survives_restart_via_vault() {
        let vault: Arc<dyn SessionVault> = Arc::new(MockSessionVault::default());
        let service = service_with_vault(vault.clone()).await;
        service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();

        // A new service instance over the same vault restores the session.
        let restarted = service_with_vault(vault).await;
        let restored = restarted.restore().await.unwrap();
        assert_eq!(
            restored.map(|u| u.email),
            Some("admin@example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_clears_the_vault() {
        let vault: Arc<dyn SessionVault> = Arc::new(MockSessionVault::default());
        let service = service_with_vault(vault.clone()).await;
        let session = service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();
        let claims = service.validate_token(&session.token).unwrap();
        service
            .logout(Some(&claims), ClientMeta::default())
            .await
            .unwrap();

        let restarted = service_with_vault(vault).await;
        assert!(restarted.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_vault_entry_is_discarded_on_restore() {
        let vault = Arc::new(MockSessionVault::default());
        vault
            .save(&PersistedSession::new("garbage-token".to_string()))
            .unwrap();

        let service = service_with_vault(vault.clone()).await;
        assert!(service.restore().await.unwrap().is_none());
        // The stale entry was cleared.
        assert!(vault.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_vault_file_starts_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let vault: Arc<dyn SessionVault> = Arc::new(FileSessionVault::new(path.clone()));
        let service = service_with_vault(vault).await;

        // Startup proceeds anonymously and the broken file is gone.
        assert!(service.restore().await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_password_reset_round_trip() {
        let service = service().await;

        let token = service
            .request_password_reset(
                ResetPasswordRequest {
                    email: "admin@example.com".to_string(),
                },
                ClientMeta::default(),
            )
            .await
            .unwrap()
            .expect("dev mode exposes the token");

        service
            .update_password(
                UpdatePasswordRequest {
                    token: token.clone(),
                    password: "N3wPassword".to_string(),
                    confirm_password: "N3wPassword".to_string(),
                },
                ClientMeta::default(),
            )
            .await
            .unwrap();

        // Old password is dead, new one works.
        assert!(service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .is_err());
        assert!(service
            .login(login_req("admin@example.com", "N3wPassword"), ClientMeta::default())
            .await
            .is_ok());

        // The reset token was single-use.
        assert!(matches!(
            service
                .update_password(
                    UpdatePasswordRequest {
                        token,
                        password: "An0therPass".to_string(),
                        confirm_password: "An0therPass".to_string(),
                    },
                    ClientMeta::default(),
                )
                .await,
            Err(_)
        ));
    }

    #[tokio::test]
    async fn test_reset_for_unknown_email_is_silent() {
        let service = service().await;
        let token = service
            .request_password_reset(
                ResetPasswordRequest {
                    email: "ghost@example.com".to_string(),
                },
                ClientMeta::default(),
            )
            .await
            .unwrap();
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn test_session_token_rejected_as_reset_token() {
        let service = service().await;
        let session = service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();

        assert!(matches!(
            service
                .update_password(
                    UpdatePasswordRequest {
                        token: session.token,
                        password: "N3wPassword".to_string(),
                        confirm_password: "N3wPassword".to_string(),
                    },
                    ClientMeta::default(),
                )
                .await,
            Err(ServiceError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_auth_operations_leave_an_audit_trail() {
        let audit = AuditStore::new();
        let tokens = SessionTokenService::new(&test_session_config());
        let service = SessionService::new(
            tokens,
            Arc::new(MockSessionVault::default()),
            audit.clone(),
            true,
        );
        service.seed_demo_admin().await.unwrap();

        let _ = service
            .login(login_req("admin@example.com", "wrong-pass"), ClientMeta::default())
            .await;
        let session = service
            .login(login_req("admin@example.com", "password"), ClientMeta::default())
            .await
            .unwrap();
        let claims = service.validate_token(&session.token).unwrap();
        service
            .logout(Some(&claims), ClientMeta::default())
            .await
            .unwrap();

        let failed = audit
            .query(
                &AuditFilter {
                    event_types: vec![AuditEventType::AuthLogin],
                    severities: vec![AuditSeverity::Warning],
                    ..Default::default()
                },
                1,
                10,
            )
            .await;
        assert_eq!(failed.total_events, 1);

        let logouts = audit
            .query(
                &AuditFilter {
                    event_types: vec![AuditEventType::AuthLogout],
                    ..Default::default()
                },
                1,
                10,
            )
            .await;
        assert_eq!(logouts.total_events, 1);
    }
}
