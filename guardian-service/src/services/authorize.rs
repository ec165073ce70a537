//! Authorization gate.
//!
//! Stateless permission checks over an identity's explicit permission set.
//! `visible_for` answers UI-visibility questions (and is never a security
//! boundary); `require` is the server-side enforcement used by handlers.

use guardian_core::error::AppError;

use crate::models::{Permission, User};

/// True when the requirement is public (`None`) or contained in the
/// identity's permission set. An anonymous identity sees only public
/// entries; that is a `false`, not an error.
pub fn visible_for(identity: Option<&User>, requirement: Option<Permission>) -> bool {
    match requirement {
        None => true,
        Some(permission) => identity
            .map(|user| user.has_permission(permission))
            .unwrap_or(false),
    }
}

/// Enforce a permission on the current identity.
pub fn require(user: &User, permission: Permission) -> Result<(), AppError> {
    if user.has_permission(permission) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %user.id,
        required_permission = %permission,
        "Permission denied"
    );

    Err(AppError::Forbidden(anyhow::anyhow!(
        "Missing permission: {}",
        permission
    )))
}
