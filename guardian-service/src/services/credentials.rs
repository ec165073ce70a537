//! Credential validation service.
//!
//! Pure, synchronous input checks. Every auth operation runs these before
//! touching a store or awaiting anything, so malformed input fails instantly.

use crate::dtos::auth::{LoginRequest, RegisterRequest, ResetPasswordRequest, UpdatePasswordRequest};
use crate::services::ServiceError;

const PASSWORD_MIN_LENGTH: usize = 8;

/// Credential validation service.
#[derive(Debug, Clone)]
pub struct CredentialValidator;

impl CredentialValidator {
    /// Reject empty required fields.
    pub fn require(field: &'static str, value: &str) -> Result<(), ServiceError> {
        if value.trim().is_empty() {
            return Err(ServiceError::MissingField(field));
        }
        Ok(())
    }

    /// Validate a `local@domain.tld` address.
    pub fn validate_email(email: &str) -> Result<(), ServiceError> {
        let invalid = || ServiceError::FormatError("Invalid email address".to_string());

        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        if domain.contains('@') {
            return Err(invalid());
        }

        // Domain needs at least one dot with a non-empty label on each side.
        let (name, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
        if name.is_empty()
            || tld.len() < 2
            || !tld.chars().all(|c| c.is_ascii_alphabetic())
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains("..")
        {
            return Err(invalid());
        }

        Ok(())
    }

    /// Registration-strength password: minimum length, one uppercase, one
    /// lowercase, one digit.
    pub fn validate_password_strength(password: &str) -> Result<(), ServiceError> {
        if password.len() < PASSWORD_MIN_LENGTH {
            return Err(ServiceError::FormatError(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LENGTH
            )));
        }
        if !password.chars().any(|c| c.is_ascii_uppercase())
            || !password.chars().any(|c| c.is_ascii_lowercase())
            || !password.chars().any(|c| c.is_ascii_digit())
        {
            return Err(ServiceError::FormatError(
                "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Confirmation must byte-equal the password.
    pub fn validate_confirmation(password: &str, confirm: &str) -> Result<(), ServiceError> {
        if password != confirm {
            return Err(ServiceError::ValidationError(
                "The passwords do not match".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_login(req: &LoginRequest) -> Result<(), ServiceError> {
        Self::require("email", &req.email)?;
        Self::require("password", &req.password)?;
        Self::validate_email(&req.email)
    }

    pub fn validate_registration(req: &RegisterRequest) -> Result<(), ServiceError> {
        Self::require("email", &req.email)?;
        Self::require("password", &req.password)?;
        Self::require("firstName", &req.first_name)?;
        Self::require("lastName", &req.last_name)?;
        Self::validate_email(&req.email)?;
        Self::validate_password_strength(&req.password)?;
        Self::validate_confirmation(&req.password, &req.confirm_password)
    }

    pub fn validate_reset_request(req: &ResetPasswordRequest) -> Result<(), ServiceError> {
        Self::require("email", &req.email)?;
        Self::validate_email(&req.email)
    }

    pub fn validate_password_update(req: &UpdatePasswordRequest) -> Result<(), ServiceError> {
        Self::validate_confirmation(&req.password, &req.confirm_password)?;
        Self::require("token", &req.token)?;
        Self::validate_password_strength(&req.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_missing() {
        assert!(matches!(
            CredentialValidator::require("email", "  "),
            Err(ServiceError::MissingField("email"))
        ));
        assert!(CredentialValidator::require("email", "a@b.io").is_ok());
    }

    #[test]
    fn test_malformed_emails_rejected_with_format_error() {
        for email in [
            "plainaddress",
            "@no-local.com",
            "no-domain@",
            "two@@at.com",
            "user@domain",
            "user@.com",
            "user@domain.",
            "user@domain..com",
            "user name@domain.com",
            "user@domain.c",
            "user@domain.c0m",
        ] {
            assert!(
                matches!(
                    CredentialValidator::validate_email(email),
                    Err(ServiceError::FormatError(_))
                ),
                "expected rejection for {:?}",
                email
            );
        }
    }

    #[test]
    fn test_valid_emails_accepted() {
        for email in ["admin@example.com", "first.last@sub.domain.io", "a+b@x.co"] {
            assert!(CredentialValidator::validate_email(email).is_ok(), "{}", email);
        }
    }

    #[test]
    fn test_password_strength() {
        assert!(matches!(
            CredentialValidator::validate_password_strength("Sh0rt"),
            Err(ServiceError::FormatError(_))
        ));
        assert!(matches!(
            CredentialValidator::validate_password_strength("alllowercase1"),
            Err(ServiceError::FormatError(_))
        ));
        assert!(matches!(
            CredentialValidator::validate_password_strength("ALLUPPERCASE1"),
            Err(ServiceError::FormatError(_))
        ));
        assert!(matches!(
            CredentialValidator::validate_password_strength("NoDigitsHere"),
            Err(ServiceError::FormatError(_))
        ));
        assert!(CredentialValidator::validate_password_strength("Str0ngEnough").is_ok());
    }

    #[test]
    fn test_confirmation_mismatch_is_validation_error() {
        for (a, b) in [("Passw0rd1", "Passw0rd2"), ("Passw0rd1", "passw0rd1"), ("x", "")] {
            assert!(matches!(
                CredentialValidator::validate_confirmation(a, b),
                Err(ServiceError::ValidationError(_))
            ));
        }
        assert!(CredentialValidator::validate_confirmation("Same1234", "Same1234").is_ok());
    }

    #[test]
    fn test_update_checks_mismatch_before_token() {
        // A mismatch must win over an empty token.
        let req = UpdatePasswordRequest {
            token: String::new(),
            password: "Passw0rd1".to_string(),
            confirm_password: "Passw0rd2".to_string(),
        };
        assert!(matches!(
            CredentialValidator::validate_password_update(&req),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
