use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::services::ServiceError;

/// Issues and validates signed session and password-reset tokens.
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_expiry_minutes: i64,
    remember_me_expiry_days: i64,
    reset_token_expiry_minutes: i64,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token ID (for revocation)
    pub jti: String,
}

/// Claims carried by a password-reset token. The purpose tag keeps reset
/// tokens from being replayed as session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: String,
    pub purpose: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

pub const RESET_PURPOSE: &str = "password-reset";

impl SessionTokenService {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            session_expiry_minutes: config.token_expiry_minutes,
            remember_me_expiry_days: config.remember_me_expiry_days,
            reset_token_expiry_minutes: config.reset_token_expiry_minutes,
        }
    }

    /// Issue a session token. `remember_me` extends the expiry from minutes
    /// to days.
    pub fn issue_session(
        &self,
        user_id: Uuid,
        email: &str,
        remember_me: bool,
    ) -> Result<(String, i64), anyhow::Error> {
        let now = Utc::now();
        let lifetime = if remember_me {
            Duration::days(self.remember_me_expiry_days)
        } else {
            Duration::minutes(self.session_expiry_minutes)
        };
        let exp = now + lifetime;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))?;

        Ok((token, lifetime.num_seconds()))
    }

    /// Validate signature and expiry of a session token.
    pub fn validate_session(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(map_token_error)?;

        Ok(token_data.claims)
    }

    pub fn issue_reset(&self, user_id: Uuid) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.reset_token_expiry_minutes);

        let claims = ResetClaims {
            sub: user_id.to_string(),
            purpose: RESET_PURPOSE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode reset token: {}", e))
    }

    pub fn validate_reset(&self, token: &str) -> Result<ResetClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data =
            decode::<ResetClaims>(token, &self.decoding_key, &validation).map_err(map_token_error)?;

        if token_data.claims.purpose != RESET_PURPOSE {
            return Err(ServiceError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// Session expiry in seconds (for client info).
    pub fn session_expiry_seconds(&self) -> i64 {
        self.session_expiry_minutes * 60
    }
}

fn map_token_error(e: jsonwebtoken::errors::Error) -> ServiceError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
        _ => ServiceError::InvalidToken,
    }
}
