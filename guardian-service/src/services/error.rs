use guardian_core::error::AppError;
use thiserror::Error;

/// Error taxonomy surfaced by the session service and the resource stores.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0}")]
    FormatError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    ValidationError(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::MissingField(field) => {
                AppError::UnprocessableEntity(anyhow::anyhow!("{} is required", field))
            }
            ServiceError::FormatError(msg) => AppError::UnprocessableEntity(anyhow::anyhow!(msg)),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid email or password"))
            }
            ServiceError::ValidationError(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::NotFound(what) => {
                AppError::NotFound(anyhow::anyhow!("{} not found", what))
            }
            ServiceError::InvalidToken => AppError::Unauthorized(anyhow::anyhow!("Invalid token")),
            ServiceError::TokenExpired => AppError::Unauthorized(anyhow::anyhow!("Token expired")),
            ServiceError::Unknown(e) => AppError::InternalError(e),
        }
    }
}
