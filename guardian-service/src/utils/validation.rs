//! JSON extractor that runs the DTO's `validator` rules before the handler
//! sees the body. Auth payloads do not use this; their field checks belong to
//! the credential validator.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::dtos::ErrorResponse;

pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                reject(
                    StatusCode::BAD_REQUEST,
                    format!("Malformed request body: {}", e.body_text()),
                )
            })?;

        value.validate().map_err(|e| {
            reject(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Validation error: {}", e),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}

fn reject(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
