pub mod api_keys;
pub mod audit;
pub mod auth;
pub mod connections;
pub mod navigation;
pub mod user;

use axum::http::HeaderMap;

use crate::services::ClientMeta;

/// Request metadata for audit events. The client IP comes from
/// `x-forwarded-for` (first hop), set by the edge proxy.
pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string());

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    ClientMeta {
        ip_address,
        user_agent,
    }
}
