use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use guardian_core::error::AppError;
use std::str::FromStr;

use crate::{
    dtos::resources::AuditQuery,
    middleware::AuthUser,
    models::{AuditEventType, AuditFilter, AuditSeverity, Permission},
    services::{authorize, store::audit::DEFAULT_PAGE_SIZE},
    AppState,
};

/// Query the audit trail
#[utoipa::path(
    get,
    path = "/audit-events",
    params(AuditQuery),
    responses(
        (status = 200, description = "One page of matching events", body = AuditPage),
        (status = 400, description = "Unknown event type or severity", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Missing logs:read", body = ErrorResponse)
    ),
    tag = "Audit",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_audit_events(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize::require(&user.0.user, Permission::LogsRead)?;

    let filter = build_filter(&query)?;
    let page = state
        .audit
        .query(
            &filter,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await;

    Ok((StatusCode::OK, Json(page)))
}

/// Parse the comma-separated query lists. An unrecognized name is a client
/// error, not an empty result.
fn build_filter(query: &AuditQuery) -> Result<AuditFilter, AppError> {
    let event_types = parse_list::<AuditEventType>(query.event_type.as_deref())?;
    let severities = parse_list::<AuditSeverity>(query.severity.as_deref())?;

    Ok(AuditFilter {
        event_types,
        severities,
        user_id: query.user_id,
        resource_id: query.resource_id.clone(),
        from: query.from,
        to: query.to,
        search: query.q.clone(),
    })
}

fn parse_list<T: FromStr<Err = String>>(raw: Option<&str>) -> Result<Vec<T>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<T>()
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_lists_are_parsed() {
        let query = AuditQuery {
            event_type: Some("auth:login, api-key:create".to_string()),
            severity: Some("info,warning".to_string()),
            ..Default::default()
        };
        let filter = build_filter(&query).unwrap();
        assert_eq!(
            filter.event_types,
            vec![AuditEventType::AuthLogin, AuditEventType::ApiKeyCreate]
        );
        assert_eq!(
            filter.severities,
            vec![AuditSeverity::Info, AuditSeverity::Warning]
        );
    }

    #[test]
    fn test_unknown_names_are_bad_requests() {
        let query = AuditQuery {
            event_type: Some("auth:teleport".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&query),
            Err(AppError::BadRequest(_))
        ));

        let query = AuditQuery {
            severity: Some("catastrophic".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_filter(&query),
            Err(AppError::BadRequest(_))
        ));
    }
}
