pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use guardian_core::error::AppError;
use guardian_core::middleware::{
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{openapi::security::SecurityScheme, Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GuardianConfig;
use crate::services::{ApiKeyStore, AuditStore, ConnectionStore, SessionService};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::session::login,
        handlers::auth::session::logout,
        handlers::auth::registration::register,
        handlers::auth::password::request_password_reset,
        handlers::auth::password::update_password,
        handlers::user::get_me,
        handlers::navigation::list_navigation,
        handlers::api_keys::list_api_keys,
        handlers::api_keys::create_api_key,
        handlers::api_keys::revoke_api_key,
        handlers::connections::list_connections,
        handlers::connections::create_connection,
        handlers::connections::update_connection,
        handlers::connections::delete_connection,
        handlers::connections::test_connection,
        handlers::audit::list_audit_events,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::auth::LoginRequest,
            dtos::auth::RegisterRequest,
            dtos::auth::RegisterResponse,
            dtos::auth::ResetPasswordRequest,
            dtos::auth::ResetPasswordResponse,
            dtos::auth::UpdatePasswordRequest,
            dtos::auth::SessionResponse,
            dtos::auth::MessageResponse,
            dtos::resources::CreateApiKeyRequest,
            dtos::resources::CreateConnectionRequest,
            dtos::resources::UpdateConnectionRequest,
            dtos::resources::ConnectionTestResponse,
            dtos::resources::AuditPage,
            handlers::navigation::NavigationEntry,
            models::SanitizedUser,
            models::Role,
            models::Permission,
            models::ApiKey,
            models::AiConnection,
            models::ConnectionType,
            models::ConnectionStatus,
            models::AuditEvent,
            models::AuditEventType,
            models::AuditSeverity,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session lifecycle and password management"),
        (name = "User", description = "Current user profile and navigation"),
        (name = "API Keys", description = "API key management"),
        (name = "AI Connections", description = "AI provider connection management"),
        (name = "Audit", description = "Audit trail queries"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: GuardianConfig,
    pub sessions: SessionService,
    pub api_keys: ApiKeyStore,
    pub connections: ConnectionStore,
    pub audit: AuditStore,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub password_reset_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    // Create login route with rate limiting
    let login_limiter = state.login_rate_limiter.clone();
    let login_route = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .layer(from_fn_with_state(login_limiter, ip_rate_limit_middleware));

    // Create register route with rate limiting
    let register_limiter = state.register_rate_limiter.clone();
    let register_route = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .layer(from_fn_with_state(
            register_limiter,
            ip_rate_limit_middleware,
        ));

    // Create password reset route with rate limiting
    let reset_limiter = state.password_reset_rate_limiter.clone();
    let reset_route = Router::new()
        .route(
            "/auth/reset-password",
            post(handlers::auth::request_password_reset),
        )
        .layer(from_fn_with_state(reset_limiter, ip_rate_limit_middleware));

    // Routes behind authentication
    let protected_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/users/me", get(handlers::user::get_me))
        .route("/navigation", get(handlers::navigation::list_navigation))
        .route(
            "/api-keys",
            get(handlers::api_keys::list_api_keys).post(handlers::api_keys::create_api_key),
        )
        .route("/api-keys/:id", delete(handlers::api_keys::revoke_api_key))
        .route(
            "/ai-connections",
            get(handlers::connections::list_connections)
                .post(handlers::connections::create_connection),
        )
        .route(
            "/ai-connections/:id",
            patch(handlers::connections::update_connection)
                .delete(handlers::connections::delete_connection),
        )
        .route(
            "/ai-connections/:id/test",
            post(handlers::connections::test_connection),
        )
        .route("/audit-events", get(handlers::audit::list_audit_events))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    let mut app = Router::new().route("/health", get(health_check));

    // Only add Swagger UI if enabled in config
    let swagger_enabled = match state.config.environment {
        crate::config::Environment::Dev => true,
        crate::config::Environment::Prod => {
            state.config.swagger.enabled == crate::config::SwaggerMode::Public
        }
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the OpenAPI JSON available for programmatic access
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { axum::Json(ApiDoc::openapi()) }),
        );
    }

    let app = app
        .route(
            "/auth/update-password",
            post(handlers::auth::update_password),
        )
        .merge(login_route)
        .merge(register_route)
        .merge(reset_route)
        .merge(protected_routes)
        .with_state(state.clone())
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .filter_map(|o| match o.parse::<axum::http::HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(e) => {
                                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                                None
                            }
                        })
                        .collect::<Vec<axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PATCH,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        );

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
    }))
}
