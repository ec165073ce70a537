use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use guardian_core::middleware::rate_limit::create_ip_rate_limiter;
use guardian_service::{
    build_router,
    config::{
        Environment, GuardianConfig, RateLimitConfig, SecurityConfig, SessionConfig,
        SwaggerConfig, SwaggerMode,
    },
    services::{
        store::{api_keys::demo_keys, connections::demo_connections},
        ApiKeyStore, AuditStore, ConnectionStore, MockSessionVault, SessionService,
        SessionTokenService,
    },
    AppState,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> GuardianConfig {
    GuardianConfig {
        common: guardian_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "guardian-service".to_string(),
        service_version: "test".to_string(),
        log_level: "warn".to_string(),
        session: SessionConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            token_expiry_minutes: 30,
            remember_me_expiry_days: 14,
            reset_token_expiry_minutes: 15,
            vault_path: "unused".to_string(),
            expose_reset_token: true,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            password_reset_attempts: 1000,
            password_reset_window_seconds: 60,
            global_ip_limit: 10000,
            global_ip_window_seconds: 60,
        },
    }
}

/// Build a router over fresh stores seeded with the demo admin, two API keys
/// and three connections. The audit store starts empty so tests can assert
/// over exactly what they trigger.
pub async fn test_app() -> (Router, AppState) {
    let config = test_config();

    let audit = AuditStore::new();
    let api_keys = ApiKeyStore::new();
    let connections = ConnectionStore::new();

    let tokens = SessionTokenService::new(&config.session);
    let sessions = SessionService::new(
        tokens,
        Arc::new(MockSessionVault::default()),
        audit.clone(),
        config.session.expose_reset_token,
    );
    let admin_id = sessions.seed_demo_admin().await.unwrap();
    api_keys.seed(demo_keys(admin_id)).await;
    connections.seed(demo_connections()).await;

    let state = AppState {
        config: config.clone(),
        sessions,
        api_keys,
        connections,
        audit,
        login_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.login_attempts,
            config.rate_limit.login_window_seconds,
        ),
        register_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.register_attempts,
            config.rate_limit.register_window_seconds,
        ),
        password_reset_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.password_reset_attempts,
            config.rate_limit.password_reset_window_seconds,
        ),
        ip_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.global_ip_limit,
            config.rate_limit.global_ip_window_seconds,
        ),
    };

    let app = build_router(state.clone()).unwrap();
    (app, state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Sign in as the seeded admin and return the bearer token.
pub async fn login_admin(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": "admin@example.com",
            "password": "password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Register a fresh account with no permissions and return its bearer token.
pub async fn login_permissionless_user(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "Str0ngPass",
            "confirmPassword": "Str0ngPass",
            "firstName": "No",
            "lastName": "Perms"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "Str0ngPass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
