use guardian_core::middleware::rate_limit::create_ip_rate_limiter;
use guardian_core::observability::logging::init_tracing;
use guardian_service::{
    build_router,
    config::{Environment, GuardianConfig},
    services::{
        store::{api_keys::demo_keys, audit::demo_events, connections::demo_connections},
        ApiKeyStore, AuditStore, ConnectionStore, FileSessionVault, SessionService,
        SessionTokenService,
    },
    AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), guardian_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = GuardianConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting session and authorization service"
    );

    // Initialize stores and services
    let audit = AuditStore::new();
    let api_keys = ApiKeyStore::new();
    let connections = ConnectionStore::new();

    let tokens = SessionTokenService::new(&config.session);
    let vault = Arc::new(FileSessionVault::new(&config.session.vault_path));
    let sessions = SessionService::new(
        tokens,
        vault,
        audit.clone(),
        config.session.expose_reset_token,
    );

    // Seed demo data in dev
    if config.environment == Environment::Dev {
        let admin_id = sessions.seed_demo_admin().await?;
        api_keys.seed(demo_keys(admin_id)).await;
        connections.seed(demo_connections()).await;
        audit.seed(demo_events(admin_id)).await;
        tracing::info!("Seeded demo data");
    }

    // Restore a persisted session, if any survived the last run
    if let Some(user) = sessions.restore().await? {
        tracing::info!(email = %user.email, "Previous session restored from vault");
    }

    // Initialize rate limiters using shared logic
    let login_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );
    let register_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.register_attempts,
        config.rate_limit.register_window_seconds,
    );
    let password_reset_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.password_reset_attempts,
        config.rate_limit.password_reset_window_seconds,
    );
    let ip_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.global_ip_limit,
        config.rate_limit.global_ip_window_seconds,
    );
    tracing::info!("Rate limiters initialized: Login, Register, Password Reset, and Global IP");

    // Create application state
    let state = AppState {
        config: config.clone(),
        sessions,
        api_keys,
        connections,
        audit,
        login_rate_limiter,
        register_rate_limiter,
        password_reset_rate_limiter,
        ip_rate_limiter,
    };

    // Build application router
    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));

    let service_span = tracing::info_span!(
        "service",
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
    );
    let _guard = service_span.enter();

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
