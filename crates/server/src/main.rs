//! ABCD admin backend entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use abcd_api::{AppState, auth_middleware, envelope_errors, router as api_router};
use abcd_common::Config;
use abcd_core::{AuthService, hooks::TracingApprovalHooks};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
};
use tokio::signal;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// How often expired admin sessions are purged.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Seed the configured super-admin if the table is empty.
async fn bootstrap(auth: &AuthService, config: &Config) -> Result<(), abcd_common::AppError> {
    let Some(seed) = &config.bootstrap else {
        return Ok(());
    };

    match auth.bootstrap_super_admin(&seed.email, &seed.password).await? {
        Some(admin) => info!(email = %admin.email, "Seeded super-admin"),
        None => tracing::debug!("Super-admin already present, skipping bootstrap"),
    }
    Ok(())
}

fn spawn_session_purge(auth: AuthService) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match auth.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired admin sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abcd=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting ABCD admin backend...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = abcd_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    abcd_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let state = AppState::new(
        Arc::clone(&db),
        config.session.clone(),
        Arc::new(TracingApprovalHooks),
    );

    bootstrap(&state.auth_service, &config).await?;
    spawn_session_purge(state.auth_service.clone());

    // The console sends its session cookie, so CORS is limited to its origin
    let cors = CorsLayer::new()
        .allow_origin(config.server.url.trim_end_matches('/').parse::<HeaderValue>()?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Build router. The envelope layer sits outside the timeout and body
    // limit so their bare 408/413 responses are wrapped too.
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(middleware::map_response(envelope_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
