//! Zero Trust Data Engine API
//!
//! In-memory registries behind the dashboard: logical databases with their
//! tables and columns, API credentials, and the user roster.
//!
//! Nothing is persisted. State is built once at startup (optionally seeded
//! with demo data) and dropped at shutdown. Cross-registry references such as
//! a database's owner are plain ids that nothing enforces.

mod auth;
mod config;
mod credentials;
mod error;
mod models;
mod routes;
mod schema;
mod seed;
mod state;
mod users;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Zero Trust Data Engine...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let state = if settings.seed_data {
        Arc::new(AppState::seeded(settings.keys.environment))
    } else {
        Arc::new(AppState::new(settings.keys.environment))
    };

    info!(
        "🗂️  Registries ready: {} databases, {} active keys, {} users (key environment: {:?})",
        state.schemas.count().await,
        state.credentials.get_active_api_keys().await.len(),
        state.users.list_users().await.len(),
        state.credentials.environment(),
    );

    if !settings.keys.require_api_key {
        warn!("⚠️  REQUIRE_API_KEY is off; /api/v1 routes are open");
    }

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Databases ───");
    info!("   GET  /api/v1/databases                  - List databases (?owner=)");
    info!("   POST /api/v1/databases                  - Create database");
    info!("   GET  /api/v1/databases/:id/schema       - Database schema");
    info!("   POST /api/v1/databases/:id/tables       - Create table");
    info!("   POST /api/v1/databases/:id/sql          - Import CREATE TABLE");
    info!("");
    info!("   ─── Credentials ───");
    info!("   GET  /api/v1/keys                       - List API keys");
    info!("   POST /api/v1/keys                       - Generate API key");
    info!("   POST /api/v1/keys/:id/revoke            - Revoke API key");
    info!("   POST /api/v1/auth/verify                - Verify API key");
    info!("");
    info!("   ─── Users ───");
    info!("   GET  /api/v1/users                      - List users (?search=)");
    info!("   PUT  /api/v1/users/:id/role             - Change role");
    info!("   DEL  /api/v1/users/:id                  - Remove user");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
///
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zerotrust_engine=debug,tower_http=debug"));

    let json = std::env::var("LOG_FORMAT").map_or(false, |f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init();
    }
}

/// Resolves on Ctrl+C or SIGTERM; in-memory state is dropped afterwards
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Ctrl+C received; draining requests, registry state will be discarded");
        },
        _ = terminate => {
            info!("📴 SIGTERM received; draining requests, registry state will be discarded");
        },
    }
}
