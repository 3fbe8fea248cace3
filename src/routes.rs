//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod api_key;
mod database;
mod table;
mod user;

use crate::auth::api_key_middleware;
use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware_stack = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    let mut protected = Router::new()
        // Database routes
        .route(
            "/databases",
            get(database::list_databases).post(database::create_database),
        )
        .route(
            "/databases/{id}",
            get(database::get_database)
                .put(database::update_database)
                .delete(database::delete_database),
        )
        .route("/databases/{id}/schema", get(database::get_schema))
        .route("/stats", get(database::get_stats))

        // Table routes
        .route(
            "/databases/{id}/tables",
            get(table::list_tables).post(table::create_table),
        )
        .route("/databases/{id}/sql", post(table::import_table))
        .route(
            "/databases/{id}/tables/{table_id}",
            put(table::update_table).delete(table::delete_table),
        )

        // API key routes
        .route("/keys", get(api_key::list_keys).post(api_key::generate_key))
        .route("/keys/active", get(api_key::list_active_keys))
        .route("/keys/{id}/revoke", post(api_key::revoke_key))
        .route("/endpoints", get(api_key::list_endpoints))

        // User routes
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::remove_user),
        )
        .route("/users/{id}/role", put(user::change_role))
        .route("/users/{id}/reset-password", post(user::reset_password))
        .route("/users/{id}/databases", get(user::visible_databases))
        .route("/password-resets", get(user::list_password_resets));

    if settings.keys.require_api_key {
        protected = protected.route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));
    }

    // Key verification stays reachable without a key
    let api = protected.route("/auth/verify", post(api_key::verify_key));

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api/v1", api)

        // Apply middleware and state
        .layer(middleware_stack)
        .with_state(state)
}

/// CORS for the dashboard origins; an empty or unparsable list opens it up
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Liveness plus the size of each registry
async fn health_check(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Zero Trust Data Engine is up.",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "registries": {
            "databases": state.schemas.count().await,
            "activeKeys": state.credentials.get_active_api_keys().await.len(),
            "users": state.users.list_users().await.len(),
        }
    }))
}
