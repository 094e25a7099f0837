//! HTTP Endpoints
//!
//! REST API for the capture form and the admin console.

use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, login, logout};
use crate::leads;
use crate::metrics::{metrics_handler, track_metrics};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    Router::new()
        // Public capture form
        .route("/api/capture", post(leads::capture))
        // Staff sessions
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        // Admin console
        .route("/api/leads", get(leads::list_leads))
        .route("/api/leads/export", get(leads::export_leads))
        .route(
            "/api/leads/:id",
            get(leads::get_lead).patch(leads::update_lead),
        )
        .route("/api/reports/by-source", get(leads::source_breakdown))
        .route("/api/events", get(leads::list_events))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // Also counts requests rejected by auth
        .layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, only localhost:3000 is allowed
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let methods = [Method::GET, Method::POST, Method::PATCH, Method::OPTIONS];
    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:3000"))
            .allow_methods(methods)
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match state.leads.count().await {
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "checks": {
                    "lead_store": { "status": "ok", "count": count },
                    "sessions": { "status": "ok", "count": state.sessions.count() },
                }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Lead store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "degraded",
                    "version": env!("CARGO_PKG_VERSION"),
                    "checks": { "lead_store": { "status": "error" } }
                })),
            )
        },
    }
}
