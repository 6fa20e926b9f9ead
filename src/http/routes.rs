use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Transcript persistence
        .route("/session/save", post(handlers::save_session))
        .route("/session/download", get(handlers::download_session))
        .route("/session/list", get(handlers::list_sessions))
        // Session queries
        .route(
            "/session/:session_id/status",
            get(handlers::get_session_status),
        )
        // Request logging + permissive CORS for the capture UI
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
