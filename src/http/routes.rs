use super::handlers;
use super::pages;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        // Health / configuration status
        .route("/health", get(handlers::health_check))
        .route("/api/check-status", get(handlers::check_status))
        // Analysis
        .route("/api/analyze-chunk", post(handlers::analyze_chunk))
        // Sessions
        .route("/api/end-session", post(handlers::end_session))
        .route("/api/sessions/:session_id", get(handlers::get_session))
        // Admin
        .route(
            "/admin/cleanup",
            get(handlers::admin_cleanup).post(handlers::admin_cleanup),
        )
        // Front-end pages
        .route("/", get(pages::index))
        .route("/login.html", get(pages::login))
        .route("/style.css", get(pages::stylesheet))
        .route("/script.js", get(pages::script))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Last-resort handler for panics inside request handling
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Unhandled error while serving request: {}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server Error", "message": message })),
    )
        .into_response()
}
