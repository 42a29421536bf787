//! HTTP API server
//!
//! This module provides the REST API used by the browser front end:
//! - POST /api/analyze-chunk - Classify an audio clip for a session
//! - POST /api/end-session - Drop a session's history
//! - GET /api/sessions/:id - Inspect a session's history
//! - GET /api/check-status - Whether the provider is configured
//! - GET|POST /admin/cleanup - Sweep idle sessions on demand
//! - GET /health - Health check
//! - GET /, /login.html, /style.css, /script.js - Front-end pages

mod handlers;
mod pages;
mod routes;
mod state;

pub use handlers::{AnalyzeChunkRequest, EndSessionRequest, ErrorResponse};
pub use pages::StaticPages;
pub use routes::create_router;
pub use state::AppState;
