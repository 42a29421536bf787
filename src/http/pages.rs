use crate::config::StaticFilesConfig;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, warn};

use super::state::AppState;

/// Front-end pages served by the service
///
/// Each page is looked up in the static directory first and then in the
/// application root.
#[derive(Debug, Clone)]
pub struct StaticPages {
    static_dir: PathBuf,
    root_dir: PathBuf,
}

impl StaticPages {
    pub fn new(static_dir: impl Into<PathBuf>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            root_dir: root_dir.into(),
        }
    }

    pub fn from_config(config: &StaticFilesConfig) -> Self {
        Self::new(&config.static_dir, &config.root_dir)
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        [&self.static_dir, &self.root_dir]
            .into_iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    }

    async fn serve(&self, name: &str, req: Request<Body>) -> Response {
        let Some(path) = self.resolve(name) else {
            warn!("Static page not found: {}", name);
            return StatusCode::NOT_FOUND.into_response();
        };

        match ServeFile::new(&path).oneshot(req).await {
            Ok(resp) => {
                if resp.status().is_server_error() {
                    error!("Error serving {}: {}", path.display(), resp.status());
                }
                resp.into_response()
            }
            Err(never) => match never {},
        }
    }
}

/// GET /
pub async fn index(State(state): State<AppState>, req: Request) -> Response {
    state.pages.serve("index.html", req).await
}

/// GET /login.html
pub async fn login(State(state): State<AppState>, req: Request) -> Response {
    state.pages.serve("login.html", req).await
}

/// GET /style.css
pub async fn stylesheet(State(state): State<AppState>, req: Request) -> Response {
    state.pages.serve("style.css", req).await
}

/// GET /script.js
pub async fn script(State(state): State<AppState>, req: Request) -> Response {
    state.pages.serve("script.js", req).await
}
