use super::pages::StaticPages;
use crate::config::Config;
use crate::provider::{AudioClassifier, GeminiClassifier};
use crate::session::{CleanupScheduler, SessionStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Per-client result history
    pub sessions: Arc<SessionStore>,

    /// Sweep shared with the background task
    pub cleanup: Arc<CleanupScheduler>,

    /// `None` until an API key is configured
    pub classifier: Option<Arc<dyn AudioClassifier>>,

    /// Upper bound on one classification call
    pub provider_timeout: Duration,

    /// Shared secret for the admin endpoint
    pub admin_token: Option<String>,

    pub pages: Arc<StaticPages>,

    pub max_body_bytes: usize,
}

impl AppState {
    /// State with defaults and no provider
    pub fn new(sessions: Arc<SessionStore>, cleanup: Arc<CleanupScheduler>) -> Self {
        let defaults = Config::default();
        Self {
            sessions,
            cleanup,
            classifier: None,
            provider_timeout: defaults.provider.timeout(),
            admin_token: None,
            pages: Arc::new(StaticPages::from_config(&defaults.static_files)),
            max_body_bytes: defaults.limits.max_content_length_bytes,
        }
    }

    /// Build everything the router needs from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let sessions = Arc::new(SessionStore::new(config.session.max_results));
        let cleanup = Arc::new(CleanupScheduler::new(
            Arc::clone(&sessions),
            config.session.timeout(),
            config.session.cleanup_interval(),
        ));

        let classifier: Option<Arc<dyn AudioClassifier>> = if config.provider.is_configured() {
            let gemini = GeminiClassifier::new(&config.provider)
                .context("Failed to configure Gemini client")?;
            Some(Arc::new(gemini))
        } else {
            warn!("GEMINI_API_KEY not set. Analysis requests will fail until configured.");
            None
        };

        Ok(Self {
            sessions,
            cleanup,
            classifier,
            provider_timeout: config.provider.timeout(),
            admin_token: config.admin.token().map(str::to_string),
            pages: Arc::new(StaticPages::from_config(&config.static_files)),
            max_body_bytes: config.limits.max_content_length_bytes,
        })
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn AudioClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_pages(mut self, pages: StaticPages) -> Self {
        self.pages = Arc::new(pages);
        self
    }

    pub fn is_provider_configured(&self) -> bool {
        self.classifier.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        let sessions = Arc::new(SessionStore::default());
        let session_config = crate::session::SessionConfig::default();
        let cleanup = Arc::new(CleanupScheduler::new(
            Arc::clone(&sessions),
            session_config.timeout(),
            session_config.cleanup_interval(),
        ));
        Self::new(sessions, cleanup)
    }
}
