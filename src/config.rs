use crate::provider::ProviderConfig;
use crate::session::SessionConfig;
use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "config/emotion-ai";
pub const ENV_PREFIX: &str = "EMOTION_AI";

/// Environment variables the service has always honored, mapped to config keys
const LEGACY_ENV: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "provider.api_key"),
    ("ADMIN_TOKEN", "admin.token"),
    ("SESSION_TIMEOUT_MINUTES", "session.timeout_minutes"),
    ("CLEANUP_INTERVAL_MINUTES", "session.cleanup_interval_minutes"),
    ("MAX_CONTENT_LENGTH_BYTES", "limits.max_content_length_bytes"),
    ("LOG_LEVEL", "logging.level"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub provider: ProviderConfig,
    pub session: SessionConfig,
    pub admin: AdminConfig,
    pub static_files: StaticFilesConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "emotion-ai".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared secret for `/admin/cleanup`; open when unset
    pub token: Option<String>,
}

impl AdminConfig {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Searched first
    pub static_dir: PathBuf,
    /// Searched when a page is not in `static_dir`
    pub root_dir: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            root_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_content_length_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_length_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load defaults, then the optional config file at `path`, then
    /// `EMOTION_AI__*` variables, then the legacy variables.
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .with_context(|| format!("Invalid value in {}", var))?;
        }

        Self::build(builder).with_context(|| format!("Failed to load config from {}", path))
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        let builder =
            config::Config::builder().add_source(File::from_str(source, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::from_toml("").unwrap();

        assert_eq!(cfg.service.http.port, 5000);
        assert_eq!(cfg.session.timeout_minutes, 30);
        assert_eq!(cfg.session.cleanup_interval_minutes, 15);
        assert_eq!(cfg.session.max_results, 5);
        assert_eq!(cfg.provider.model, "gemini-2.0-flash");
        assert_eq!(cfg.provider.timeout_secs, 30);
        assert_eq!(cfg.limits.max_content_length_bytes, 10 * 1024 * 1024);
        assert!(!cfg.provider.is_configured());
        assert!(cfg.admin.token().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = Config::from_toml(
            r#"
            [service.http]
            port = 8080

            [provider]
            api_key = "secret"

            [session]
            timeout_minutes = 5

            [admin]
            token = "letmein"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.service.http.port, 8080);
        assert_eq!(cfg.service.http.bind, "0.0.0.0");
        assert!(cfg.provider.is_configured());
        assert_eq!(cfg.session.timeout_minutes, 5);
        assert_eq!(cfg.session.cleanup_interval_minutes, 15);
        assert_eq!(cfg.admin.token(), Some("letmein"));
    }

    #[test]
    fn empty_admin_token_means_open() {
        let cfg = Config::from_toml("[admin]\ntoken = \"\"").unwrap();
        assert!(cfg.admin.token().is_none());
    }
}
