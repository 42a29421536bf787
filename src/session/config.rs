use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for session tracking and expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session is swept
    /// Default: 30 minutes
    pub timeout_minutes: u64,

    /// How often the background sweep runs; 0 disables it
    /// Default: 15 minutes
    pub cleanup_interval_minutes: u64,

    /// Number of recent results kept per session
    pub max_results: usize,
}

impl SessionConfig {
    pub fn timeout(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.timeout_minutes)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 60_000);
        chrono::Duration::minutes(minutes)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_minutes.saturating_mul(60))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 30,
            cleanup_interval_minutes: 15,
            max_results: 5,
        }
    }
}
