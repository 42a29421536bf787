use crate::emotion::EmotionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time copy of a session's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,

    /// When the first result was recorded
    pub created_at: DateTime<Utc>,

    /// When the last result was recorded
    pub last_active: DateTime<Utc>,

    /// Most recent results, oldest first
    pub results: Vec<EmotionResult>,
}

/// Outcome of a single sweep over the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Removed session IDs, in the order they were found
    pub removed_sessions: Vec<String>,

    pub count: usize,
}

impl From<Vec<String>> for SweepReport {
    fn from(removed_sessions: Vec<String>) -> Self {
        let count = removed_sessions.len();
        Self {
            removed_sessions,
            count,
        }
    }
}
