use super::snapshot::SessionSnapshot;
use crate::emotion::EmotionResult;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const DEFAULT_SESSION_ID: &str = "default";

struct Session {
    results: VecDeque<EmotionResult>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

/// In-memory session store
///
/// One instance per process, shared as `Arc<SessionStore>` between the HTTP
/// handlers and the cleanup scheduler. All mutations go through one mutex
/// that is never held across an `.await`. Sessions are kept in creation
/// order.
pub struct SessionStore {
    sessions: Mutex<IndexMap<String, Session>>,
    max_results: usize,
}

impl SessionStore {
    pub fn new(max_results: usize) -> Self {
        Self {
            sessions: Mutex::new(IndexMap::new()),
            max_results: max_results.max(1),
        }
    }

    /// Append a result to a session, creating it if needed.
    pub fn record_result(&self, session_id: &str, result: EmotionResult) {
        self.record_result_at(session_id, result, Utc::now());
    }

    /// Same as [`record_result`](Self::record_result) with an explicit clock.
    pub fn record_result_at(&self, session_id: &str, result: EmotionResult, now: DateTime<Utc>) {
        let mut sessions = self.lock();

        let session = sessions.entry(session_id.to_string()).or_insert_with(|| {
            info!("Session {} started", session_id);
            Session {
                results: VecDeque::with_capacity(self.max_results + 1),
                created_at: now,
                last_active: now,
            }
        });

        session.last_active = now.max(session.created_at);
        session.results.push_back(result);
        while session.results.len() > self.max_results {
            session.results.pop_front();
        }

        debug!(
            "Session {} now holds {} result(s)",
            session_id,
            session.results.len()
        );
    }

    /// Remove a session. Returns whether it existed.
    pub fn end_session(&self, session_id: &str) -> bool {
        let removed = self.lock().shift_remove(session_id).is_some();
        if removed {
            info!("Session {} ended", session_id);
        }
        removed
    }

    /// Remove every session idle for strictly longer than `timeout`.
    ///
    /// Returns the removed IDs in session creation order.
    pub fn sweep_expired(&self, now: DateTime<Utc>, timeout: Duration) -> Vec<String> {
        let mut sessions = self.lock();
        let mut expired = Vec::new();

        sessions.retain(|id, session| {
            if now.signed_duration_since(session.last_active) > timeout {
                info!("Expired session removed: {}", id);
                expired.push(id.clone());
                false
            } else {
                true
            }
        });

        expired
    }

    pub fn snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        self.lock().get(session_id).map(|session| SessionSnapshot {
            session_id: session_id.to_string(),
            created_at: session.created_at,
            last_active: session.last_active,
            results: session.results.iter().cloned().collect(),
        })
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Session>> {
        // The map stays consistent even if a holder panicked mid-call.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{Emotion, EmotionResult};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn result(confidence: f64) -> EmotionResult {
        EmotionResult {
            confidence,
            ..EmotionResult::fallback()
        }
    }

    #[test]
    fn creates_session_lazily() {
        let store = SessionStore::default();
        assert!(store.is_empty());

        store.record_result_at("s1", result(0.1), t0());

        let snap = store.snapshot("s1").unwrap();
        assert_eq!(snap.results.len(), 1);
        assert_eq!(snap.created_at, t0());
        assert_eq!(snap.last_active, t0());
    }

    #[test]
    fn history_is_capped_fifo() {
        let store = SessionStore::default();
        let results: Vec<EmotionResult> = (1..=6).map(|i| result(i as f64 / 10.0)).collect();

        for r in &results {
            store.record_result_at("s2", r.clone(), t0());
        }

        let snap = store.snapshot("s2").unwrap();
        assert_eq!(snap.results, results[1..].to_vec());
    }

    #[test]
    fn history_never_exceeds_cap() {
        let store = SessionStore::new(3);
        for i in 0..20 {
            store.record_result_at("s", result(0.5), t0() + Duration::seconds(i));
            assert!(store.snapshot("s").unwrap().results.len() <= 3);
        }
    }

    #[test]
    fn last_active_tracks_latest_call() {
        let store = SessionStore::default();
        store.record_result_at("s", result(0.5), t0());
        store.record_result_at("s", result(0.5), t0() + Duration::minutes(3));

        let snap = store.snapshot("s").unwrap();
        assert_eq!(snap.created_at, t0());
        assert_eq!(snap.last_active, t0() + Duration::minutes(3));
    }

    #[test]
    fn end_session_reports_removal() {
        let store = SessionStore::default();
        store.record_result_at("s", result(0.5), t0());

        assert!(store.end_session("s"));
        assert!(!store.end_session("s"));
        assert!(!store.end_session("never-existed"));
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_scenario_thirty_minute_timeout() {
        let store = SessionStore::default();
        let timeout = Duration::minutes(30);

        for minute in 0..3 {
            store.record_result_at("s1", result(0.5), t0() + Duration::minutes(minute));
        }

        assert!(store
            .sweep_expired(t0() + Duration::minutes(5), timeout)
            .is_empty());
        assert!(store.contains("s1"));

        let removed = store.sweep_expired(t0() + Duration::minutes(35), timeout);
        assert_eq!(removed, vec!["s1".to_string()]);
        assert!(!store.contains("s1"));
    }

    #[test]
    fn sweep_boundary_is_strict() {
        let store = SessionStore::default();
        let timeout = Duration::minutes(30);
        store.record_result_at("edge", result(0.5), t0());

        assert!(store
            .sweep_expired(t0() + Duration::minutes(30), timeout)
            .is_empty());
        assert_eq!(
            store.sweep_expired(t0() + Duration::minutes(30) + Duration::seconds(1), timeout),
            vec!["edge".to_string()]
        );
    }

    #[test]
    fn sweep_leaves_active_sessions() {
        let store = SessionStore::default();
        store.record_result_at("old", result(0.5), t0());
        store.record_result_at("fresh", result(0.5), t0() + Duration::minutes(40));

        let removed = store.sweep_expired(t0() + Duration::minutes(45), Duration::minutes(30));
        assert_eq!(removed, vec!["old".to_string()]);
        assert_eq!(store.session_ids(), vec!["fresh".to_string()]);
    }

    #[test]
    fn sweep_returns_ids_in_creation_order() {
        let store = SessionStore::default();
        let ids: Vec<String> = (0..12).map(|i| format!("s{}", i)).collect();
        for id in &ids {
            store.record_result_at(id, result(0.5), t0());
        }

        let removed = store.sweep_expired(t0() + Duration::minutes(31), Duration::minutes(30));
        assert_eq!(removed, ids);
        assert!(store.is_empty());
    }

    #[test]
    fn removals_keep_remaining_order() {
        let store = SessionStore::default();
        store.record_result_at("a", result(0.5), t0());
        store.record_result_at("b", result(0.5), t0() + Duration::minutes(20));
        store.record_result_at("c", result(0.5), t0());
        store.record_result_at("d", result(0.5), t0() + Duration::minutes(20));
        store.record_result_at("e", result(0.5), t0() + Duration::minutes(20));

        assert!(store.end_session("d"));
        let removed = store.sweep_expired(t0() + Duration::minutes(31), Duration::minutes(30));

        assert_eq!(removed, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(store.session_ids(), vec!["b".to_string(), "e".to_string()]);
    }

    #[test]
    fn stored_results_keep_their_fields() {
        let store = SessionStore::default();
        let mut r = result(0.9);
        r.emotion = Emotion::Excited;
        store.record_result_at("s", r.clone(), t0());

        assert_eq!(store.snapshot("s").unwrap().results[0], r);
    }
}
