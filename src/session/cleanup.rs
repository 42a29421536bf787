use super::snapshot::SweepReport;
use super::store::SessionStore;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodic sweep of idle sessions
///
/// The background task and the admin endpoint both go through
/// [`run_once`](Self::run_once), so a sweep behaves the same whoever
/// triggers it.
pub struct CleanupScheduler {
    store: Arc<SessionStore>,
    timeout: Duration,
    interval: std::time::Duration,
}

impl CleanupScheduler {
    pub fn new(store: Arc<SessionStore>, timeout: Duration, interval: std::time::Duration) -> Self {
        Self {
            store,
            timeout,
            interval,
        }
    }

    /// Sweep once against the given clock
    pub fn run_once(&self, now: DateTime<Utc>) -> SweepReport {
        let removed = self.store.sweep_expired(now, self.timeout);
        if removed.is_empty() {
            debug!("Session sweep found nothing to remove");
        } else {
            info!("Session sweep removed {} session(s)", removed.len());
        }
        SweepReport::from(removed)
    }

    /// Spawn the background sweep task
    ///
    /// Returns `None` when the interval is zero. The task runs until aborted.
    pub fn spawn(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if self.interval.is_zero() {
            info!("Background session cleanup disabled (interval is 0)");
            return None;
        }

        info!(
            "Background session cleanup started (interval: {}s, timeout: {}m)",
            self.interval.as_secs(),
            self.timeout.num_minutes()
        );

        Some(tokio::spawn(async move {
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // The first tick completes immediately
            timer.tick().await;

            loop {
                timer.tick().await;
                self.run_once(Utc::now());
            }
        }))
    }
}
