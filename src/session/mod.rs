//! Client session tracking
//!
//! This module provides:
//! - `SessionStore`: bounded per-session result history with idle tracking
//! - `CleanupScheduler`: periodic and on-demand expiry of idle sessions
//! - `SessionConfig`: timeout, sweep interval and history size

mod cleanup;
mod config;
mod snapshot;
mod store;

pub use cleanup::CleanupScheduler;
pub use config::SessionConfig;
pub use snapshot::{SessionSnapshot, SweepReport};
pub use store::{SessionStore, DEFAULT_SESSION_ID};
